//! Home page component.

use crate::session::current_viewer;
use leptos::prelude::*;

/// The buyer's home page.
#[component]
pub fn HomePage() -> impl IntoView {
    let viewer = Resource::new(|| (), |_| current_viewer());

    view! {
        <div class="home-page">
            <Suspense fallback=move || view! { <p>"Loading..."</p> }>
                {move || {
                    viewer.get().map(|result| {
                        let greeting = result
                            .ok()
                            .flatten()
                            .and_then(|viewer| viewer.label().map(str::to_string))
                            .map(|name| format!("Welcome back, {}!", name))
                            .unwrap_or_else(|| "Welcome!".to_string());
                        view! {
                            <div>
                                <h1>{greeting}</h1>
                                <p>"Browse today's products and promotions."</p>
                                <a href="/products" class="cta-button">"Shop now"</a>
                            </div>
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}
