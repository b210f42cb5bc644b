//! Placeholder screen for storefront routes.

use leptos::prelude::*;
use leptos_router::hooks::use_location;

/// A titled screen showing the path it was opened at.
#[component]
pub fn Screen(title: &'static str) -> impl IntoView {
    let location = use_location();

    view! {
        <div class="screen">
            <h1>{title}</h1>
            <p class="screen-path">{move || location.pathname.get()}</p>
        </div>
    }
}
