//! Main Leptos application component and routing.

use crate::guard::{ProtectedRoute, PublicRoute};
use crate::pages::{HomePage, LoginPage, Screen};
use crate::session::{SignOutButton, current_viewer};
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    SsrMode,
    components::{Route, Router, Routes},
    hooks::use_location,
    path,
};
use storefront_access::{PolicyTable, Viewer, menu_for};

/// A protected placeholder screen.
fn protected(title: &'static str) -> impl Fn() -> AnyView + Clone + Send + Sync + 'static {
    move || view! { <ProtectedRoute><Screen title=title/></ProtectedRoute> }.into_any()
}

/// The main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Storefront"/>
        <Router>
            <Header/>
            <main class="container">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route
                        path=path!("/login")
                        view=|| view! { <PublicRoute><LoginPage/></PublicRoute> }
                        ssr=SsrMode::Async
                    />

                    // Buyer
                    <Route
                        path=path!("/")
                        view=|| view! { <ProtectedRoute><HomePage/></ProtectedRoute> }
                        ssr=SsrMode::Async
                    />
                    <Route path=path!("/home") view=protected("Home") ssr=SsrMode::Async/>
                    <Route path=path!("/cart") view=protected("Cart") ssr=SsrMode::Async/>
                    <Route path=path!("/checkout") view=protected("Checkout") ssr=SsrMode::Async/>
                    <Route path=path!("/payment") view=protected("Payment") ssr=SsrMode::Async/>
                    <Route path=path!("/buyer/orders") view=protected("My orders") ssr=SsrMode::Async/>
                    <Route path=path!("/write-review") view=protected("Write a review") ssr=SsrMode::Async/>
                    <Route path=path!("/review") view=protected("Reviews") ssr=SsrMode::Async/>
                    <Route path=path!("/product") view=protected("Product") ssr=SsrMode::Async/>
                    <Route path=path!("/product/:id") view=protected("Product") ssr=SsrMode::Async/>
                    <Route path=path!("/promotion") view=protected("Promotions") ssr=SsrMode::Async/>
                    <Route path=path!("/user") view=protected("Account") ssr=SsrMode::Async/>

                    // Any signed-in viewer
                    <Route path=path!("/products") view=protected("Products") ssr=SsrMode::Async/>
                    <Route path=path!("/profile") view=protected("Profile") ssr=SsrMode::Async/>

                    // Seller
                    <Route path=path!("/seller") view=protected("Seller") ssr=SsrMode::Async/>
                    <Route path=path!("/seller/*section") view=protected("Seller") ssr=SsrMode::Async/>
                    <Route path=path!("/seller-report") view=protected("Sales report") ssr=SsrMode::Async/>

                    // Shipper
                    <Route path=path!("/shipper") view=protected("Shipper") ssr=SsrMode::Async/>
                    <Route path=path!("/shipper-details") view=protected("Shipper details") ssr=SsrMode::Async/>
                    <Route path=path!("/shipper/*section") view=protected("Shipper") ssr=SsrMode::Async/>

                    // Admin
                    <Route path=path!("/admin") view=protected("Admin") ssr=SsrMode::Async/>
                    <Route path=path!("/admin/*section") view=protected("Admin") ssr=SsrMode::Async/>
                </Routes>
            </main>
        </Router>
    }
}

/// Header component with navigation and the viewer's menu.
#[component]
fn Header() -> impl IntoView {
    let location = use_location();
    let viewer = Resource::new(move || location.pathname.get(), |_| current_viewer());

    view! {
        <header class="header">
            <div class="header-left">
                <a href="/" class="logo">"Storefront"</a>
            </div>
            <div class="header-right">
                <Suspense fallback=move || view! { <span>"Loading..."</span> }>
                    {move || {
                        viewer.get().map(|result| {
                            match result {
                                Ok(Some(viewer)) => view! {
                                    <ViewerMenu viewer=viewer/>
                                }.into_any(),
                                Ok(None) | Err(_) => view! {
                                    <a href="/login" class="login-button">"Log in"</a>
                                }.into_any(),
                            }
                        })
                    }}
                </Suspense>
            </div>
        </header>
    }
}

/// Role menu dropdown component.
#[component]
fn ViewerMenu(viewer: Viewer) -> impl IntoView {
    let display_name = viewer.label().unwrap_or("Account").to_string();
    let entries = viewer
        .role()
        .map(|role| menu_for(PolicyTable::storefront(), role))
        .unwrap_or_default();

    view! {
        <div class="user-menu">
            <span class="user-name">{display_name}</span>
            <div class="user-dropdown">
                {entries
                    .into_iter()
                    .map(|entry| view! { <a href=entry.to>{entry.label}</a> })
                    .collect_view()}
                <SignOutButton/>
            </div>
        </div>
    }
}
