//! Login page component.

use crate::session::{SignIn, user_message};
use leptos::form::ActionForm;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};
use storefront_access::RETURN_TO_PARAM;

/// Login page - email and password, then back to where the viewer was going.
#[component]
pub fn LoginPage() -> impl IntoView {
    let query = use_query_map();
    let from = move || query.with(|query| query.get(RETURN_TO_PARAM).unwrap_or_default());

    let sign_in = ServerAction::<SignIn>::new();
    let navigate = use_navigate();

    Effect::new(move || {
        if let Some(Ok(target)) = sign_in.value().get() {
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    let error = move || {
        sign_in
            .value()
            .get()
            .and_then(Result::err)
            .map(|e| user_message(&e, "Sign-in is unavailable, try again later"))
    };

    view! {
        <div class="login-page">
            <div class="login-box">
                <h1>"Log in to the storefront"</h1>
                <ActionForm action=sign_in>
                    <input type="hidden" name="from" value=from/>
                    <div class="form-row">
                        <label for="email">"Email"</label>
                        <input type="email" id="email" name="email" required/>
                    </div>
                    <div class="form-row">
                        <label for="password">"Password"</label>
                        <input type="password" id="password" name="password" required/>
                    </div>
                    <button type="submit" class="login-button">"Log in"</button>
                    {move || error().map(|msg| view! { <p class="form-error">{msg}</p> })}
                </ActionForm>
            </div>
        </div>
    }
}
