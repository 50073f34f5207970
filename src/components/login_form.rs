//! Login Form Component
//!
//! Sign-in and registration share one form; a link flips the mode.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::session::AuthSession;

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (registering, set_registering) = signal(false);
    let (busy, set_busy) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get().trim().to_string();
        let password = password.get();
        if email.is_empty() || password.is_empty() {
            set_error.set(Some("Email and password are required".to_string()));
            return;
        }
        let register = registering.get();
        set_busy.set(true);
        set_error.set(None);

        spawn_local(async move {
            let mut auth = AuthSession::new(ctx.api());
            let result = if register {
                auth.register(&email, &password).await
            } else {
                auth.login(&email, &password).await
            };
            match result {
                Ok(()) => ctx.set_session(auth.state().clone()),
                Err(e) => set_error.set(Some(e.message())),
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=submit>
                <h1>"Mini Focus"</h1>
                <h2>{move || if registering.get() { "Create account" } else { "Sign in" }}</h2>

                {move || error.get().map(|msg| view! { <p class="login-error">{msg}</p> })}

                <input
                    type="email"
                    placeholder="Email"
                    autocomplete="username"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    autocomplete=move || if registering.get() { "new-password" } else { "current-password" }
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || busy.get()>
                    {move || match (busy.get(), registering.get()) {
                        (true, _) => "Please wait...",
                        (false, true) => "Register",
                        (false, false) => "Log in",
                    }}
                </button>

                <button
                    type="button"
                    class="link-btn"
                    on:click=move |_| {
                        set_error.set(None);
                        set_registering.update(|r| *r = !*r);
                    }
                >
                    {move || if registering.get() { "Have an account? Sign in" } else { "No account? Register" }}
                </button>
            </form>
        </div>
    }
}
