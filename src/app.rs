//! Mini Focus App
//!
//! Session gate: resolves the stored token once, then shows the login form
//! or the board.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::board::BoardState;
use crate::components::{Home, LoginForm};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::session::{AuthSession, SessionState};

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let (session, set_session) = signal(SessionState::Loading);
    let store = Store::new(BoardState::default());

    let ctx = AppContext::new((session, set_session), store, config);
    provide_context(ctx);
    provide_context(store);

    // Resolve the stored token on startup; failures just show the login form
    spawn_local(async move {
        let mut auth = AuthSession::new(ctx.api());
        let state = auth.resolve().await.clone();
        ctx.set_session(state);
    });

    view! {
        {move || match session.get() {
            SessionState::Loading => view! {
                <div class="app-loading">"Loading..."</div>
            }.into_any(),
            SessionState::Unauthenticated => view! { <LoginForm /> }.into_any(),
            SessionState::Authenticated(user) => view! { <Home user=user /> }.into_any(),
        }}
    }
}
