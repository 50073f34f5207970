//! Home Component
//!
//! Signed-in layout: toolbar, project sidebar and the selected project's
//! tasks. Loads projects on mount and resyncs on a timer.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::board;
use crate::components::{ErrorBanner, ProjectTree, TaskList, Toolbar};
use crate::context::use_app_context;
use crate::models::User;
use crate::store::BoardStateStoreFields;

#[component]
pub fn Home(user: User) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    ctx.dispatch(|api| async move { board::load_projects(&api).await });

    // Disposed with this component, which ends the refresh loop
    let mounted = RwSignal::new(());
    let delay_ms = u32::try_from(ctx.config().refresh_interval.as_millis()).unwrap_or(u32::MAX);
    spawn_local(async move {
        loop {
            TimeoutFuture::new(delay_ms).await;
            if mounted.try_get_untracked().is_none() {
                break;
            }
            let selected = store.selected_project().get_untracked();
            tracing::debug!("periodic refresh");
            let ticket = ctx.ticket();
            let api = ctx.api();
            for patch in board::refresh(&api, selected).await {
                ctx.apply_for(ticket, patch);
            }
        }
    });

    view! {
        <div class="app-layout">
            <Toolbar email=user.email />
            <ErrorBanner />
            <div class="board">
                <aside class="sidebar">
                    <ProjectTree />
                </aside>
                <main class="main-content">
                    <TaskList />
                </main>
            </div>
        </div>
    }
}
