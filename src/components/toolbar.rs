//! Toolbar Component

use leptos::prelude::*;

use crate::context::{use_app_context, ProjectDraft};
use crate::store::BoardStateStoreFields;

/// Top bar: quick-add buttons, signed-in user, logout
#[component]
pub fn Toolbar(email: String) -> impl IntoView {
    let ctx = use_app_context();
    let has_selection = move || ctx.store.selected_project().read().is_some();

    view! {
        <header class="toolbar">
            <span class="toolbar-title">"Mini Focus"</span>
            <button
                class="toolbar-btn"
                on:click=move |_| ctx.set_adding_project(Some(ProjectDraft::Root))
            >
                "+ Project"
            </button>
            <button
                class="toolbar-btn"
                disabled=move || !has_selection()
                title="Select a project first"
                on:click=move |_| ctx.focus_task_input()
            >
                "+ Task"
            </button>
            <span class="toolbar-spacer"></span>
            <span class="toolbar-user">{email}</span>
            <button class="toolbar-btn logout-btn" on:click=move |_| ctx.logout()>
                "Log out"
            </button>
        </header>
    }
}
