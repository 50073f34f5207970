//! New Project Form Component
//!
//! Inline form for a root project or a sub-project.

use leptos::prelude::*;

use crate::board::{self, Patch};
use crate::context::{use_app_context, ProjectDraft};
use crate::store::BoardStateStoreFields;

#[component]
pub fn NewProjectForm(draft: ProjectDraft) -> impl IntoView {
    let ctx = use_app_context();

    let (name, set_name) = signal(String::new());
    let parent_id = draft.parent_id();

    let parent_name = parent_id.clone().and_then(|pid| {
        ctx.store
            .projects()
            .read_untracked()
            .iter()
            .find(|p| p.id == pid)
            .map(|p| p.name.clone())
    });

    let create_project = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = name.get();
        let parent = parent_id.clone();
        ctx.dispatch_then(
            move |api| async move { board::add_project(&api, &text, parent).await },
            move |patch| {
                if matches!(patch, Patch::ProjectAdded(_)) {
                    set_name.set(String::new());
                    ctx.set_adding_project(None);
                }
            },
        );
    };

    let input_ref = NodeRef::<leptos::html::Input>::new();
    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
        }
    });

    view! {
        <form class="new-project-form" on:submit=create_project>
            <input
                type="text"
                node_ref=input_ref
                placeholder=match parent_name {
                    Some(parent) => format!("Sub-project of {}...", parent),
                    None => "New project...".to_string(),
                }
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
            <button type="button" class="cancel-btn" on:click=move |_| ctx.set_adding_project(None)>
                "Cancel"
            </button>
        </form>
    }
}
