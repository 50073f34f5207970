//! Task List Component
//!
//! Tasks of the selected project with the add-task form on top.

use chrono::NaiveDate;
use leptos::prelude::*;

use crate::board::{self, Patch};
use crate::components::TaskItem;
use crate::context::use_app_context;
use crate::store::BoardStateStoreFields;

/// Parse an `<input type="date">` value; empty means no date.
fn parse_due_date(value: &str) -> Result<Option<NaiveDate>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Invalid due date: {}", value))
}

#[component]
pub fn TaskList() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let (title, set_title) = signal(String::new());
    let (due, set_due) = signal(String::new());
    let input_ref = NodeRef::<leptos::html::Input>::new();

    // Toolbar "+ Task"
    Effect::new(move |_| {
        if ctx.task_input_focus.get() > 0 {
            if let Some(input) = input_ref.get_untracked() {
                let _ = input.focus();
            }
        }
    });

    let project_name = move || {
        let selected = store.selected_project().get()?;
        store
            .projects()
            .read()
            .iter()
            .find(|p| p.id == selected)
            .map(|p| p.name.clone())
    };

    let add_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(project_id) = store.selected_project().get_untracked() else {
            return;
        };
        let due_date = match parse_due_date(&due.get_untracked()) {
            Ok(date) => date,
            Err(message) => {
                ctx.apply(Patch::Failed(message));
                return;
            }
        };
        let text = title.get_untracked();
        ctx.dispatch_then(
            move |api| async move { board::add_task(&api, &project_id, &text, due_date).await },
            move |patch| {
                if matches!(patch, Patch::TaskAdded(_)) {
                    set_title.set(String::new());
                    set_due.set(String::new());
                }
            },
        );
    };

    view! {
        <Show
            when=move || store.selected_project().read().is_some()
            fallback=|| view! { <p class="empty-hint">"Select a project to see its tasks"</p> }
        >
            <div class="task-list">
                <h2 class="task-list-title">{project_name}</h2>

                <form class="new-task-form" on:submit=add_task>
                    <input
                        type="text"
                        node_ref=input_ref
                        placeholder="Add a task..."
                        prop:value=move || title.get()
                        on:input=move |ev| set_title.set(event_target_value(&ev))
                    />
                    <input
                        type="date"
                        prop:value=move || due.get()
                        on:input=move |ev| set_due.set(event_target_value(&ev))
                    />
                    <button type="submit">"Add"</button>
                </form>

                <For
                    each=move || store.tasks().get()
                    key=|task| (
                        task.id.clone(),
                        task.title.clone(),
                        task.completed,
                        task.flagged,
                        task.due_date,
                        task.tags.clone(),
                    )
                    children=|task| view! { <TaskItem task=task /> }
                />

                <Show when=move || store.tasks().read().is_empty()>
                    <p class="empty-hint">"No tasks"</p>
                </Show>
            </div>
        </Show>
    }
}
