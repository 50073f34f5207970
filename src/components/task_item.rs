//! Task Item Component

use leptos::prelude::*;

use crate::board::{self, Patch};
use crate::components::DeleteConfirmButton;
use crate::context::use_app_context;
use crate::models::Task;

/// Checkbox state once a toggle settles: the echoed task if the backend took
/// it, otherwise what the row showed before the click.
fn checkbox_after(patch: &Patch, before: bool) -> bool {
    match patch {
        Patch::TaskUpdated(task) => task.completed,
        _ => before,
    }
}

/// A single task row: checkbox, title (double-click to rename), flag,
/// tags, due date and delete
#[component]
pub fn TaskItem(task: Task) -> impl IntoView {
    let ctx = use_app_context();

    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(task.title.clone());

    let completed = task.completed;
    let flagged = task.flagged;
    let title = task.title.clone();
    let tags = task.tags.clone();
    let due = task.due_date.map(|d| d.format("%Y-%m-%d").to_string());

    let checked = RwSignal::new(completed);
    let toggle = {
        let task = task.clone();
        move |_| {
            let task = task.clone();
            checked.set(!completed);
            ctx.dispatch_then(
                |api| async move { board::toggle_task(&api, &task).await },
                move |patch| checked.set(checkbox_after(patch, completed)),
            );
        }
    };

    let flag = {
        let task = task.clone();
        move |_| {
            let task = task.clone();
            ctx.dispatch(|api| async move { board::toggle_flag(&api, &task).await });
        }
    };

    let commit_rename = {
        let task = task.clone();
        move || {
            set_editing.set(false);
            let task = task.clone();
            let title = draft.get_untracked();
            ctx.dispatch(|api| async move { board::rename_task(&api, &task, &title).await });
        }
    };

    let on_delete = Callback::new(move |()| {
        let task = task.clone();
        ctx.dispatch(|api| async move { board::delete_task(&api, &task).await });
    });

    let original = title.clone();

    view! {
        <div class=if completed { "task-item completed" } else { "task-item" }>
            <input type="checkbox" prop:checked=move || checked.get() on:change=toggle />

            <Show
                when=move || editing.get()
                fallback=move || {
                    let title = title.clone();
                    view! {
                        <span class="task-title" on:dblclick=move |_| set_editing.set(true)>
                            {title}
                        </span>
                    }
                }
            >
                <input
                    class="rename-input"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:keydown={
                        let commit = commit_rename.clone();
                        let original = original.clone();
                        move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                            "Enter" => commit(),
                            "Escape" => {
                                set_draft.set(original.clone());
                                set_editing.set(false);
                            }
                            _ => {}
                        }
                    }
                    on:blur={
                        let commit = commit_rename.clone();
                        move |_| {
                            if editing.get_untracked() {
                                commit();
                            }
                        }
                    }
                />
            </Show>

            <span class="task-tags">
                {tags.into_iter().map(|tag| view! { <span class="tag-chip">{tag}</span> }).collect_view()}
            </span>

            {due.map(|d| view! { <span class="task-due">{d}</span> })}

            <button
                class=if flagged { "flag-btn flagged" } else { "flag-btn" }
                title=if flagged { "Unflag" } else { "Flag" }
                on:click=flag
            >
                "⚑"
            </button>

            <DeleteConfirmButton prompt="Delete task?" on_confirm=on_delete />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkbox_reverts_when_toggle_fails() {
        let failed = Patch::Failed("Failed to update task".to_string());
        assert!(!checkbox_after(&failed, false));
        assert!(checkbox_after(&failed, true));
    }

    #[test]
    fn test_checkbox_follows_backend_echo() {
        let mut task = Task::new("t1", "p1", "Write report");
        task.completed = true;
        assert!(checkbox_after(&Patch::TaskUpdated(task.clone()), false));

        // Backend kept it open
        task.completed = false;
        assert!(!checkbox_after(&Patch::TaskUpdated(task), false));
    }
}
