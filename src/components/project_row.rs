//! Project Row Component
//!
//! One project in the sidebar tree.

use leptos::prelude::*;

use crate::board;
use crate::components::DeleteConfirmButton;
use crate::context::{use_app_context, ProjectDraft};
use crate::store::{store_select_project, store_toggle_collapsed, BoardStateStoreFields};
use crate::tree::TreeRow;

/// A single project row; double-click renames in place
#[component]
pub fn ProjectRow(row: TreeRow) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let project = row.project;
    let id = project.id.clone();
    let indent = row.depth * 16;

    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(project.name.clone());

    let is_selected = {
        let id = id.clone();
        move || store.selected_project().read().as_ref() == Some(&id)
    };
    let is_collapsed = {
        let id = id.clone();
        move || store.collapsed().read().contains(&id)
    };

    let select = {
        let id = id.clone();
        move |_| {
            if store.selected_project().read_untracked().as_ref() == Some(&id) {
                return;
            }
            store_select_project(&store, id.clone());
            let id = id.clone();
            ctx.dispatch(|api| async move { board::load_tasks(&api, &id).await });
        }
    };

    let commit_rename = {
        let project = project.clone();
        move || {
            set_editing.set(false);
            let project = project.clone();
            let name = draft.get_untracked();
            ctx.dispatch(|api| async move { board::rename_project(&api, &project, &name).await });
        }
    };

    let toggle = {
        let id = id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            store_toggle_collapsed(&store, &id);
        }
    };

    let add_child = {
        let id = id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            ctx.set_adding_project(Some(ProjectDraft::Under(id.clone())));
        }
    };

    let on_delete = {
        let id = id.clone();
        Callback::new(move |()| {
            let id = id.clone();
            ctx.dispatch(|api| async move { board::delete_project(&api, &id).await });
        })
    };

    let name = project.name.clone();
    let original = project.name.clone();

    view! {
        <div
            class=move || if is_selected() { "project-row selected" } else { "project-row" }
            style=format!("padding-left: {}px;", indent)
            on:click=select
        >
            {if row.has_children {
                view! {
                    <button class="collapse-btn" on:click=toggle>
                        {move || if is_collapsed() { "▶" } else { "▼" }}
                    </button>
                }.into_any()
            } else {
                view! { <span class="collapse-placeholder">"·"</span> }.into_any()
            }}

            <Show
                when=move || editing.get()
                fallback=move || {
                    let name = name.clone();
                    view! {
                        <span class="project-name" on:dblclick=move |_| set_editing.set(true)>
                            {name}
                        </span>
                    }
                }
            >
                <input
                    class="rename-input"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:click=|ev| ev.stop_propagation()
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

            <button class="add-child-btn" title="Add sub-project" on:click=add_child>"+"</button>
            <DeleteConfirmButton prompt="Delete project?" on_confirm=on_delete />
        </div>
    }
}
