//! Project Tree Component
//!
//! Sidebar listing the project hierarchy as indented rows.

use leptos::prelude::*;

use crate::components::{NewProjectForm, ProjectRow};
use crate::context::{use_app_context, ProjectDraft};
use crate::store::BoardStateStoreFields;
use crate::tree::{build_project_tree, flatten_tree, orphaned_projects};

#[component]
pub fn ProjectTree() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let forest = Memo::new(move |_| build_project_tree(&store.projects().read(), None));

    let rows = move || {
        forest.with(|forest| match forest {
            Ok(forest) => flatten_tree(forest, &store.collapsed().read()),
            Err(_) => Vec::new(),
        })
    };

    let hidden = move || orphaned_projects(&store.projects().read()).len();

    view! {
        <div class="project-tree">
            <div class="sidebar-header">
                <span>"Projects"</span>
                <button
                    class="add-root-btn"
                    title="New project"
                    on:click=move |_| ctx.set_adding_project(Some(ProjectDraft::Root))
                >
                    "+"
                </button>
            </div>

            {move || ctx.adding_project.get().map(|draft| view! { <NewProjectForm draft=draft /> })}

            {move || forest.with(|forest| forest.as_ref().err().map(|e| {
                tracing::warn!("project tree: {}", e);
                view! { <p class="tree-error">{e.to_string()}</p> }
            }))}

            <For
                each=rows
                key=|row| (
                    row.project.id.clone(),
                    row.project.name.clone(),
                    row.depth,
                    row.has_children,
                )
                children=move |row| view! { <ProjectRow row=row /> }
            />

            {move || {
                let count = hidden();
                (count > 0).then(|| view! {
                    <p class="tree-note">{format!("{} project(s) with a missing parent are hidden", count)}</p>
                })
            }}

            <Show when=move || store.projects().read().is_empty()>
                <p class="empty-hint">"No projects yet"</p>
            </Show>
        </div>
    }
}
