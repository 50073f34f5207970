//! Board State and Backend Sync
//!
//! Every user intent runs one API call and turns the outcome into a
//! [`Patch`]. Patches are applied to [`BoardState`] when the response
//! arrives, so local state only changes after the backend has accepted the
//! change, and a failure only raises the error banner.

use std::collections::HashSet;

use chrono::NaiveDate;
use reactive_stores::Store;

use crate::api::{ApiClient, TokenStore, Transport};
use crate::error::TreeError;
use crate::models::{NewProject, NewTask, Project, ProjectUpdate, RecordId, Task, TaskStatus, TaskUpdate};
use crate::tree::{build_project_tree, descendant_ids, TreeProject};

/// Outcome of one backend round-trip
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    ProjectsLoaded(Vec<Project>),
    ProjectAdded(Project),
    ProjectUpdated(Project),
    ProjectRemoved(RecordId),
    TasksLoaded { project_id: RecordId, tasks: Vec<Task> },
    TaskAdded(Task),
    TaskUpdated(Task),
    TaskRemoved(RecordId),
    Failed(String),
    /// Nothing to send (e.g. rename to the same title)
    Unchanged,
}

/// Local cache of projects and the selected project's tasks
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    pub projects: Vec<Project>,
    /// Tasks of the selected project only
    pub tasks: Vec<Task>,
    pub selected_project: Option<RecordId>,
    /// Projects whose children are hidden in the tree
    pub collapsed: HashSet<RecordId>,
    /// Error banner text
    pub error: Option<String>,
}

impl BoardState {
    pub fn apply(&mut self, patch: Patch) {
        match patch {
            Patch::ProjectsLoaded(projects) => {
                self.projects = projects;
                let ids: HashSet<&RecordId> = self.projects.iter().map(|p| &p.id).collect();
                self.collapsed.retain(|id| ids.contains(id));
                if self.selected_project.as_ref().is_some_and(|id| !ids.contains(id)) {
                    self.selected_project = None;
                    self.tasks.clear();
                }
            }
            Patch::ProjectAdded(project) => {
                self.selected_project = Some(project.id.clone());
                self.tasks.clear();
                self.projects.push(project);
            }
            Patch::ProjectUpdated(updated) => {
                if let Some(project) = self.projects.iter_mut().find(|p| p.id == updated.id) {
                    project.name = updated.name;
                    project.description = updated.description;
                    project.is_inbox = updated.is_inbox;
                    // Responses may omit parent_id; keep the known placement
                    if updated.parent_id.is_some() {
                        project.parent_id = updated.parent_id;
                    }
                }
            }
            Patch::ProjectRemoved(id) => {
                let removed = descendant_ids(&self.projects, &id);
                self.projects.retain(|p| !removed.contains(&p.id));
                self.collapsed.retain(|id| !removed.contains(id));
                if self.selected_project.as_ref().is_some_and(|id| removed.contains(id)) {
                    self.selected_project = None;
                    self.tasks.clear();
                }
            }
            Patch::TasksLoaded { project_id, tasks } => {
                if self.selected_project.as_ref() == Some(&project_id) {
                    self.tasks = tasks;
                } else {
                    tracing::debug!("dropping tasks for unselected project {}", project_id);
                }
            }
            Patch::TaskAdded(task) => {
                if self.selected_project.as_ref() == Some(&task.project_id) {
                    self.tasks.push(task);
                }
            }
            Patch::TaskUpdated(updated) => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
                    *task = updated;
                }
            }
            Patch::TaskRemoved(id) => self.tasks.retain(|t| t.id != id),
            Patch::Failed(message) => {
                tracing::warn!("{}", message);
                self.error = Some(message);
            }
            Patch::Unchanged => {}
        }
    }

    /// Switch project; tasks stay empty until `load_tasks` lands.
    pub fn select_project(&mut self, id: RecordId) {
        if self.selected_project.as_ref() != Some(&id) {
            self.selected_project = Some(id);
            self.tasks.clear();
        }
    }

    pub fn toggle_collapsed(&mut self, id: &RecordId) {
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.clone());
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn project_tree(&self) -> Result<Vec<TreeProject>, TreeError> {
        build_project_tree(&self.projects, None)
    }
}

fn non_blank(value: &str, what: &str) -> Result<String, Patch> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Patch::Failed(format!("{} cannot be empty", what)))
    } else {
        Ok(trimmed.to_string())
    }
}

// ========================
// Project Operations
// ========================

pub async fn load_projects<T: Transport, S: TokenStore>(api: &ApiClient<T, S>) -> Patch {
    match api.list_projects().await {
        Ok(projects) => Patch::ProjectsLoaded(projects),
        Err(e) => Patch::Failed(e.message()),
    }
}

pub async fn add_project<T: Transport, S: TokenStore>(
    api: &ApiClient<T, S>,
    name: &str,
    parent_id: Option<RecordId>,
) -> Patch {
    let name = match non_blank(name, "Project name") {
        Ok(name) => name,
        Err(patch) => return patch,
    };
    let request = NewProject {
        name,
        parent_id: parent_id.clone(),
    };
    match api.create_project(&request).await {
        Ok(mut project) => {
            if project.parent_id.is_none() {
                project.parent_id = parent_id;
            }
            Patch::ProjectAdded(project)
        }
        Err(e) => Patch::Failed(e.message()),
    }
}

pub async fn rename_project<T: Transport, S: TokenStore>(
    api: &ApiClient<T, S>,
    project: &Project,
    name: &str,
) -> Patch {
    let name = match non_blank(name, "Project name") {
        Ok(name) => name,
        Err(patch) => return patch,
    };
    if name == project.name {
        return Patch::Unchanged;
    }
    let update = ProjectUpdate { name: Some(name) };
    match api.update_project(&project.id, &update).await {
        Ok(updated) => Patch::ProjectUpdated(updated),
        Err(e) => Patch::Failed(e.message()),
    }
}

pub async fn delete_project<T: Transport, S: TokenStore>(api: &ApiClient<T, S>, id: &RecordId) -> Patch {
    match api.delete_project(id).await {
        Ok(()) => Patch::ProjectRemoved(id.clone()),
        Err(e) => Patch::Failed(e.message()),
    }
}

// ========================
// Task Operations
// ========================

pub async fn load_tasks<T: Transport, S: TokenStore>(api: &ApiClient<T, S>, project_id: &RecordId) -> Patch {
    match api.list_tasks(project_id).await {
        Ok(tasks) => Patch::TasksLoaded {
            project_id: project_id.clone(),
            tasks,
        },
        Err(e) => Patch::Failed(e.message()),
    }
}

pub async fn add_task<T: Transport, S: TokenStore>(
    api: &ApiClient<T, S>,
    project_id: &RecordId,
    title: &str,
    due_date: Option<NaiveDate>,
) -> Patch {
    let title = match non_blank(title, "Task title") {
        Ok(title) => title,
        Err(patch) => return patch,
    };
    match api.create_task(project_id, &NewTask { title, due_date }).await {
        Ok(task) => Patch::TaskAdded(task),
        Err(e) => Patch::Failed(e.message()),
    }
}

async fn update_task<T: Transport, S: TokenStore>(
    api: &ApiClient<T, S>,
    task: &Task,
    update: TaskUpdate,
) -> Patch {
    match api.update_task(&task.project_id, &task.id, &update).await {
        Ok(updated) => Patch::TaskUpdated(updated),
        Err(e) => Patch::Failed(e.message()),
    }
}

/// Flip completion. The backend keeps it in `status`, so both fields carry
/// the same change and nothing else is sent.
pub async fn toggle_task<T: Transport, S: TokenStore>(api: &ApiClient<T, S>, task: &Task) -> Patch {
    let completed = !task.completed;
    let update = TaskUpdate {
        completed: Some(completed),
        status: Some(if completed { TaskStatus::Done } else { TaskStatus::Todo }),
        ..Default::default()
    };
    update_task(api, task, update).await
}

pub async fn toggle_flag<T: Transport, S: TokenStore>(api: &ApiClient<T, S>, task: &Task) -> Patch {
    let update = TaskUpdate {
        flagged: Some(!task.flagged),
        ..Default::default()
    };
    update_task(api, task, update).await
}

pub async fn rename_task<T: Transport, S: TokenStore>(
    api: &ApiClient<T, S>,
    task: &Task,
    title: &str,
) -> Patch {
    let title = match non_blank(title, "Task title") {
        Ok(title) => title,
        Err(patch) => return patch,
    };
    if title == task.title {
        return Patch::Unchanged;
    }
    let update = TaskUpdate {
        title: Some(title),
        ..Default::default()
    };
    update_task(api, task, update).await
}

pub async fn delete_task<T: Transport, S: TokenStore>(api: &ApiClient<T, S>, task: &Task) -> Patch {
    match api.delete_task(&task.project_id, &task.id).await {
        Ok(()) => Patch::TaskRemoved(task.id.clone()),
        Err(e) => Patch::Failed(e.message()),
    }
}

/// Full resync: projects, then the selected project's tasks.
pub async fn refresh<T: Transport, S: TokenStore>(
    api: &ApiClient<T, S>,
    selected: Option<RecordId>,
) -> Vec<Patch> {
    let mut patches = vec![load_projects(api).await];
    if let Some(project_id) = selected {
        patches.push(load_tasks(api, &project_id).await);
    }
    patches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{client, MockTransport};
    use crate::api::{Body, MemoryTokenStore, Method};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn api(mock: &MockTransport) -> ApiClient<MockTransport, MemoryTokenStore> {
        client(mock, &MemoryTokenStore::with_tokens("acc", "ref"))
    }

    fn board_with_project(id: &str) -> BoardState {
        let mut state = BoardState::default();
        state.apply(Patch::ProjectsLoaded(vec![Project::new(id, "Work", None)]));
        state.select_project(RecordId::from(id));
        state
    }

    #[tokio::test]
    async fn test_created_task_is_appended_once() {
        let mock = MockTransport::new();
        mock.respond(201, json!({"id": 10, "project_id": 1, "title": "Write report", "completed": false}));
        let mut state = board_with_project("1");

        let patch = add_task(&api(&mock), &RecordId::from("1"), "  Write report ", None).await;
        state.apply(patch);

        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].id, RecordId::from("10"));
        assert_eq!(state.tasks[0].title, "Write report");
        assert_eq!(state.error, None);
        assert_eq!(
            mock.last_request().unwrap().body,
            Body::Json(json!({"title": "Write report"}))
        );
    }

    #[tokio::test]
    async fn test_failed_create_leaves_tasks_and_sets_banner() {
        let mock = MockTransport::new();
        mock.respond(500, json!({"detail": "database is locked"}));
        let mut state = board_with_project("1");

        let patch = add_task(&api(&mock), &RecordId::from("1"), "Write report", None).await;
        state.apply(patch);

        assert!(state.tasks.is_empty());
        assert_eq!(state.error.as_deref(), Some("database is locked"));

        state.dismiss_error();
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_backend() {
        let mock = MockTransport::new();
        let patch = add_task(&api(&mock), &RecordId::from("1"), "   ", None).await;
        assert_eq!(patch, Patch::Failed("Task title cannot be empty".to_string()));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_completed() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"id": 10, "project_id": 1, "title": "T", "completed": true}))
            .respond(200, json!({"id": 10, "project_id": 1, "title": "T", "completed": false}));
        let client = api(&mock);
        let mut state = board_with_project("1");
        state.apply(Patch::TasksLoaded {
            project_id: RecordId::from("1"),
            tasks: vec![Task::new("10", "1", "T")],
        });

        let first = state.tasks[0].clone();
        state.apply(toggle_task(&client, &first).await);
        assert!(state.tasks[0].completed);

        let second = state.tasks[0].clone();
        state.apply(toggle_task(&client, &second).await);
        assert!(!state.tasks[0].completed);

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[0].body, Body::Json(json!({"completed": true, "status": "done"})));
        assert_eq!(requests[1].body, Body::Json(json!({"completed": false, "status": "todo"})));
    }

    #[tokio::test]
    async fn test_toggle_against_status_only_backend() {
        // Backend schema: no `completed`, completion lives in `status`
        let mock = MockTransport::new();
        mock.respond(200, json!({"id": 10, "project_id": 1, "title": "T", "status": "done", "is_flagged": false}))
            .respond(200, json!({"id": 10, "project_id": 1, "title": "T", "status": "todo", "is_flagged": false}));
        let client = api(&mock);
        let mut state = board_with_project("1");
        state.apply(Patch::TasksLoaded {
            project_id: RecordId::from("1"),
            tasks: vec![Task::new("10", "1", "T")],
        });

        let task = state.tasks[0].clone();
        state.apply(toggle_task(&client, &task).await);
        assert!(state.tasks[0].completed);
        assert_eq!(state.tasks[0].status, Some(TaskStatus::Done));

        let task = state.tasks[0].clone();
        state.apply(toggle_task(&client, &task).await);
        assert!(!state.tasks[0].completed);
        assert_eq!(mock.last_request().unwrap().body, Body::Json(json!({"completed": false, "status": "todo"})));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_task() {
        let mock = MockTransport::new();
        mock.respond(404, json!({"detail": "Task not found"}));
        let mut state = board_with_project("1");
        state.apply(Patch::TasksLoaded {
            project_id: RecordId::from("1"),
            tasks: vec![Task::new("10", "1", "Original")],
        });

        let task = state.tasks[0].clone();
        state.apply(rename_task(&api(&mock), &task, "Renamed").await);

        assert_eq!(state.tasks[0].title, "Original");
        assert_eq!(state.error.as_deref(), Some("Task not found"));
    }

    #[tokio::test]
    async fn test_rename_to_same_title_is_unchanged() {
        let mock = MockTransport::new();
        let task = Task::new("10", "1", "Same");
        assert_eq!(rename_task(&api(&mock), &task, " Same ").await, Patch::Unchanged);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_toggle_flag_sends_is_flagged() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"id": 10, "project_id": 1, "title": "T", "is_flagged": true}));
        let patch = toggle_flag(&api(&mock), &Task::new("10", "1", "T")).await;

        assert!(matches!(patch, Patch::TaskUpdated(ref t) if t.flagged));
        assert_eq!(mock.last_request().unwrap().body, Body::Json(json!({"is_flagged": true})));
    }

    #[tokio::test]
    async fn test_delete_task_removes_on_success_only() {
        let mock = MockTransport::new();
        mock.respond(500, json!({})).respond(200, json!({"message": "Task deleted successfully"}));
        let client = api(&mock);
        let mut state = board_with_project("1");
        state.apply(Patch::TasksLoaded {
            project_id: RecordId::from("1"),
            tasks: vec![Task::new("10", "1", "T"), Task::new("11", "1", "U")],
        });
        let task = state.tasks[0].clone();

        state.apply(delete_task(&client, &task).await);
        assert_eq!(state.tasks.len(), 2);
        assert_eq!(state.error.as_deref(), Some("Failed to delete task"));

        state.apply(delete_task(&client, &task).await);
        let ids: Vec<&str> = state.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["11"]);
    }

    #[tokio::test]
    async fn test_add_project_selects_it_and_keeps_parent() {
        let mock = MockTransport::new();
        // Backend echoes without parent_id
        mock.respond(200, json!({"id": 2, "name": "New Project", "is_inbox": false}));
        let mut state = board_with_project("1");

        state.apply(add_project(&api(&mock), "New Project", Some(RecordId::from("1"))).await);

        assert_eq!(state.selected_project, Some(RecordId::from("2")));
        let tree = state.project_tree().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].project.name, "New Project");
    }

    #[tokio::test]
    async fn test_rename_project_keeps_placement() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"id": 2, "name": "Renamed"}));
        let mut state = BoardState::default();
        state.apply(Patch::ProjectsLoaded(vec![
            Project::new("1", "Work", None),
            Project::new("2", "Sub", Some(RecordId::from("1"))),
        ]));

        let project = state.projects[1].clone();
        state.apply(rename_project(&api(&mock), &project, "Renamed").await);

        assert_eq!(state.projects[1].name, "Renamed");
        assert_eq!(state.projects[1].parent_id, Some(RecordId::from("1")));
        assert_eq!(mock.last_request().unwrap().body, Body::Json(json!({"name": "Renamed"})));
    }

    #[tokio::test]
    async fn test_delete_project_cascades_in_cache() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"message": "Project deleted successfully"}));
        let mut state = BoardState::default();
        state.apply(Patch::ProjectsLoaded(vec![
            Project::new("1", "Work", None),
            Project::new("2", "Sub", Some(RecordId::from("1"))),
            Project::new("3", "Deep", Some(RecordId::from("2"))),
            Project::new("4", "Personal", None),
        ]));
        state.select_project(RecordId::from("3"));
        state.apply(Patch::TasksLoaded {
            project_id: RecordId::from("3"),
            tasks: vec![Task::new("t1", "3", "Deep task")],
        });

        state.apply(delete_project(&api(&mock), &RecordId::from("1")).await);

        let ids: Vec<&str> = state.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["4"]);
        assert_eq!(state.selected_project, None);
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn test_stale_task_list_is_ignored() {
        let mut state = board_with_project("1");
        state.apply(Patch::ProjectsLoaded(vec![
            Project::new("1", "Work", None),
            Project::new("2", "Home", None),
        ]));
        state.select_project(RecordId::from("2"));

        state.apply(Patch::TasksLoaded {
            project_id: RecordId::from("1"),
            tasks: vec![Task::new("t1", "1", "Old")],
        });
        assert!(state.tasks.is_empty());
    }

    #[test]
    fn test_reload_drops_vanished_selection() {
        let mut state = board_with_project("1");
        state.apply(Patch::TasksLoaded {
            project_id: RecordId::from("1"),
            tasks: vec![Task::new("t1", "1", "A")],
        });
        state.toggle_collapsed(&RecordId::from("1"));

        state.apply(Patch::ProjectsLoaded(vec![Project::new("2", "Other", None)]));

        assert_eq!(state.selected_project, None);
        assert!(state.tasks.is_empty());
        assert!(state.collapsed.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_loads_projects_then_tasks() {
        let mock = MockTransport::new();
        mock.respond(200, json!([{"id": 1, "name": "Work"}]))
            .respond(200, json!([{"id": 5, "project_id": 1, "title": "Synced"}]));
        let mut state = board_with_project("1");

        for patch in refresh(&api(&mock), state.selected_project.clone()).await {
            state.apply(patch);
        }

        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].title, "Synced");
        let urls: Vec<String> = mock.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["/api/v1/projects/", "/api/v1/projects/1/tasks/"]);
    }

    #[test]
    fn test_tree_error_on_cyclic_cache() {
        let mut state = BoardState::default();
        state.apply(Patch::ProjectsLoaded(vec![
            Project::new("1", "A", Some(RecordId::from("2"))),
            Project::new("2", "B", Some(RecordId::from("1"))),
        ]));
        assert!(matches!(state.project_tree(), Err(TreeError::Cycle { .. })));
    }
}
