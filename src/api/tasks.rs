//! Task Endpoints
//!
//! Tasks are always addressed through their owning project.

use super::{ApiClient, Auth, Body, Method, TokenStore, Transport};
use crate::error::ApiResult;
use crate::models::{NewTask, RecordId, Task, TaskUpdate};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    fn tasks_path(project_id: &RecordId) -> String {
        format!("/projects/{}/tasks/", Self::segment(project_id))
    }

    fn task_path(project_id: &RecordId, id: &RecordId) -> String {
        format!("{}{}", Self::tasks_path(project_id), Self::segment(id))
    }

    pub async fn list_tasks(&self, project_id: &RecordId) -> ApiResult<Vec<Task>> {
        let path = Self::tasks_path(project_id);
        self.fetch_json(Method::Get, &path, Auth::Bearer, Body::Empty, "Failed to fetch tasks")
            .await
    }

    pub async fn create_task(&self, project_id: &RecordId, task: &NewTask) -> ApiResult<Task> {
        let path = Self::tasks_path(project_id);
        let body = Self::json_body(task)?;
        self.fetch_json(Method::Post, &path, Auth::Bearer, body, "Failed to create task")
            .await
    }

    pub async fn update_task(
        &self,
        project_id: &RecordId,
        id: &RecordId,
        update: &TaskUpdate,
    ) -> ApiResult<Task> {
        let path = Self::task_path(project_id, id);
        let body = Self::json_body(update)?;
        self.fetch_json(Method::Put, &path, Auth::Bearer, body, "Failed to update task")
            .await
    }

    pub async fn delete_task(&self, project_id: &RecordId, id: &RecordId) -> ApiResult<()> {
        let path = Self::task_path(project_id, id);
        self.send(Method::Delete, &path, Auth::Bearer, Body::Empty, "Failed to delete task")
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{client, MockTransport};
    use super::super::MemoryTokenStore;
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_task_endpoints_are_project_scoped() {
        let mock = MockTransport::new();
        mock.respond(200, json!([]))
            .respond(201, json!({"id": 10, "project_id": 1, "title": "New"}))
            .respond(200, json!({"id": 10, "project_id": 1, "title": "New", "completed": true}))
            .respond(200, json!({"message": "Task deleted successfully"}));
        let api = client(&mock, &MemoryTokenStore::with_tokens("acc", "ref"));
        let project = RecordId::from("1");
        let task = RecordId::from("10");

        api.list_tasks(&project).await.unwrap();
        let created = api
            .create_task(
                &project,
                &NewTask {
                    title: "New".to_string(),
                    due_date: None,
                },
            )
            .await
            .unwrap();
        let updated = api
            .update_task(
                &project,
                &task,
                &TaskUpdate {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        api.delete_task(&project, &task).await.unwrap();

        assert_eq!(created.title, "New");
        assert!(updated.completed);
        let calls: Vec<(Method, String)> = mock
            .requests()
            .into_iter()
            .map(|r| (r.method, r.url))
            .collect();
        assert_eq!(
            calls,
            vec![
                (Method::Get, "/api/v1/projects/1/tasks/".to_string()),
                (Method::Post, "/api/v1/projects/1/tasks/".to_string()),
                (Method::Put, "/api/v1/projects/1/tasks/10".to_string()),
                (Method::Delete, "/api/v1/projects/1/tasks/10".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_task_failure_message() {
        let mock = MockTransport::new();
        mock.respond(404, json!({"detail": "Project not found"}));
        let api = client(&mock, &MemoryTokenStore::with_tokens("acc", "ref"));

        let err = api
            .create_task(
                &RecordId::from("99"),
                &NewTask {
                    title: "Orphan".to_string(),
                    due_date: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Project not found");
    }
}
