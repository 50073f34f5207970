//! Project Endpoints

use super::{ApiClient, Auth, Body, Method, TokenStore, Transport};
use crate::error::ApiResult;
use crate::models::{NewProject, Project, ProjectUpdate, RecordId};

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.fetch_json(Method::Get, "/projects/", Auth::Bearer, Body::Empty, "Failed to fetch projects")
            .await
    }

    pub async fn create_project(&self, project: &NewProject) -> ApiResult<Project> {
        let body = Self::json_body(project)?;
        self.fetch_json(Method::Post, "/projects/", Auth::Bearer, body, "Failed to create project")
            .await
    }

    pub async fn update_project(&self, id: &RecordId, update: &ProjectUpdate) -> ApiResult<Project> {
        let path = format!("/projects/{}", Self::segment(id));
        let body = Self::json_body(update)?;
        self.fetch_json(Method::Put, &path, Auth::Bearer, body, "Failed to update project")
            .await
    }

    /// Deletes server-side only; callers prune the local cache.
    pub async fn delete_project(&self, id: &RecordId) -> ApiResult<()> {
        let path = format!("/projects/{}", Self::segment(id));
        self.send(Method::Delete, &path, Auth::Bearer, Body::Empty, "Failed to delete project")
            .await?;
        Ok(())
    }
}
