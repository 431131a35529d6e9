//! HTTP calls to the annotation platform REST API.

use serde::{Deserialize, Serialize};

use crate::config::AnnotationCredentials;
use crate::utils::url::join;

use super::error::AnnotationError;
use super::session::AuthenticatedSession;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    key: String,
}

/// Task as returned by the task search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize)]
struct TasksPage {
    #[serde(default)]
    count: i64,
    #[serde(default)]
    results: Vec<TaskDto>,
}

#[derive(Deserialize)]
struct ProjectDto {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct JobDto {
    #[serde(default)]
    stage: Option<String>,
}

#[derive(Deserialize)]
struct JobsPage {
    #[serde(default)]
    results: Vec<JobDto>,
}

fn auth_header(session: &AuthenticatedSession) -> String {
    format!("Token {}", session.token)
}

async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AnnotationError> {
    response
        .json::<T>()
        .await
        .map_err(|e| AnnotationError::Parse(e.to_string()))
}

/// Thin wrapper over `reqwest` for the annotation endpoints.
#[derive(Clone)]
pub struct AnnotationClient {
    http: reqwest::Client,
}

impl AnnotationClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Log in and return the session key.
    pub async fn login(&self, credentials: &AnnotationCredentials) -> Result<String, AnnotationError> {
        let response = self
            .http
            .post(join(&credentials.url, "api/auth/login"))
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.secret,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnnotationError::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        let body: LoginResponse = parse_json(response).await?;
        Ok(body.key)
    }

    /// Search tasks by name. The remote filter may return partial matches.
    pub async fn search_tasks(
        &self,
        session: &AuthenticatedSession,
        name: &str,
    ) -> Result<Vec<TaskDto>, AnnotationError> {
        let response = self
            .http
            .get(join(&session.credentials.url, "api/tasks"))
            .query(&[("name", name)])
            .header(reqwest::header::AUTHORIZATION, auth_header(session))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnnotationError::RemoteUnavailable(format!(
                "task search returned {status}"
            )));
        }

        let page: TasksPage = parse_json(response).await?;
        if page.count <= 0 {
            return Ok(Vec::new());
        }
        Ok(page.results)
    }

    pub async fn project_name(
        &self,
        session: &AuthenticatedSession,
        project_id: i64,
    ) -> Result<String, AnnotationError> {
        let response = self
            .http
            .get(join(
                &session.credentials.url,
                &format!("api/projects/{project_id}"),
            ))
            .header(reqwest::header::AUTHORIZATION, auth_header(session))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnnotationError::RemoteUnavailable(format!(
                "project {project_id} returned {status}"
            )));
        }

        let project: ProjectDto = parse_json(response).await?;
        project
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AnnotationError::Parse(format!("project {project_id} has no name")))
    }

    /// Stage of the first job of a task. A task without jobs has no stage.
    pub async fn first_job_stage(
        &self,
        session: &AuthenticatedSession,
        task_id: i64,
    ) -> Result<Option<String>, AnnotationError> {
        let response = self
            .http
            .get(join(&session.credentials.url, "api/jobs"))
            .query(&[("task_id", task_id)])
            .header(reqwest::header::AUTHORIZATION, auth_header(session))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnnotationError::RemoteUnavailable(format!(
                "jobs of task {task_id} returned {status}"
            )));
        }

        let page: JobsPage = parse_json(response).await?;
        Ok(page.results.into_iter().next().and_then(|job| job.stage))
    }
}
