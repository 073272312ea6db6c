//! GitLab API client implementation.
//!
//! This module provides the HTTP client for the merge request notes API
//! (`/api/v4`), authenticated with a `PRIVATE-TOKEN` header.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::config::Settings;
use crate::error::{ConfigError, GitLabError, Result};

use super::types::{
    AccessInfo, CreateNoteRequest, MergeRequest, Note, Project, UpdateNoteRequest, User,
};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size requested when listing notes.
const NOTES_PER_PAGE: u32 = 100;

/// Upper bound on pages fetched when listing notes.
const MAX_NOTE_PAGES: u32 = 50;

/// Header carrying the next page number in paginated responses.
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Operations on the notes of one merge request.
#[async_trait]
pub trait NoteClient: Send + Sync {
    /// Checks the token can read the user, project and merge request.
    async fn validate_access(&self) -> Result<AccessInfo>;

    /// Lists every note on the merge request.
    async fn list_notes(&self) -> Result<Vec<Note>>;

    /// Creates an internal note.
    async fn create_note(&self, body: &str) -> Result<Note>;

    /// Replaces the body of an existing note.
    async fn update_note(&self, note_id: u64, body: &str) -> Result<Note>;
}

/// GitLab REST API client bound to one merge request.
#[derive(Clone)]
pub struct GitLabClient {
    /// HTTP client.
    client: Client,
    /// Instance base URL.
    base_url: Url,
    /// Access token.
    token: String,
    /// Project id or path.
    project_id: String,
    /// Merge request iid.
    merge_request_iid: u64,
}

impl fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLabClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("merge_request_iid", &self.merge_request_iid)
            .finish_non_exhaustive()
    }
}

impl GitLabClient {
    /// Creates a new client from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_timeout(settings, DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_timeout(settings: &Settings, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GitLabError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.gitlab_url.clone(),
            token: settings.gitlab_token.clone(),
            project_id: settings.project_id.clone(),
            merge_request_iid: settings.merge_request_iid,
        })
    }

    /// Builds `<base>/api/v4/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidUrl {
                value: self.base_url.to_string(),
                reason: String::from("URL cannot be used as a base"),
            })?
            .pop_if_empty()
            .extend(["api", "v4"])
            .extend(segments);
        Ok(url)
    }

    fn merge_request_endpoint(&self, tail: &[&str]) -> Result<Url> {
        let iid = self.merge_request_iid.to_string();
        let mut segments = vec!["projects", self.project_id.as_str(), "merge_requests", iid.as_str()];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    /// Sends a request and rejects non-success statuses.
    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, GitLabError> {
        let response = request
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await
            .map_err(|e| GitLabError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        trace!("GitLab responded {status} for {}", response.url());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitLabError::api(status.as_u16(), body));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, GitLabError> {
        let response = self.send(self.client.get(url)).await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> std::result::Result<T, GitLabError> {
    response.json().await.map_err(|e| GitLabError::InvalidResponse {
        message: format!("Failed to parse response: {e}"),
    })
}

fn next_page(response: &Response) -> Option<u32> {
    response
        .headers()
        .get(NEXT_PAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

#[async_trait]
impl NoteClient for GitLabClient {
    async fn validate_access(&self) -> Result<AccessInfo> {
        let user: User = self
            .get_json(self.endpoint(&["user"])?)
            .await
            .map_err(|e| GitLabError::Authentication {
                message: e.to_string(),
            })?;

        let project: Project = self
            .get_json(self.endpoint(&["projects", self.project_id.as_str()])?)
            .await
            .map_err(|e| GitLabError::ProjectAccess {
                project: self.project_id.clone(),
                message: e.to_string(),
            })?;

        let merge_request: MergeRequest = self
            .get_json(self.merge_request_endpoint(&[])?)
            .await
            .map_err(|e| GitLabError::MergeRequestAccess {
                merge_request: self.merge_request_iid,
                message: e.to_string(),
            })?;

        info!("Authenticated as user: {}", user.username);
        info!("Project: {}", project.name_with_namespace);
        info!("Merge Request: {}", merge_request.title);

        Ok(AccessInfo {
            username: user.username,
            project: project.name_with_namespace,
            merge_request_title: merge_request.title,
        })
    }

    async fn list_notes(&self) -> Result<Vec<Note>> {
        let list_error = |e: GitLabError| GitLabError::ListNotes {
            message: e.to_string(),
        };

        let mut notes = Vec::new();
        let mut page = 1;

        loop {
            let mut url = self.merge_request_endpoint(&["notes"])?;
            url.query_pairs_mut()
                .append_pair("per_page", &NOTES_PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let response = self
                .send(self.client.get(url))
                .await
                .map_err(list_error)?;
            let following = next_page(&response);
            let batch: Vec<Note> = decode(response).await.map_err(list_error)?;
            debug!("Fetched {} notes from page {page}", batch.len());
            notes.extend(batch);

            match following {
                Some(next) if next > page && next <= MAX_NOTE_PAGES => page = next,
                Some(next) if next > page => {
                    warn!(
                        "Stopped listing notes at page {page} of a longer list (next page {next}); an existing summary note may be missed"
                    );
                    break;
                }
                _ => break,
            }
        }

        Ok(notes)
    }

    async fn create_note(&self, body: &str) -> Result<Note> {
        let url = self.merge_request_endpoint(&["notes"])?;
        let request = self.client.post(url).json(&CreateNoteRequest {
            body,
            internal: true,
        });

        let response = self
            .send(request)
            .await
            .map_err(|e| GitLabError::CreateNote {
                message: e.to_string(),
            })?;
        let note = decode(response).await.map_err(|e| GitLabError::CreateNote {
            message: e.to_string(),
        })?;
        Ok(note)
    }

    async fn update_note(&self, note_id: u64, body: &str) -> Result<Note> {
        let id = note_id.to_string();
        let url = self.merge_request_endpoint(&["notes", id.as_str()])?;
        let request = self.client.put(url).json(&UpdateNoteRequest { body });

        let update_error = |e: GitLabError| GitLabError::UpdateNote {
            note_id,
            message: e.to_string(),
        };
        let response = self.send(request).await.map_err(update_error)?;
        let note = decode(response).await.map_err(update_error)?;
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommenterError;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer, project_id: &str) -> Settings {
        Settings {
            gitlab_token: String::from("glpat-test"),
            gitlab_url: Url::parse(&server.uri()).unwrap(),
            project_id: project_id.to_string(),
            merge_request_iid: 7,
        }
    }

    fn note_json(id: u64, body: &str, internal: bool) -> serde_json::Value {
        json!({"id": id, "body": body, "internal": internal, "system": false, "author": {"id": 1}})
    }

    #[tokio::test]
    async fn test_validate_access() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/user"))
            .and(header("PRIVATE-TOKEN", "glpat-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "ci-bot"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/infra%2Fplatform"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 12, "name_with_namespace": "Infra / Platform"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/infra%2Fplatform/merge_requests/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"iid": 7, "title": "Add VPC"})))
            .mount(&server)
            .await;

        let client = GitLabClient::new(&settings(&server, "infra/platform")).unwrap();
        let info = client.validate_access().await.unwrap();
        assert_eq!(
            info,
            AccessInfo {
                username: String::from("ci-bot"),
                project: String::from("Infra / Platform"),
                merge_request_title: String::from("Add VPC"),
            }
        );
    }

    #[tokio::test]
    async fn test_validate_access_bad_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/user"))
            .respond_with(ResponseTemplate::new(401).set_body_string("401 Unauthorized"))
            .mount(&server)
            .await;

        let client = GitLabClient::new(&settings(&server, "12")).unwrap();
        let err = client.validate_access().await.unwrap_err();
        assert!(matches!(err, CommenterError::GitLab(GitLabError::Authentication { .. })));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_list_notes_follows_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/12/merge_requests/7/notes"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Next-Page", "2")
                    .set_body_json(json!([note_json(1, "first", false)])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/12/merge_requests/7/notes"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Next-Page", "")
                    .set_body_json(json!([note_json(2, "second", true)])),
            )
            .mount(&server)
            .await;

        let client = GitLabClient::new(&settings(&server, "12")).unwrap();
        let notes = client.list_notes().await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, 1);
        assert!(notes[1].internal);
    }

    #[tokio::test]
    async fn test_list_notes_stops_at_page_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/projects/12/merge_requests/7/notes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Next-Page", (MAX_NOTE_PAGES + 1).to_string().as_str())
                    .set_body_json(json!([note_json(1, "first", false)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GitLabClient::new(&settings(&server, "12")).unwrap();
        let notes = client.list_notes().await.unwrap();
        assert_eq!(notes.len(), 1);
    }

    #[tokio::test]
    async fn test_create_note_is_internal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/projects/12/merge_requests/7/notes"))
            .and(body_json(json!({"body": "## Terraform Plan Summary", "internal": true})))
            .respond_with(ResponseTemplate::new(201).set_body_json(note_json(
                99,
                "## Terraform Plan Summary",
                true,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitLabClient::new(&settings(&server, "12")).unwrap();
        let note = client.create_note("## Terraform Plan Summary").await.unwrap();
        assert_eq!(note.id, 99);
    }

    #[tokio::test]
    async fn test_update_note_failure() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v4/projects/12/merge_requests/7/notes/5"))
            .respond_with(ResponseTemplate::new(403).set_body_string("403 Forbidden"))
            .mount(&server)
            .await;

        let client = GitLabClient::new(&settings(&server, "12")).unwrap();
        let err = client.update_note(5, "body").await.unwrap_err();
        assert!(matches!(
            err,
            CommenterError::GitLab(GitLabError::UpdateNote { note_id: 5, .. })
        ));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let settings = Settings {
            gitlab_token: String::from("t"),
            gitlab_url: Url::parse("https://example.com/gitlab/").unwrap(),
            project_id: String::from("group/sub/project"),
            merge_request_iid: 3,
        };
        let client = GitLabClient::new(&settings).unwrap();
        let url = client.merge_request_endpoint(&["notes"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/gitlab/api/v4/projects/group%2Fsub%2Fproject/merge_requests/3/notes"
        );
    }
}
