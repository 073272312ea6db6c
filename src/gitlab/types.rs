//! GitLab REST API types.
//!
//! Only the fields this tool reads or writes are modelled.

use serde::{Deserialize, Serialize};

/// Authenticated user (`GET /user`).
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// User id.
    pub id: u64,
    /// Login name.
    pub username: String,
}

/// Project (`GET /projects/:id`).
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project id.
    pub id: u64,
    /// Human-readable `Group / Project` name.
    pub name_with_namespace: String,
}

/// Merge request (`GET /projects/:id/merge_requests/:iid`).
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    /// Project-scoped iid.
    pub iid: u64,
    /// Merge request title.
    pub title: String,
}

/// A merge request note.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Note {
    /// Note id.
    pub id: u64,
    /// Markdown body.
    pub body: String,
    /// True for internal notes, visible to project members only.
    #[serde(default)]
    pub internal: bool,
    /// True for system-generated notes.
    #[serde(default)]
    pub system: bool,
}

/// Body of `POST .../notes`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateNoteRequest<'a> {
    pub body: &'a str,
    pub internal: bool,
}

/// Body of `PUT .../notes/:note_id`.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateNoteRequest<'a> {
    pub body: &'a str,
}

/// What `validate_access` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessInfo {
    /// Authenticated user name.
    pub username: String,
    /// Project display name.
    pub project: String,
    /// Merge request title.
    pub merge_request_title: String,
}
