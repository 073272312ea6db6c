//! GitLab integration.
//!
//! This module provides the REST client for merge request notes and the
//! publisher that keeps a single plan summary comment up to date.

mod client;
mod publisher;
mod types;

pub use client::{GitLabClient, NoteClient};
pub use publisher::{
    body_fingerprint, decide, find_plan_note, should_update, CommentPublisher, PublishOutcome,
    UpsertDecision,
};
pub use types::{AccessInfo, MergeRequest, Note, Project, User};
