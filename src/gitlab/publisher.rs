//! Idempotent upsert of the plan summary comment.
//!
//! A merge request carries at most one summary comment: the first internal
//! note whose body starts with [`PLAN_SUMMARY_HEADER`]. Re-running with the
//! same plans leaves that note alone.

use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, info};

use crate::error::Result;
use crate::report::{normalize_whitespace, PLAN_SUMMARY_HEADER};

use super::client::NoteClient;
use super::types::Note;

/// What the publisher decided to do with the comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertDecision {
    /// No summary note exists yet.
    Create,
    /// The summary note exists with different content.
    Update {
        /// Note to overwrite.
        note_id: u64,
    },
    /// The summary note already has this content.
    Unchanged {
        /// Existing note.
        note_id: u64,
    },
}

impl fmt::Display for UpsertDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create a new note"),
            Self::Update { note_id } => write!(f, "update note {note_id}"),
            Self::Unchanged { note_id } => write!(f, "leave note {note_id} unchanged"),
        }
    }
}

/// Result of a publish run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new note was created.
    Created {
        /// Id of the new note.
        note_id: u64,
    },
    /// An existing note was overwritten.
    Updated {
        /// Id of the updated note.
        note_id: u64,
    },
    /// The existing note already matched.
    Unchanged {
        /// Id of the existing note.
        note_id: u64,
    },
    /// Dry run: the decision was made but not applied.
    Skipped(UpsertDecision),
}

/// Returns the first internal note that holds a plan summary.
#[must_use]
pub fn find_plan_note(notes: &[Note]) -> Option<&Note> {
    notes
        .iter()
        .find(|note| note.internal && note.body.starts_with(PLAN_SUMMARY_HEADER))
}

/// SHA-256 of the whitespace-normalised, lowercased body, hex encoded.
#[must_use]
pub fn body_fingerprint(body: &str) -> String {
    let normalized = normalize_whitespace(body).to_lowercase();
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// True when `new_body` differs from `existing` beyond whitespace and case.
#[must_use]
pub fn should_update(existing: &str, new_body: &str) -> bool {
    body_fingerprint(existing) != body_fingerprint(new_body)
}

/// Chooses between create, update and no-op for the given notes.
#[must_use]
pub fn decide(notes: &[Note], body: &str) -> UpsertDecision {
    match find_plan_note(notes) {
        None => UpsertDecision::Create,
        Some(note) if should_update(&note.body, body) => UpsertDecision::Update { note_id: note.id },
        Some(note) => UpsertDecision::Unchanged { note_id: note.id },
    }
}

/// Posts or refreshes the plan summary comment.
#[derive(Debug)]
pub struct CommentPublisher<C> {
    client: C,
    dry_run: bool,
}

impl<C: NoteClient> CommentPublisher<C> {
    /// Creates a publisher around a note client.
    pub const fn new(client: C) -> Self {
        Self {
            client,
            dry_run: false,
        }
    }

    /// Stops after the decision when `dry_run` is set.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Upserts `body` as the merge request's plan summary note.
    ///
    /// # Errors
    ///
    /// Returns an error if access validation or any note call fails.
    pub async fn publish(&self, body: &str) -> Result<PublishOutcome> {
        self.client.validate_access().await?;

        let notes = self.client.list_notes().await?;
        debug!("Found {} notes on merge request", notes.len());

        let decision = decide(&notes, body);
        info!("Upsert decision: {decision}");

        if self.dry_run {
            return Ok(PublishOutcome::Skipped(decision));
        }

        match decision {
            UpsertDecision::Create => {
                let note = self.client.create_note(body).await?;
                info!("Created plan summary note {}", note.id);
                Ok(PublishOutcome::Created { note_id: note.id })
            }
            UpsertDecision::Update { note_id } => {
                let note = self.client.update_note(note_id, body).await?;
                info!("Updated plan summary note {}", note.id);
                Ok(PublishOutcome::Updated { note_id: note.id })
            }
            UpsertDecision::Unchanged { note_id } => {
                info!("Plan summary note {note_id} is up to date");
                Ok(PublishOutcome::Unchanged { note_id })
            }
        }
    }
}
