//! Error types for the plan commenter.
//!
//! This module provides the error hierarchy for every stage of a run:
//! configuration, plan loading and aggregation, GitLab access, and output.
//! The `#[error(..)]` attributes are the single table of user-facing messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the plan commenter.
#[derive(Debug, Error)]
pub enum CommenterError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan loading or processing errors.
    #[error("Error processing terraform plans: {0}")]
    Plan(#[from] PlanError),

    /// GitLab API errors.
    #[error("GitLab error: {0}")]
    GitLab(#[from] GitLabError),

    /// Output errors.
    #[error("Error writing output: {0}")]
    Output(#[from] OutputError),

    /// Report rendering errors.
    #[error("Error formatting plans: {0}")]
    Render(String),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the plan-diff engine.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The document has no resource-change collection at all.
    ///
    /// A present but empty collection is a valid plan without changes.
    #[error("terraform plan appears to be incomplete or in wrong format")]
    EmptyInput,

    /// The multi-plan entry point was given no documents.
    #[error("no plan files provided")]
    NoInputFiles,

    /// A document could not be obtained or parsed.
    #[error("error loading plan file {path}: {cause}")]
    Load {
        /// Source identifier of the failing document.
        path: String,
        /// Underlying loader failure.
        #[source]
        cause: DocumentError,
    },

    /// Aggregation failed for a specific document.
    #[error("error processing plan file {path}: {cause}")]
    Process {
        /// Source identifier of the failing document.
        path: String,
        /// Underlying aggregation failure.
        #[source]
        cause: Box<PlanError>,
    },
}

/// Failures while turning a plan source into a [`crate::planner::PlanDocument`].
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The source could not be read.
    #[error("failed to open terraform plan file: {0}")]
    Read(#[from] std::io::Error),

    /// The source is not valid plan JSON.
    #[error("failed to parse terraform plan JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON parsed but is not a supported plan document.
    #[error("invalid terraform plan format: {message}")]
    Invalid {
        /// Description of the validation failure.
        message: String,
    },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable is missing.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing variable.
        name: String,
    },

    /// The merge request id is not an integer.
    #[error("invalid MergeRequestID '{value}': must be a valid integer")]
    InvalidMergeRequestId {
        /// The rejected value.
        value: String,
    },

    /// The GitLab URL cannot be used as an API base.
    #[error("invalid GitLab URL '{value}': {reason}")]
    InvalidUrl {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The .env file exists but could not be loaded.
    #[error("Failed to load .env file {path}: {message}")]
    DotEnv {
        /// Path of the .env file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },
}

/// GitLab API errors.
#[derive(Debug, Error)]
pub enum GitLabError {
    /// The token was rejected.
    #[error("failed to authenticate with GitLab: {message}")]
    Authentication {
        /// Description of the auth failure.
        message: String,
    },

    /// The project could not be read.
    #[error("failed to access project {project}: {message}")]
    ProjectAccess {
        /// Project id or path.
        project: String,
        /// Description of the failure.
        message: String,
    },

    /// The merge request could not be read.
    #[error("failed to access merge request {merge_request}: {message}")]
    MergeRequestAccess {
        /// Merge request iid.
        merge_request: u64,
        /// Description of the failure.
        message: String,
    },

    /// Listing merge request notes failed.
    #[error("failed to list MR notes: {message}")]
    ListNotes {
        /// Description of the failure.
        message: String,
    },

    /// Creating a note failed.
    #[error("failed to create MR note: {message}")]
    CreateNote {
        /// Description of the failure.
        message: String,
    },

    /// Updating a note failed.
    #[error("failed to update MR note {note_id}: {message}")]
    UpdateNote {
        /// Id of the note.
        note_id: u64,
        /// Description of the failure.
        message: String,
    },

    /// The request never produced a response.
    #[error("Network error communicating with GitLab: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The API answered with a non-success status.
    #[error("GitLab API request failed: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response from GitLab API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Output errors.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Refused to write an empty report.
    #[error("content cannot be empty")]
    EmptyContent,

    /// The destination could not be written.
    #[error("failed to write to output file {path}: {cause}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        cause: std::io::Error,
    },
}

/// Result type alias for plan commenter operations.
pub type Result<T> = std::result::Result<T, CommenterError>;

impl PlanError {
    /// Wraps a loader failure with the identity of its source.
    #[must_use]
    pub fn load(path: impl Into<String>, cause: DocumentError) -> Self {
        Self::Load {
            path: path.into(),
            cause,
        }
    }

    /// Wraps an aggregation failure with the identity of its source.
    #[must_use]
    pub fn process(path: impl Into<String>, cause: Self) -> Self {
        Self::Process {
            path: path.into(),
            cause: Box::new(cause),
        }
    }

    /// Returns the source identifier attached to this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Load { path, .. } | Self::Process { path, .. } => Some(path),
            Self::EmptyInput | Self::NoInputFiles => None,
        }
    }
}

impl DocumentError {
    /// Creates a validation error with the given message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

impl GitLabError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an API status error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
