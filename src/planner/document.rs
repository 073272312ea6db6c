//! Terraform plan document model and loaders.
//!
//! Only the parts of `terraform show -json` output that the diff engine
//! reads are modelled here; everything else in the document is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::DocumentError;

/// Highest plan format major version understood by this tool.
const MAX_FORMAT_MAJOR: u64 = 1;

/// A parsed Terraform plan document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Plan JSON format version (e.g. `1.2`).
    #[serde(default)]
    pub format_version: String,
    /// Terraform version that produced the plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    /// Resource changes; `None` when the key is absent from the document.
    #[serde(default)]
    pub resource_changes: Option<Vec<ResourceChange>>,
}

/// One infrastructure object's planned change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Stable resource address (e.g. `module.net.aws_vpc.main`).
    #[serde(default)]
    pub address: String,
    /// Resource mode (`managed` or `data`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Resource type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Provider that manages the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// The before/after change description.
    #[serde(default)]
    pub change: Change,
}

/// Before/after snapshots plus sensitivity markers for a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Change {
    /// Primitive actions attached by Terraform.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Attribute values before the change.
    #[serde(default)]
    pub before: Value,
    /// Attribute values after the change.
    #[serde(default)]
    pub after: Value,
    /// Sensitivity markers for `before`.
    #[serde(default)]
    pub before_sensitive: Value,
    /// Sensitivity markers for `after`.
    #[serde(default)]
    pub after_sensitive: Value,
}

/// A primitive action as emitted by Terraform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Nothing to do.
    NoOp,
    /// Create the object.
    Create,
    /// Read a data source.
    Read,
    /// Update the object in place.
    Update,
    /// Delete the object.
    Delete,
    /// Drop the object from state without destroying it.
    Forget,
    /// Any action this tool does not know about.
    #[serde(other)]
    Other,
}

impl PlanDocument {
    /// Parses a plan document from JSON bytes and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not JSON or the format version is unsupported.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let document: Self = serde_json::from_slice(bytes)?;
        document.validate()?;
        Ok(document)
    }

    /// Checks that the document carries a supported format version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is missing, malformed or too new.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.format_version.is_empty() {
            return Err(DocumentError::invalid(
                "unexpected plan output, format version is missing",
            ));
        }

        let major = self
            .format_version
            .split('.')
            .next()
            .and_then(|m| m.parse::<u64>().ok())
            .ok_or_else(|| {
                DocumentError::invalid(format!(
                    "invalid format version {:?}",
                    self.format_version
                ))
            })?;

        if major > MAX_FORMAT_MAJOR {
            return Err(DocumentError::invalid(format!(
                "unsupported plan format version {}, expected < {}.0",
                self.format_version,
                MAX_FORMAT_MAJOR + 1
            )));
        }

        Ok(())
    }
}

/// Source of plan documents, keyed by a source identifier.
pub trait PlanLoader {
    /// Loads and validates the document named by `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read, parsed, or validated.
    fn load(&self, source: &str) -> Result<PlanDocument, DocumentError>;
}

/// Loads plan documents from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilePlanLoader;

impl FilePlanLoader {
    /// Creates a new file loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PlanLoader for FilePlanLoader {
    fn load(&self, source: &str) -> Result<PlanDocument, DocumentError> {
        let path = Path::new(source);
        debug!("Reading plan file: {}", path.display());
        let bytes = std::fs::read(path)?;
        PlanDocument::from_slice(&bytes)
    }
}
