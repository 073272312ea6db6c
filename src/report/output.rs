//! Writing rendered reports to a file or stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::OutputError;

use super::STDOUT_DESTINATION;

/// Writes `content` to `destination`.
///
/// [`STDOUT_DESTINATION`] writes to standard output; anything else is a file
/// path that is created or truncated.
///
/// # Errors
///
/// Returns an error if `content` is empty or the destination cannot be written.
pub fn write(content: &str, destination: &str) -> Result<(), OutputError> {
    if content.is_empty() {
        return Err(OutputError::EmptyContent);
    }

    if destination == STDOUT_DESTINATION {
        let mut stdout = std::io::stdout().lock();
        return stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|cause| OutputError::Write {
                path: PathBuf::from("stdout"),
                cause,
            });
    }

    let path = Path::new(destination);
    debug!("Writing {} bytes to {}", content.len(), path.display());
    std::fs::write(path, content).map_err(|cause| OutputError::Write {
        path: path.to_path_buf(),
        cause,
    })
}

/// Human-readable name of a destination.
#[must_use]
pub fn destination_label(destination: &str) -> &str {
    if destination == STDOUT_DESTINATION {
        "stdout"
    } else {
        destination
    }
}
