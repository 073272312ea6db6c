//! GitLab settings loaded from the environment.
//!
//! Variables may be seeded from a `.env` file; real environment variables
//! always win over the file.

use reqwest::Url;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Environment variable holding the GitLab access token.
pub const ENV_GITLAB_TOKEN: &str = "GITLAB_TOKEN";
/// Environment variable holding the GitLab instance URL.
pub const ENV_GITLAB_URL: &str = "GITLAB_URL";
/// Environment variable holding the project id or full path.
pub const ENV_GITLAB_PROJECT_ID: &str = "GITLAB_PROJECT_ID";
/// Environment variable holding the merge request iid.
pub const ENV_GITLAB_MR_ID: &str = "GITLAB_MR_ID";

/// GitLab instance used when `GITLAB_URL` is unset.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Settings needed to post a comment on a merge request.
#[derive(Clone)]
pub struct Settings {
    /// Personal/project access token.
    pub gitlab_token: String,
    /// Base URL of the GitLab instance.
    pub gitlab_url: Url,
    /// Numeric project id or `group/project` path.
    pub project_id: String,
    /// Merge request iid within the project.
    pub merge_request_iid: u64,
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads settings using `lookup` to resolve variable names.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &str| {
            get(name).ok_or_else(|| ConfigError::MissingEnvVar {
                name: name.to_string(),
            })
        };

        let gitlab_token = require(ENV_GITLAB_TOKEN)?;
        let project_id = require(ENV_GITLAB_PROJECT_ID)?;
        let merge_request_iid = parse_merge_request_iid(&require(ENV_GITLAB_MR_ID)?)?;

        let raw_url = get(ENV_GITLAB_URL).unwrap_or_else(|| {
            debug!("{ENV_GITLAB_URL} not set, using {DEFAULT_GITLAB_URL}");
            String::from(DEFAULT_GITLAB_URL)
        });
        let gitlab_url = parse_gitlab_url(&raw_url)?;

        Ok(Self {
            gitlab_token,
            gitlab_url,
            project_id: project_id.trim().to_string(),
            merge_request_iid,
        })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gitlab_token", &"<redacted>")
            .field("gitlab_url", &self.gitlab_url.as_str())
            .field("project_id", &self.project_id)
            .field("merge_request_iid", &self.merge_request_iid)
            .finish()
    }
}

fn parse_merge_request_iid(value: &str) -> std::result::Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|iid| *iid > 0)
        .ok_or_else(|| ConfigError::InvalidMergeRequestId {
            value: value.to_string(),
        })
}

fn parse_gitlab_url(value: &str) -> std::result::Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid(String::from("URL cannot be used as a base")));
    }
    Ok(url)
}

/// Loads the .env file in `base_dir` (or the working directory) if present.
///
/// # Errors
///
/// Returns an error if the .env file exists but cannot be loaded.
pub fn load_dotenv(base_dir: Option<&Path>) -> Result<()> {
    let env_path = base_dir.map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

    if env_path.exists() {
        info!("Loading environment from: {}", env_path.display());
        dotenvy::from_path(&env_path).map_err(|e| ConfigError::DotEnv {
            path: env_path.clone(),
            message: e.to_string(),
        })?;
    } else {
        debug!(".env file not found at: {}", env_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommenterError;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        (ENV_GITLAB_TOKEN, "glpat-secret"),
        (ENV_GITLAB_PROJECT_ID, "infra/platform"),
        (ENV_GITLAB_MR_ID, "42"),
    ];

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(settings.gitlab_url.as_str(), "https://gitlab.com/");
        assert_eq!(settings.project_id, "infra/platform");
        assert_eq!(settings.merge_request_iid, 42);
    }

    #[test]
    fn test_custom_url() {
        let mut vars = REQUIRED.to_vec();
        vars.push((ENV_GITLAB_URL, "https://gitlab.example.com/prefix"));
        let settings = Settings::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(settings.gitlab_url.host_str(), Some("gitlab.example.com"));
    }

    #[test]
    fn test_missing_token() {
        let err = Settings::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert!(matches!(
            err,
            CommenterError::Config(ConfigError::MissingEnvVar { ref name }) if name == ENV_GITLAB_TOKEN
        ));
    }

    #[test]
    fn test_blank_value_is_missing() {
        let vars = [
            (ENV_GITLAB_TOKEN, "glpat-secret"),
            (ENV_GITLAB_PROJECT_ID, "  "),
            (ENV_GITLAB_MR_ID, "42"),
        ];
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains(ENV_GITLAB_PROJECT_ID));
    }

    #[test]
    fn test_invalid_merge_request_id() {
        for bad in ["abc", "-3", "0", "4.2"] {
            let vars = [
                (ENV_GITLAB_TOKEN, "t"),
                (ENV_GITLAB_PROJECT_ID, "1"),
                (ENV_GITLAB_MR_ID, bad),
            ];
            let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
            assert!(
                matches!(err, CommenterError::Config(ConfigError::InvalidMergeRequestId { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_url() {
        let mut vars = REQUIRED.to_vec();
        vars.push((ENV_GITLAB_URL, "ftp://gitlab.example.com"));
        let err = Settings::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, CommenterError::Config(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = Settings::from_lookup(lookup(&REQUIRED)).unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("glpat-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_dotenv_missing_file_is_ok() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_dotenv(Some(dir.path())).is_ok());
    }
}
