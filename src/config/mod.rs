//! Configuration module for the plan commenter.
//!
//! Settings come from environment variables, optionally seeded from a
//! `.env` file. They are only needed when posting to GitLab.

mod settings;

pub use settings::{
    load_dotenv, Settings, DEFAULT_GITLAB_URL, ENV_GITLAB_MR_ID, ENV_GITLAB_PROJECT_ID,
    ENV_GITLAB_TOKEN, ENV_GITLAB_URL,
};
