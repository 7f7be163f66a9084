//! Build metadata captured from the CI environment.
//!
//! The environment is read exactly once, in `main`; everything downstream
//! receives an explicit [`BuildMetadata`] value instead of probing variables.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

/// Base URL used when the CI server does not announce one
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Build provenance rendered into the page footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// Build timestamp text, `YYYY-MM-DD HH:MM:SS UTC` when self-generated
    pub timestamp: String,

    /// Commit identifier; `unknown` when the variable is unset
    pub commit: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,

    /// Repository slug, `owner/repo`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    pub server_url: String,

    /// Explicit run URL; takes precedence over the synthesized one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_url_override: Option<String>,
}

impl BuildMetadata {
    /// Capture metadata from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Capture metadata through an injectable variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timestamp = lookup("BUILD_TIMESTAMP_UTC")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(default_timestamp);
        let commit = lookup("GITHUB_SHA").unwrap_or_else(|| "unknown".to_string());
        let run_id = lookup("GITHUB_RUN_ID").filter(|s| !s.is_empty());
        let repository = lookup("GITHUB_REPOSITORY").filter(|s| !s.is_empty());
        let server_url = lookup("GITHUB_SERVER_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let run_url_override = lookup("GITHUB_RUN_URL").filter(|s| !s.is_empty());

        BuildMetadata {
            timestamp,
            commit,
            run_id,
            repository,
            server_url,
            run_url_override,
        }
    }

    /// Resolve the CI run URL: the explicit override wins, otherwise
    /// `<server>/<repository>/actions/runs/<run_id>` when both parts exist
    pub fn run_url(&self) -> Option<String> {
        if let Some(url) = &self.run_url_override {
            return Some(url.clone());
        }
        match (&self.repository, &self.run_id) {
            (Some(repository), Some(run_id)) => Some(format!(
                "{server}/{repository}/actions/runs/{run_id}",
                server = self.server_url
            )),
            _ => None,
        }
    }
}

/// Current UTC time as `YYYY-MM-DD HH:MM:SS UTC`
fn default_timestamp() -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    OffsetDateTime::now_utc().format(&format).unwrap_or_default()
}
