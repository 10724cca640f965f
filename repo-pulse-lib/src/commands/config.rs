use crate::Result;
use crate::activity::AnalysisSettings;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::Deserialize;
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

const LOG_TARGET: &str = "    config";

/// Name of the configuration file picked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "pulse.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the hosting service's REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Number of authors listed in the commit report
    #[serde(default = "default_top_authors")]
    pub top_authors: u32,

    /// Entities requested per page (1..=100)
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Days after which an open pull request counts as stale
    #[serde(default = "default_pull_request_stale_days")]
    pub pull_request_stale_days: u32,

    /// Days after which an open issue counts as stale
    #[serde(default = "default_issue_stale_days")]
    pub issue_stale_days: u32,

    /// Deadline for each individual request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_top_authors() -> u32 {
    30
}

const fn default_page_size() -> u8 {
    100
}

const fn default_pull_request_stale_days() -> u32 {
    30
}

const fn default_issue_stale_days() -> u32 {
    14
}

const fn default_request_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `pulse.toml` in `base_dir` is used when it exists.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading repo-pulse configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: LOG_TARGET, "No {CONFIG_FILE_NAME} in {base_dir}, using the default configuration");
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading repo-pulse configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.top_authors == 0 {
            return Err(app_err!("top_authors must be at least 1"));
        }

        if !(1..=100).contains(&self.page_size) {
            return Err(app_err!("page_size must be between 1 and 100, got {}", self.page_size));
        }

        if self.request_timeout_secs == 0 {
            return Err(app_err!("request_timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Engine settings, with the author count optionally overridden from the command line.
    #[must_use]
    pub fn analysis_settings(&self, top_override: Option<u32>) -> AnalysisSettings {
        let top = top_override.unwrap_or(self.top_authors);
        AnalysisSettings {
            top_authors: usize::try_from(top).unwrap_or(usize::MAX),
            page_size: self.page_size,
            pull_request_stale_days: self.pull_request_stale_days,
            issue_stale_days: self.issue_stale_days,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
