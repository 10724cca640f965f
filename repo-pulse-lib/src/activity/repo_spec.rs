use super::ActivityError;
use core::fmt::{Display, Formatter};
use std::sync::Arc;
use url::Url;

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    url: Arc<Url>,
    owner: Arc<str>,
    repo: Arc<str>,
}

impl RepoSpec {
    /// Parse a repository web URL such as `https://github.com/owner/repo`.
    ///
    /// A trailing `.git` and any path segments beyond the repository name are dropped.
    pub fn parse(text: &str) -> Result<Self, ActivityError> {
        let url = Url::parse(text).map_err(|e| ActivityError::Usage(format!("invalid repository URL '{text}': {e}")))?;
        let path_segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();

        if path_segments.len() < 2 {
            return Err(ActivityError::Usage(format!("invalid repository URL format: {url}")));
        }

        let owner = path_segments[0];
        let repo = path_segments[1].trim_end_matches(".git");
        if owner.is_empty() || repo.is_empty() {
            return Err(ActivityError::Usage(format!("invalid repository URL: empty owner or repo name: {url}")));
        }

        let host = url.host_str().unwrap_or_default();
        let scheme = url.scheme();

        // Reconstruct a clean URL with only scheme://host/owner/repo
        let clean_url = Url::parse(&format!("{scheme}://{host}/{owner}/{repo}"))
            .map_err(|e| ActivityError::Usage(format!("invalid repository URL '{text}': {e}")))?;

        Ok(Self {
            owner: Arc::from(owner),
            repo: Arc::from(repo),
            url: Arc::new(clean_url),
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// API path of a resource below this repository, e.g. `api_path("/commits")`.
    #[must_use]
    pub fn api_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{suffix}", self.owner, self.repo)
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.url)
    }
}
