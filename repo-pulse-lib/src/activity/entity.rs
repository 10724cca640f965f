use super::ActivityError;
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;
use strum::Display;

/// The entity kinds that go through the lifecycle classification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EntityKind {
    #[strum(serialize = "Pull requests")]
    PullRequest,

    #[strum(serialize = "Issues")]
    Issue,
}

impl EntityKind {
    /// Days after which an open entity of this kind is considered stale, absent configuration.
    #[must_use]
    pub const fn default_stale_days(self) -> u32 {
        match self {
            Self::PullRequest => 30,
            Self::Issue => 14,
        }
    }

    /// Last path segment of the collection endpoint for this kind.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::PullRequest => "pulls",
            Self::Issue => "issues",
        }
    }
}

/// Metadata of the analyzed repository.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    pub created_at: DateTime<Utc>,
}

/// Minimal commit info with only the fields we need
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub sha: Option<String>,

    /// Account linked to the commit author; `null` when the author email maps to no account.
    #[serde(default)]
    pub author: Option<Account>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

impl Commit {
    /// Login of the commit author.
    pub fn author_login(&self) -> Result<&str, ActivityError> {
        match &self.author {
            Some(account) if !account.login.is_empty() => Ok(&account.login),
            _ => Err(ActivityError::MalformedEntity(format!(
                "commit {} has no author login",
                self.sha.as_deref().unwrap_or("<unknown>")
            ))),
        }
    }
}

/// Pull request or issue state: open or closed
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
}

/// Minimal pull request / issue info with only the fields we need
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleItem {
    #[serde(default)]
    pub number: Option<u64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    pub state: ItemState,

    /// Present on entries of the issues endpoint that are really pull requests.
    #[serde(default)]
    pub pull_request: Option<IgnoredAny>,
}

/// Validated lifecycle position of a pull request or issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Open,
    Closed { at: DateTime<Utc> },
}

impl LifecycleItem {
    #[must_use]
    pub const fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Combine `state` and `closed_at`, which must agree: `closed_at` is present iff the item is closed.
    pub fn status(&self) -> Result<Status, ActivityError> {
        match (self.state, self.closed_at) {
            (ItemState::Open, None) => Ok(Status::Open),
            (ItemState::Closed, Some(at)) => Ok(Status::Closed { at }),
            (ItemState::Closed, None) => Err(ActivityError::MalformedEntity(format!(
                "item {} is closed but has no closed_at",
                self.describe()
            ))),
            (ItemState::Open, Some(_)) => Err(ActivityError::MalformedEntity(format!(
                "item {} is open but has a closed_at",
                self.describe()
            ))),
        }
    }

    fn describe(&self) -> String {
        self.number.map_or_else(|| format!("created at {}", self.created_at), |n| format!("#{n}"))
    }
}
