use super::commit_tally::{AuthorCount, CommitTally};
use super::entity::{Commit, EntityKind, LifecycleItem, RepositoryInfo};
use super::lifecycle::{LifecycleCounter, LifecycleCounts};
use super::page_fetcher::{Flow, PageFetcher};
use super::rate_limit::RateLimitGuard;
use super::repo_spec::RepoSpec;
use super::transport::{Endpoint, Transport};
use super::window::DateWindow;
use super::ActivityError;
use chrono::{DateTime, SecondsFormat, Utc};

const LOG_TARGET: &str = "  analyzer";

/// Tunables of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    /// Length of the author ranking.
    pub top_authors: usize,

    /// Entities requested per page.
    pub page_size: u8,

    pub pull_request_stale_days: u32,
    pub issue_stale_days: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_authors: 30,
            page_size: 100,
            pull_request_stale_days: EntityKind::PullRequest.default_stale_days(),
            issue_stale_days: EntityKind::Issue.default_stale_days(),
        }
    }
}

impl AnalysisSettings {
    #[must_use]
    pub const fn stale_days(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::PullRequest => self.pull_request_stale_days,
            EntityKind::Issue => self.issue_stale_days,
        }
    }
}

/// The most active authors over the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub authors: Vec<AuthorCount>,
    pub total_commits: u64,
    pub requests: u32,
}

/// Lifecycle totals of one entity kind over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleReport {
    pub counts: LifecycleCounts,
    pub stale_days: u32,
    pub requests: u32,
}

/// Outcome of one run. Each report either completed or carries the error that ended it.
#[derive(Debug)]
pub struct ActivityReport {
    pub repository: RepoSpec,
    pub window: DateWindow,
    pub branch: String,
    pub commits: Result<CommitReport, ActivityError>,
    pub pull_requests: Result<LifecycleReport, ActivityError>,
    pub issues: Result<LifecycleReport, ActivityError>,
}

impl ActivityReport {
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.commits.is_err() || self.pull_requests.is_err() || self.issues.is_err()
    }
}

/// Computes the three activity reports of one repository.
#[derive(Debug)]
pub struct Analyzer<'a, T> {
    transport: &'a T,
    repo: &'a RepoSpec,
    settings: AnalysisSettings,
}

impl<'a, T: Transport> Analyzer<'a, T> {
    pub const fn new(transport: &'a T, repo: &'a RepoSpec, settings: AnalysisSettings) -> Self {
        Self { transport, repo, settings }
    }

    /// Run all three reports over `[from, to)`.
    ///
    /// `from` defaults to the repository creation date. `today` is the reference point for
    /// staleness. The call itself fails only on problems that affect every report: bad
    /// window bounds, an exhausted quota, or an unresolvable default start. Anything that
    /// goes wrong inside a report is confined to that report.
    pub async fn run(
        &self,
        from: Option<DateTime<Utc>>,
        to: DateTime<Utc>,
        branch: &str,
        today: DateTime<Utc>,
    ) -> Result<ActivityReport, ActivityError> {
        // explicit bounds are checked before any request goes out
        if let Some(from) = from {
            let _ = DateWindow::new(from, to)?;
        }

        RateLimitGuard::new(self.transport).ensure_available().await?;

        let from = match from {
            Some(from) => from,
            None => self.repository_created_at().await?,
        };
        let window = DateWindow::new(from, to)?;

        log::info!(target: LOG_TARGET, "Analyzing {} on branch '{branch}' over {window}", self.repo);

        let (commits, pull_requests, issues) = tokio::join!(
            self.commit_report(&window, branch),
            self.lifecycle_report(EntityKind::PullRequest, &window, Some(branch), today),
            self.lifecycle_report(EntityKind::Issue, &window, None, today),
        );

        Ok(ActivityReport {
            repository: self.repo.clone(),
            window,
            branch: branch.to_string(),
            commits,
            pull_requests,
            issues,
        })
    }

    async fn repository_created_at(&self) -> Result<DateTime<Utc>, ActivityError> {
        let endpoint = Endpoint::new(self.repo.api_path(""));
        let info: RepositoryInfo = PageFetcher::new(self.transport).fetch_document(&endpoint).await?;
        log::debug!(target: LOG_TARGET, "{} was created at {}", self.repo, info.created_at);
        Ok(info.created_at)
    }

    async fn commit_report(&self, window: &DateWindow, branch: &str) -> Result<CommitReport, ActivityError> {
        let endpoint = Endpoint::new(self.repo.api_path("/commits"))
            .param("sha", branch)
            .param("since", timestamp(window.start()))
            .param("until", timestamp(window.end()))
            .param("per_page", self.settings.page_size.to_string());

        log::info!(target: LOG_TARGET, "Collecting commits");
        let mut tally = CommitTally::new();
        let requests = PageFetcher::new(self.transport)
            .for_each_page(&endpoint, |commits: Vec<Commit>| {
                tally.record_all(&commits)?;
                Ok(Flow::Continue)
            })
            .await
            .inspect_err(|e| log::warn!(target: LOG_TARGET, "Commit report failed: {e}"))?;

        log::info!(target: LOG_TARGET, "Counted {} commit(s) in {requests} request(s)", tally.total());
        Ok(CommitReport {
            authors: tally.top(self.settings.top_authors),
            total_commits: tally.total(),
            requests,
        })
    }

    async fn lifecycle_report(
        &self,
        kind: EntityKind,
        window: &DateWindow,
        base: Option<&str>,
        today: DateTime<Utc>,
    ) -> Result<LifecycleReport, ActivityError> {
        let mut endpoint = Endpoint::new(self.repo.api_path(&format!("/{}", kind.resource())));
        if let Some(base) = base {
            endpoint = endpoint.param("base", base);
        }
        let endpoint = endpoint
            .param("state", "all")
            .param("sort", "created")
            .param("direction", "desc")
            .param("per_page", self.settings.page_size.to_string());

        log::info!(target: LOG_TARGET, "Collecting {}", kind.to_string().to_lowercase());
        let stale_days = self.settings.stale_days(kind);
        let mut counter = LifecycleCounter::new(kind, window, today, stale_days);
        let requests = PageFetcher::new(self.transport)
            .for_each_page(&endpoint, |items: Vec<LifecycleItem>| counter.observe_page(&items))
            .await
            .inspect_err(|e| log::warn!(target: LOG_TARGET, "{kind} report failed: {e}"))?;

        let counts = counter.counts();
        log::info!(
            target: LOG_TARGET,
            "{kind}: {} open, {} closed, {} stale in {requests} request(s)",
            counts.open,
            counts.closed,
            counts.stale
        );

        Ok(LifecycleReport {
            counts,
            stale_days,
            requests,
        })
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
