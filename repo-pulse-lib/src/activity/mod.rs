//! Activity aggregation for hosted repositories
//!
//! This module turns the paginated REST resources of a hosting service into three windowed
//! reports: the most active commit authors, pull request lifecycle counts, and issue
//! lifecycle counts.
//!
//! # Implementation Model
//!
//! Everything talks to the server through the [`Transport`] trait. [`Client`] is the
//! production implementation on top of `reqwest`; tests substitute a scripted fake.
//!
//! - **[`PageFetcher`]** walks one resource page by page in server order and turns
//!   unusable bodies into [`ActivityError::ResponseFormat`], consulting the quota to
//!   explain them.
//! - **[`RateLimitGuard`]** reads the remaining request quota, both before a run and
//!   when diagnosing a failed page.
//! - **[`DateWindow`]** and [`classify`] hold the window policy shared by pull requests
//!   and issues.
//! - **[`CommitTally`]** ranks authors; **[`LifecycleCounter`]** produces open, closed,
//!   and stale totals and decides when pagination can stop early.
//! - **[`Analyzer`]** runs the three reports concurrently for one repository and keeps a
//!   failure in one report from affecting the others.

mod analyzer;
mod client;
mod commit_tally;
mod entity;
mod error;
mod lifecycle;
mod page_fetcher;
mod rate_limit;
mod repo_spec;
mod transport;
mod window;

#[cfg(test)]
mod test_support;

pub use analyzer::{ActivityReport, AnalysisSettings, Analyzer, CommitReport, LifecycleReport};
pub use client::Client;
pub use commit_tally::{AuthorCount, CommitTally};
pub use entity::{Account, Commit, EntityKind, ItemState, LifecycleItem, RepositoryInfo, Status};
pub use error::{ActivityError, FormatCause};
pub use lifecycle::{LifecycleCounter, LifecycleCounts};
pub use page_fetcher::{Flow, Page, PageFetcher};
pub use rate_limit::{Quota, RateLimitGuard};
pub use repo_spec::RepoSpec;
pub use transport::{ContinuationToken, Endpoint, Response, Target, Transport};
pub use window::{Classification, DateWindow, classify, start_of_day};
