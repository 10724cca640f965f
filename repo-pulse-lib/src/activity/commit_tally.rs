use super::ActivityError;
use super::entity::Commit;
use serde::Serialize;
use std::collections::HashMap;

/// Number of commits attributed to one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub login: String,
    pub commits: u64,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    commits: u64,
    first_seen: usize,
}

/// Per-author commit counts for one report.
#[derive(Debug, Default)]
pub struct CommitTally {
    authors: HashMap<String, Entry>,
    total: u64,
}

impl CommitTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, commit: &Commit) -> Result<(), ActivityError> {
        let login = commit.author_login()?;
        let next_rank = self.authors.len();
        let entry = self.authors.entry(login.to_string()).or_insert(Entry {
            commits: 0,
            first_seen: next_rank,
        });
        entry.commits += 1;
        self.total += 1;
        Ok(())
    }

    /// Record a whole page; the first malformed commit fails the batch.
    pub fn record_all<'c>(&mut self, commits: impl IntoIterator<Item = &'c Commit>) -> Result<(), ActivityError> {
        for commit in commits {
            self.record(commit)?;
        }
        Ok(())
    }

    /// Total commits recorded, across all authors.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The `limit` most active authors, by commit count descending.
    ///
    /// Authors with equal counts keep the order in which their first commit was seen.
    #[must_use]
    pub fn top(&self, limit: usize) -> Vec<AuthorCount> {
        let mut ranked: Vec<(&String, &Entry)> = self.authors.iter().collect();
        ranked.sort_by(|(_, a), (_, b)| b.commits.cmp(&a.commits).then_with(|| a.first_seen.cmp(&b.first_seen)));

        ranked
            .into_iter()
            .take(limit)
            .map(|(login, entry)| AuthorCount {
                login: login.clone(),
                commits: entry.commits,
            })
            .collect()
    }
}
