use super::ActivityError;
use super::entity::Status;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use core::fmt::{Display, Formatter};

/// The `[start, end)` interval restricting which entities count toward a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ActivityError> {
        if start > end {
            return Err(ActivityError::Usage(format!(
                "window start {} is later than window end {}",
                start.date_naive(),
                end.date_naive()
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

impl Display for DateWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}, {})", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

/// Midnight UTC at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Where a pull request or issue lands relative to a window.
///
/// `Open` carries the staleness flag because the two buckets overlap: a stale entity is
/// always also counted as open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Excluded,
    Open { stale: bool },
    ClosedInWindow,
}

/// Classify one entity.
///
/// Entities closed on or after the window end count as open relative to the window, but
/// only entities that are open right now can be stale. Age is measured from creation to
/// `today`, independent of the window end.
#[must_use]
pub fn classify(created_at: DateTime<Utc>, status: Status, window: &DateWindow, today: DateTime<Utc>, stale_days: u32) -> Classification {
    if !window.contains(created_at) {
        return Classification::Excluded;
    }

    match status {
        Status::Closed { at } if at < window.end() => Classification::ClosedInWindow,
        Status::Closed { .. } => Classification::Open { stale: false },
        Status::Open => Classification::Open {
            stale: (today - created_at).num_days() > i64::from(stale_days),
        },
    }
}
