use super::entity::{EntityKind, LifecycleItem};
use super::page_fetcher::Flow;
use super::window::{Classification, DateWindow, classify};
use super::ActivityError;
use chrono::{DateTime, Utc};

/// Open, closed, and stale totals for one entity kind.
///
/// `open` and `stale` overlap, so their sum with `closed` need not equal the number of
/// entities fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LifecycleCounts {
    pub open: u64,
    pub closed: u64,
    pub stale: u64,
}

/// Accumulates [`LifecycleCounts`] over pages delivered newest-first.
#[derive(Debug)]
pub struct LifecycleCounter<'a> {
    kind: EntityKind,
    window: &'a DateWindow,
    today: DateTime<Utc>,
    stale_days: u32,
    counts: LifecycleCounts,
}

impl<'a> LifecycleCounter<'a> {
    #[must_use]
    pub const fn new(kind: EntityKind, window: &'a DateWindow, today: DateTime<Utc>, stale_days: u32) -> Self {
        Self {
            kind,
            window,
            today,
            stale_days,
            counts: LifecycleCounts { open: 0, closed: 0, stale: 0 },
        }
    }

    /// Count one page and decide whether older pages can still matter.
    ///
    /// Pages arrive sorted by creation date, newest first, so once the oldest entry on a
    /// page predates the window start no later page can hold in-window entries. The check
    /// looks at every entry on the page, including ones that were not counted.
    pub fn observe_page(&mut self, items: &[LifecycleItem]) -> Result<Flow, ActivityError> {
        for item in items {
            if self.kind == EntityKind::Issue && item.is_pull_request() {
                continue;
            }

            match classify(item.created_at, item.status()?, self.window, self.today, self.stale_days) {
                Classification::Excluded => {}
                Classification::ClosedInWindow => self.counts.closed += 1,
                Classification::Open { stale } => {
                    self.counts.open += 1;
                    if stale {
                        self.counts.stale += 1;
                    }
                }
            }
        }

        let oldest = items.iter().map(|item| item.created_at).min();
        Ok(match oldest {
            Some(oldest) if oldest < self.window.start() => Flow::Stop,
            _ => Flow::Continue,
        })
    }

    #[must_use]
    pub const fn counts(&self) -> LifecycleCounts {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::entity::ItemState;
    use crate::activity::window::start_of_day;
    use chrono::NaiveDate;
    use serde::de::IgnoredAny;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        start_of_day(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn open(created: DateTime<Utc>) -> LifecycleItem {
        LifecycleItem {
            number: None,
            created_at: created,
            closed_at: None,
            state: ItemState::Open,
            pull_request: None,
        }
    }

    fn closed(created: DateTime<Utc>, closed_at: DateTime<Utc>) -> LifecycleItem {
        LifecycleItem {
            number: None,
            created_at: created,
            closed_at: Some(closed_at),
            state: ItemState::Closed,
            pull_request: None,
        }
    }

    fn january() -> DateWindow {
        DateWindow::new(day(2024, 1, 1), day(2024, 2, 1)).unwrap()
    }

    #[test]
    fn test_scenario_pull_requests_in_january() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::PullRequest, &window, day(2024, 3, 1), 30);

        let page = vec![
            open(day(2024, 1, 20)),
            closed(day(2024, 1, 10), day(2024, 1, 15)),
            open(day(2023, 12, 1)),
        ];
        let flow = counter.observe_page(&page).unwrap();

        assert_eq!(counter.counts(), LifecycleCounts { open: 1, closed: 1, stale: 1 });
        assert_eq!(flow, Flow::Stop);
    }

    #[test]
    fn test_fully_excluded_page_still_continues_when_newer_than_window() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::Issue, &window, day(2024, 3, 1), 14);

        // everything on this page is newer than the window end
        let page = vec![open(day(2024, 2, 20)), open(day(2024, 2, 10))];
        assert_eq!(counter.observe_page(&page).unwrap(), Flow::Continue);
        assert_eq!(counter.counts(), LifecycleCounts::default());
    }

    #[test]
    fn test_fully_excluded_page_stops_when_older_than_window() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::Issue, &window, day(2024, 3, 1), 14);

        let page = vec![open(day(2023, 12, 20)), open(day(2023, 12, 10))];
        assert_eq!(counter.observe_page(&page).unwrap(), Flow::Stop);
        assert_eq!(counter.counts(), LifecycleCounts::default());
    }

    #[test]
    fn test_oldest_exactly_at_window_start_continues() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::Issue, &window, day(2024, 3, 1), 14);

        let page = vec![open(day(2024, 1, 5)), open(day(2024, 1, 1))];
        assert_eq!(counter.observe_page(&page).unwrap(), Flow::Continue);
        assert_eq!(counter.counts().open, 2);
    }

    #[test]
    fn test_empty_page_continues() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::Issue, &window, day(2024, 3, 1), 14);
        assert_eq!(counter.observe_page(&[]).unwrap(), Flow::Continue);
    }

    #[test]
    fn test_issue_report_skips_pull_requests_but_uses_them_for_termination() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::Issue, &window, day(2024, 3, 1), 14);

        let mut pr = open(day(2023, 11, 1));
        pr.pull_request = Some(IgnoredAny);
        let mut pr_in_window = open(day(2024, 1, 3));
        pr_in_window.pull_request = Some(IgnoredAny);

        let page = vec![open(day(2024, 1, 9)), pr_in_window, pr];
        assert_eq!(counter.observe_page(&page).unwrap(), Flow::Stop);
        assert_eq!(counter.counts(), LifecycleCounts { open: 1, closed: 0, stale: 1 });
    }

    #[test]
    fn test_pull_request_report_counts_all_entries() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::PullRequest, &window, day(2024, 1, 31), 30);

        let mut marked = open(day(2024, 1, 3));
        marked.pull_request = Some(IgnoredAny);
        let _ = counter.observe_page(&[marked]).unwrap();
        assert_eq!(counter.counts().open, 1);
    }

    #[test]
    fn test_closed_items_counted_once_across_pages() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::PullRequest, &window, day(2024, 3, 1), 30);

        let _ = counter.observe_page(&[closed(day(2024, 1, 25), day(2024, 1, 26))]).unwrap();
        let _ = counter.observe_page(&[closed(day(2024, 1, 12), day(2024, 3, 1))]).unwrap();
        let _ = counter.observe_page(&[closed(day(2024, 1, 2), day(2024, 1, 3))]).unwrap();

        assert_eq!(counter.counts(), LifecycleCounts { open: 1, closed: 2, stale: 0 });
    }

    #[test]
    fn test_malformed_item_fails() {
        let window = january();
        let mut counter = LifecycleCounter::new(EntityKind::Issue, &window, day(2024, 3, 1), 14);

        let mut broken = open(day(2024, 1, 9));
        broken.state = ItemState::Closed;
        assert!(matches!(counter.observe_page(&[broken]), Err(ActivityError::MalformedEntity(_))));
    }
}
