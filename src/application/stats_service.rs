use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::errors::DomainError;
use crate::domain::ports::OrderRepository;
use crate::domain::stats::{DayWindow, OrderStats};

/// Order totals overall and for the current calendar day. "Today" is the
/// day as seen from `day_offset`.
pub struct StatsService<R> {
    repo: R,
    day_offset: FixedOffset,
}

impl<R: OrderRepository> StatsService<R> {
    pub fn new(repo: R, day_offset: FixedOffset) -> Self {
        Self { repo, day_offset }
    }

    pub fn order_stats(&self) -> Result<OrderStats, DomainError> {
        self.order_stats_at(Utc::now())
    }

    pub fn order_stats_at(&self, now: DateTime<Utc>) -> Result<OrderStats, DomainError> {
        let today = DayWindow::containing(now, self.day_offset);
        log::debug!("Computing order stats for [{}, {})", today.start, today.end);
        self.repo.stats(today)
    }
}
