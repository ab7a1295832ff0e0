use chrono::NaiveDate;

use crate::error::FeedbackError;
use crate::store::{FeedbackStore, LabelCounts, StoreBackend};

/// Per-label tallies for one dashboard render: today's counts plus up to
/// two caller-chosen comparison dates.
pub struct DashboardCounts {
    pub today: LabelCounts,
    pub first: Option<LabelCounts>,
    pub second: Option<LabelCounts>,
}

pub struct AggregationEngine {
    store: StoreBackend,
}

impl AggregationEngine {
    pub fn new(store: StoreBackend) -> Self {
        AggregationEngine { store }
    }

    /// Counts per satisfaction label for one calendar date, or over all
    /// time when no date is given.
    pub async fn counts_by_label(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<LabelCounts, FeedbackError> {
        self.store.count_by_label(date).await
    }

    pub async fn dashboard(
        &self,
        today: NaiveDate,
        first: Option<NaiveDate>,
        second: Option<NaiveDate>,
    ) -> Result<DashboardCounts, FeedbackError> {
        let today = self.counts_by_label(Some(today)).await?;
        let first = match first {
            Some(date) => Some(self.counts_by_label(Some(date)).await?),
            None => None,
        };
        let second = match second {
            Some(date) => Some(self.counts_by_label(Some(date)).await?),
            None => None,
        };
        Ok(DashboardCounts {
            today,
            first,
            second,
        })
    }
}
