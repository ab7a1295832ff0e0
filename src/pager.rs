use crate::error::FeedbackError;
use crate::record::FeedbackRecord;
use crate::store::{FeedbackStore, StoreBackend};

pub const PAGE_SIZE: i64 = 20;

pub struct HistoryPage {
    pub number: i64,
    pub records: Vec<FeedbackRecord>,
    pub total_pages: i64,
}

/// Fixed-size windows over the record history, newest first.
pub struct HistoryPager {
    store: StoreBackend,
}

impl HistoryPager {
    pub fn new(store: StoreBackend) -> Self {
        HistoryPager { store }
    }

    /// Fetches one 1-based page. Page numbers below 1 are clamped to 1,
    /// matching the original system; pages past the end come back empty.
    pub async fn page(&self, number: i64) -> Result<HistoryPage, FeedbackError> {
        let number = number.max(1);
        let total = self.store.total_count().await?;
        let total_pages = (total + PAGE_SIZE - 1) / PAGE_SIZE;
        let offset = (number - 1) * PAGE_SIZE;
        let records = self.store.page(PAGE_SIZE, offset).await?;
        Ok(HistoryPage {
            number,
            records,
            total_pages,
        })
    }
}
