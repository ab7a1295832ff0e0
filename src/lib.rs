pub mod config;
pub mod error;
pub mod ingest;
pub mod logger;
pub mod mirror;
pub mod pager;
pub mod record;
pub mod stamp;
pub mod stats;
pub mod store;
#[cfg(test)]
mod test_support;

pub use error::FeedbackError;
pub use record::FeedbackRecord;
