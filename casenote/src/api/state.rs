use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::Database;
use crate::llm::SummaryProvider;
use crate::services::{FixedWindowLimiter, SummaryService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<Database>,
    pub summarizer: SummaryProvider,
    pub summary: Arc<SummaryService>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        let config = Arc::new(config);
        let db = Arc::new(db);
        let summarizer = SummaryProvider::new(config.summarizer.as_ref());
        let limiter = Arc::new(FixedWindowLimiter::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        ));
        let summary = Arc::new(SummaryService::new(
            summarizer.clone(),
            limiter,
            config.summary.max_notes,
        ));

        Self {
            config,
            db,
            summarizer,
            summary,
        }
    }
}
