use std::sync::Arc;

use libsql::Connection;

use crate::db::repository::{CaseRepository, NoteRepository};
use crate::error::{CasenoteError, Result};
use crate::llm::SummaryProvider;
use crate::models::Case;
use crate::services::rate_limit::{Admission, FixedWindowLimiter};

/// Orchestrates summary generation for a case.
///
/// Order of checks: admission control first (rejected requests must not
/// touch the provider), then case lookup and the closed-state check, then
/// the provider call, and finally the guarded close. Nothing is persisted
/// until the provider has produced a usable summary.
pub struct SummaryService {
    provider: SummaryProvider,
    limiter: Arc<FixedWindowLimiter>,
    max_notes: usize,
}

impl SummaryService {
    pub fn new(
        provider: SummaryProvider,
        limiter: Arc<FixedWindowLimiter>,
        max_notes: usize,
    ) -> Self {
        Self {
            provider,
            limiter,
            max_notes,
        }
    }

    /// Generate a summary for the case and close it.
    pub async fn summarize_and_close(&self, conn: &Connection, case_id: &str) -> Result<Case> {
        if let Admission::Rejected { retry_after_secs } = self.limiter.admit() {
            return Err(CasenoteError::RateLimited {
                retry_after: Some(retry_after_secs),
            });
        }

        let case = CaseRepository::get_by_id(conn, case_id)
            .await?
            .ok_or_else(|| CasenoteError::NotFound(format!("Case {case_id} not found")))?;

        // Cheap pre-check; the UPDATE predicate is the authoritative guard.
        if case.status == crate::models::CaseStatus::Closed {
            return Err(CasenoteError::InvalidState(format!(
                "Case {case_id} is already closed"
            )));
        }

        let notes = NoteRepository::list_for_case(conn, case_id).await?;
        let start = notes.len().saturating_sub(self.max_notes);
        let recent = &notes[start..];

        let summary = self.provider.summarize_case(&case, recent).await?;

        CaseRepository::close_with_summary(conn, case_id, &summary).await
    }
}
