use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped free-text clinical entry attached to a case.
///
/// `visit_date` records when the visit happened and drives note ordering;
/// `created_at` records when the row was written. They routinely differ
/// because notes are entered after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub case_id: String,
    pub content: String,
    pub visit_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn new(id: String, case_id: String, content: String, visit_date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id,
            case_id,
            content,
            visit_date,
            created_at: now,
            updated_at: now,
        }
    }
}
