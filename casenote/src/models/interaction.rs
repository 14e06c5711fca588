use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured clinical interaction (consultation, follow-up, test, ...)
/// attached to a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub case_id: String,
    pub kind: String,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(
        id: String,
        case_id: String,
        kind: String,
        date: DateTime<Utc>,
        notes: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            case_id,
            kind,
            date,
            notes,
            diagnosis: None,
            prescription: None,
            created_at: now,
            updated_at: now,
        }
    }
}
