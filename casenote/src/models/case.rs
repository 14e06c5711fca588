use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a case.
///
/// A case is created `open`, may pass through `discharged` while the patient
/// has left but the record is still being amended, and ends `closed` once a
/// summary has been written. Closing is a one-way transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Open,
    Discharged,
    Closed,
}

impl CaseStatus {
    /// Whether notes and interactions may still be added or edited.
    pub fn accepts_updates(&self) -> bool {
        !matches!(self, CaseStatus::Closed)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseStatus::Open => write!(f, "open"),
            CaseStatus::Discharged => write!(f, "discharged"),
            CaseStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for CaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(CaseStatus::Open),
            "discharged" => Ok(CaseStatus::Discharged),
            "closed" => Ok(CaseStatus::Closed),
            other => Err(format!("Unknown case status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            unknown => Err(format!("Unknown gender: {unknown}")),
        }
    }
}

/// A patient encounter record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub reason_for_admission: String,
    pub status: CaseStatus,
    pub summary: Option<String>,
    pub discharge_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    pub fn new(
        id: String,
        name: String,
        age: i64,
        gender: Gender,
        reason_for_admission: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            age,
            gender,
            reason_for_admission,
            status: CaseStatus::default(),
            summary: None,
            discharge_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}
