use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::Interaction;

pub struct InteractionRepository;

impl InteractionRepository {
    pub async fn create(conn: &Connection, interaction: &Interaction) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO interactions (
                id, case_id, kind, date, notes, diagnosis, prescription,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                interaction.id.clone(),
                interaction.case_id.clone(),
                interaction.kind.clone(),
                interaction.date.to_rfc3339(),
                interaction.notes.clone(),
                interaction.diagnosis.clone(),
                interaction.prescription.clone(),
                interaction.created_at.to_rfc3339(),
                interaction.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    /// All interactions for a case in chronological order.
    pub async fn list_for_case(conn: &Connection, case_id: &str) -> Result<Vec<Interaction>> {
        let mut rows = conn
            .query(
                "SELECT * FROM interactions WHERE case_id = ?1 ORDER BY date ASC, created_at ASC",
                params![case_id],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_interaction(&row)?);
        }
        Ok(results)
    }

    fn row_to_interaction(row: &libsql::Row) -> Result<Interaction> {
        Ok(Interaction {
            id: row.get(0)?,
            case_id: row.get(1)?,
            kind: row.get(2)?,
            date: parse_timestamp(&row.get::<String>(3)?),
            notes: row.get(4)?,
            diagnosis: row.get(5)?,
            prescription: row.get(6)?,
            created_at: parse_timestamp(&row.get::<String>(7)?),
            updated_at: parse_timestamp(&row.get::<String>(8)?),
        })
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
