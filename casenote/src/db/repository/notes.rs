use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::Note;

pub struct NoteRepository;

impl NoteRepository {
    pub async fn create(conn: &Connection, note: &Note) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO notes (id, case_id, content, visit_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                note.id.clone(),
                note.case_id.clone(),
                note.content.clone(),
                note.visit_date.to_rfc3339(),
                note.created_at.to_rfc3339(),
                note.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<Note>> {
        let mut rows = conn
            .query("SELECT * FROM notes WHERE id = ?1", params![id])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_note(&row)?))
        } else {
            Ok(None)
        }
    }

    /// All notes for a case in chronological visit order.
    pub async fn list_for_case(conn: &Connection, case_id: &str) -> Result<Vec<Note>> {
        let mut rows = conn
            .query(
                "SELECT * FROM notes WHERE case_id = ?1 ORDER BY visit_date ASC, created_at ASC",
                params![case_id],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_note(&row)?);
        }
        Ok(results)
    }

    pub async fn update(conn: &Connection, note: &Note) -> Result<()> {
        conn.execute(
            r#"
            UPDATE notes SET
                content = ?2,
                visit_date = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
            params![
                note.id.clone(),
                note.content.clone(),
                note.visit_date.to_rfc3339(),
                note.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let affected = conn
            .execute("DELETE FROM notes WHERE id = ?1", params![id])
            .await?;
        Ok(affected > 0)
    }

    fn row_to_note(row: &libsql::Row) -> Result<Note> {
        Ok(Note {
            id: row.get(0)?,
            case_id: row.get(1)?,
            content: row.get(2)?,
            visit_date: parse_timestamp(&row.get::<String>(3)?),
            created_at: parse_timestamp(&row.get::<String>(4)?),
            updated_at: parse_timestamp(&row.get::<String>(5)?),
        })
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
