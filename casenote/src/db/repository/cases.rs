use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::{CasenoteError, Result};
use crate::models::{Case, CaseStatus, Gender};

pub struct CaseRepository;

impl CaseRepository {
    pub async fn create(conn: &Connection, case: &Case) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO cases (
                id, name, age, gender, reason_for_admission, status,
                summary, discharge_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                case.id.clone(),
                case.name.clone(),
                case.age,
                case.gender.to_string(),
                case.reason_for_admission.clone(),
                case.status.to_string(),
                case.summary.clone(),
                case.discharge_date.map(|dt| dt.to_rfc3339()),
                case.created_at.to_rfc3339(),
                case.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &str) -> Result<Option<Case>> {
        let mut rows = conn
            .query("SELECT * FROM cases WHERE id = ?1", params![id])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_case(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list(conn: &Connection, limit: u32, offset: u32) -> Result<Vec<Case>> {
        let mut rows = conn
            .query(
                "SELECT * FROM cases ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
                params![limit, offset],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_case(&row)?);
        }
        Ok(results)
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn.query("SELECT COUNT(*) FROM cases", ()).await?;
        if let Some(row) = rows.next().await? {
            Ok(row.get::<i64>(0)? as u64)
        } else {
            Ok(0)
        }
    }

    pub async fn update(conn: &Connection, case: &Case) -> Result<()> {
        conn.execute(
            r#"
            UPDATE cases SET
                name = ?2,
                age = ?3,
                gender = ?4,
                reason_for_admission = ?5,
                status = ?6,
                discharge_date = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
            params![
                case.id.clone(),
                case.name.clone(),
                case.age,
                case.gender.to_string(),
                case.reason_for_admission.clone(),
                case.status.to_string(),
                case.discharge_date.map(|dt| dt.to_rfc3339()),
                case.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Delete a case and everything it owns.
    ///
    /// Child rows are removed explicitly because `PRAGMA foreign_keys` is
    /// per-connection in SQLite; the schema-level cascade is a backstop.
    pub async fn delete(conn: &Connection, id: &str) -> Result<bool> {
        conn.execute("DELETE FROM notes WHERE case_id = ?1", params![id])
            .await?;
        conn.execute("DELETE FROM interactions WHERE case_id = ?1", params![id])
            .await?;
        let affected = conn
            .execute("DELETE FROM cases WHERE id = ?1", params![id])
            .await?;
        Ok(affected > 0)
    }

    /// Persist the summary and flip the case to `closed` in one statement.
    ///
    /// The `status != 'closed'` predicate is the optimistic guard: of two
    /// concurrent close attempts only one updates a row, the other gets
    /// `InvalidState`.
    pub async fn close_with_summary(conn: &Connection, id: &str, summary: &str) -> Result<Case> {
        let now = Utc::now();
        let affected = conn
            .execute(
                r#"
                UPDATE cases SET
                    summary = ?2,
                    status = 'closed',
                    updated_at = ?3
                WHERE id = ?1 AND status != 'closed'
                "#,
                params![id, summary, now.to_rfc3339()],
            )
            .await?;

        if affected == 0 {
            return match Self::get_by_id(conn, id).await? {
                Some(_) => Err(CasenoteError::InvalidState(format!(
                    "Case {id} is already closed"
                ))),
                None => Err(CasenoteError::NotFound(format!("Case {id} not found"))),
            };
        }

        Self::get_by_id(conn, id)
            .await?
            .ok_or_else(|| CasenoteError::NotFound(format!("Case {id} not found")))
    }

    fn row_to_case(row: &libsql::Row) -> Result<Case> {
        Ok(Case {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get::<String>(3)?.parse().unwrap_or(Gender::Other),
            reason_for_admission: row.get(4)?,
            status: row.get::<String>(5)?.parse().unwrap_or(CaseStatus::Open),
            summary: row.get(6)?,
            discharge_date: row
                .get::<Option<String>>(7)?
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
            created_at: DateTime::parse_from_rfc3339(&row.get::<String>(8)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            updated_at: DateTime::parse_from_rfc3339(&row.get::<String>(9)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Gender, Note};

    async fn setup() -> (Database, Connection) {
        let db = Database::in_memory().await.unwrap();
        let conn = db.connect().unwrap();
        (db, conn)
    }

    fn sample_case(id: &str) -> Case {
        Case::new(
            id.to_string(),
            "John Smith".to_string(),
            67,
            Gender::Male,
            "Shortness of breath".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_db, conn) = setup().await;
        let case = sample_case("case-1");
        CaseRepository::create(&conn, &case).await.unwrap();

        let fetched = CaseRepository::get_by_id(&conn, "case-1")
            .await
            .unwrap()
            .expect("case should exist");
        assert_eq!(fetched.name, "John Smith");
        assert_eq!(fetched.status, CaseStatus::Open);
        assert!(fetched.summary.is_none());
    }

    #[tokio::test]
    async fn test_close_with_summary_sets_status_and_timestamp() {
        let (_db, conn) = setup().await;
        let case = sample_case("case-2");
        CaseRepository::create(&conn, &case).await.unwrap();

        let closed = CaseRepository::close_with_summary(&conn, "case-2", "S")
            .await
            .unwrap();
        assert_eq!(closed.status, CaseStatus::Closed);
        assert_eq!(closed.summary.as_deref(), Some("S"));
        assert!(closed.updated_at > case.updated_at);
    }

    #[tokio::test]
    async fn test_double_close_is_a_conflict() {
        let (_db, conn) = setup().await;
        CaseRepository::create(&conn, &sample_case("case-3"))
            .await
            .unwrap();

        CaseRepository::close_with_summary(&conn, "case-3", "first")
            .await
            .unwrap();
        let err = CaseRepository::close_with_summary(&conn, "case-3", "second")
            .await
            .unwrap_err();
        assert!(matches!(err, CasenoteError::InvalidState(_)));

        // The first summary must survive the rejected second attempt.
        let case = CaseRepository::get_by_id(&conn, "case-3")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(case.summary.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_close_missing_case_is_not_found() {
        let (_db, conn) = setup().await;
        let err = CaseRepository::close_with_summary(&conn, "ghost", "S")
            .await
            .unwrap_err();
        assert!(matches!(err, CasenoteError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_notes() {
        let (_db, conn) = setup().await;
        CaseRepository::create(&conn, &sample_case("case-4"))
            .await
            .unwrap();
        let note = Note::new(
            "note-1".to_string(),
            "case-4".to_string(),
            "Patient stable".to_string(),
            Utc::now(),
        );
        crate::db::repository::NoteRepository::create(&conn, &note)
            .await
            .unwrap();

        assert!(CaseRepository::delete(&conn, "case-4").await.unwrap());

        let notes = crate::db::repository::NoteRepository::list_for_case(&conn, "case-4")
            .await
            .unwrap();
        assert!(notes.is_empty());
    }
}
