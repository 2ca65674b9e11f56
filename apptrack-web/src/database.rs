//! SQLite-backed appointment storage

use crate::error::ApiError;
use apptrack_core::{Appointment, AppointmentStatus};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

/// Appointment store
#[derive(Debug, Clone)]
pub struct AppointmentStore {
    pool: SqlitePool,
}

impl AppointmentStore {
    /// Create the store and its schema
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<(), sqlx::Error> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS appointments (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'scheduled',
                reminder INTEGER NOT NULL DEFAULT 1,
                reminder_time TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_appointments_user ON appointments(user_id);
            CREATE INDEX IF NOT EXISTS idx_appointments_start ON appointments(start_time);
        "#;

        sqlx::query(query).execute(&self.pool).await?;

        debug!("appointments table ready");
        Ok(())
    }

    /// Insert a new appointment
    pub async fn insert(&self, appointment: &Appointment) -> Result<(), ApiError> {
        let query = r#"
            INSERT INTO appointments
                (id, user_id, title, description, start_time, end_time,
                 status, reminder, reminder_time, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&appointment.id)
            .bind(&appointment.user_id)
            .bind(&appointment.title)
            .bind(&appointment.description)
            .bind(appointment.start_time.to_rfc3339())
            .bind(appointment.end_time.to_rfc3339())
            .bind(appointment.status.as_str())
            .bind(appointment.reminder)
            .bind(appointment.reminder_time.map(|t| t.to_rfc3339()))
            .bind(appointment.created_at.to_rfc3339())
            .bind(appointment.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List a user's appointments ordered by start time
    ///
    /// `from`/`to` bound the start time; RFC 3339 UTC strings compare in
    /// time order, so the bounds apply directly in SQL.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Appointment>, ApiError> {
        let mut sql = String::from("SELECT * FROM appointments WHERE user_id = ?");
        if from.is_some() {
            sql.push_str(" AND start_time >= ?");
        }
        if to.is_some() {
            sql.push_str(" AND start_time <= ?");
        }
        sql.push_str(" ORDER BY start_time ASC");

        let mut query = sqlx::query(&sql).bind(user_id);
        if let Some(from) = from {
            query = query.bind(from.to_rfc3339());
        }
        if let Some(to) = to {
            query = query.bind(to.to_rfc3339());
        }

        let rows = query.fetch_all(&self.pool).await?;

        rows.iter().map(row_to_appointment).collect()
    }

    /// Get an appointment by id
    pub async fn get(&self, id: &str) -> Result<Option<Appointment>, ApiError> {
        let row = sqlx::query("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_appointment).transpose()
    }

    /// Persist changed fields of an existing appointment
    pub async fn update(&self, appointment: &Appointment) -> Result<(), ApiError> {
        let query = r#"
            UPDATE appointments
            SET title = ?, description = ?, start_time = ?, end_time = ?,
                status = ?, reminder = ?, reminder_time = ?, updated_at = ?
            WHERE id = ?
        "#;

        sqlx::query(query)
            .bind(&appointment.title)
            .bind(&appointment.description)
            .bind(appointment.start_time.to_rfc3339())
            .bind(appointment.end_time.to_rfc3339())
            .bind(appointment.status.as_str())
            .bind(appointment.reminder)
            .bind(appointment.reminder_time.map(|t| t.to_rfc3339()))
            .bind(appointment.updated_at.to_rfc3339())
            .bind(&appointment.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete an appointment by id
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn row_to_appointment(row: &sqlx::sqlite::SqliteRow) -> Result<Appointment, ApiError> {
    let status: String = row.get("status");
    let status: AppointmentStatus = status.parse()?;

    Ok(Appointment {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        start_time: parse_timestamp(row.get("start_time"))?,
        end_time: parse_timestamp(row.get("end_time"))?,
        status,
        reminder: row.get("reminder"),
        reminder_time: row
            .get::<Option<String>, _>("reminder_time")
            .map(parse_timestamp)
            .transpose()?,
        created_at: parse_timestamp(row.get("created_at"))?,
        updated_at: parse_timestamp(row.get("updated_at"))?,
    })
}

fn parse_timestamp(value: String) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::internal(format!("invalid timestamp in store: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn sample(user_id: &str, start: DateTime<Utc>) -> Appointment {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: "Standup".to_string(),
            description: "Daily sync".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(30),
            status: AppointmentStatus::Scheduled,
            reminder: true,
            reminder_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn file_backed_store(dir: &tempfile::TempDir) -> AppointmentStore {
        let path = dir.path().join("apptrack-test.db");
        let url = format!("sqlite:{}", path.display());
        let pool = crate::state::connect_pool(&url).await.unwrap();
        AppointmentStore::new(pool).await.unwrap()
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_backed_store(&dir).await;

        let appointment = sample("user-a", Utc::now());
        store.insert(&appointment).await.unwrap();

        let fetched = store.get(&appointment.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Standup");
        assert_eq!(fetched.user_id, "user-a");
        assert_eq!(fetched.status, AppointmentStatus::Scheduled);

        let mut changed = fetched.clone();
        changed.status = AppointmentStatus::Completed;
        changed.title = "Retro".to_string();
        store.update(&changed).await.unwrap();

        let fetched = store.get(&appointment.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, AppointmentStatus::Completed);
        assert_eq!(fetched.title, "Retro");

        store.delete(&appointment.id).await.unwrap();
        assert!(store.get(&appointment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_backed_store(&dir).await;

        let base = Utc::now();
        let later = sample("user-a", base + Duration::hours(2));
        let earlier = sample("user-a", base);
        let foreign = sample("user-b", base + Duration::hours(1));

        for appointment in [&later, &earlier, &foreign] {
            store.insert(appointment).await.unwrap();
        }

        let listed = store.list_for_user("user-a", None, None).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, earlier.id);
        assert_eq!(listed[1].id, later.id);
    }

    #[tokio::test]
    async fn list_applies_start_time_window() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_backed_store(&dir).await;

        let base = Utc::now();
        let inside = sample("user-a", base + Duration::days(1));
        let outside = sample("user-a", base + Duration::days(10));
        store.insert(&inside).await.unwrap();
        store.insert(&outside).await.unwrap();

        let listed = store
            .list_for_user(
                "user-a",
                Some(base),
                Some(base + Duration::days(2)),
            )
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, inside.id);
    }
}
