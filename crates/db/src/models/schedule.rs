use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    NotStarted = 1,
    InProgress = 2,
    Done = 3,
}

/// Completion record for one maintenance task on one planting in a given
/// month. At most one row exists per (planting, task, month).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MaintenanceSchedule {
    pub id: Uuid,
    pub planting_id: Uuid,
    pub maintenance_id: Uuid,
    pub status: ScheduleStatus,
    pub completion_date: Option<NaiveDate>,
    pub month: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateSchedule {
    pub maintenance_id: Uuid,
    pub month: i32,
    pub status: Option<ScheduleStatus>,
}

impl MaintenanceSchedule {
    /// Creates the record, or refreshes the status of the existing one for
    /// the same (planting, task, month).
    pub async fn upsert(
        pool: &SqlitePool,
        planting_id: Uuid,
        data: &CreateSchedule,
        completion_date: Option<NaiveDate>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let status = data.status.unwrap_or_default();
        sqlx::query_as::<_, MaintenanceSchedule>(
            r#"INSERT INTO maintenance_schedules
                   (id, planting_id, maintenance_id, status, completion_date, month)
               VALUES ($1, $2, $3, $4, $5, $6)
               ON CONFLICT (planting_id, maintenance_id, month) DO UPDATE SET
                   status = excluded.status,
                   completion_date = excluded.completion_date,
                   updated_at = CURRENT_TIMESTAMP
               RETURNING *"#,
        )
        .bind(id)
        .bind(planting_id)
        .bind(data.maintenance_id)
        .bind(status)
        .bind(completion_date)
        .bind(data.month)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MaintenanceSchedule>(
            "SELECT * FROM maintenance_schedules WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_planting_id(
        pool: &SqlitePool,
        planting_id: Uuid,
        month: Option<i32>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, MaintenanceSchedule>(
            r#"SELECT * FROM maintenance_schedules
               WHERE planting_id = $1
                 AND ($2 IS NULL OR month = $2)
               ORDER BY month, created_at"#,
        )
        .bind(planting_id)
        .bind(month)
        .fetch_all(pool)
        .await
    }

    pub async fn set_status(
        pool: &SqlitePool,
        id: Uuid,
        status: ScheduleStatus,
        completion_date: Option<NaiveDate>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, MaintenanceSchedule>(
            r#"UPDATE maintenance_schedules
               SET status = $2, completion_date = $3, updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(status)
        .bind(completion_date)
        .fetch_one(pool)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM maintenance_schedules WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
