use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    Pruning = 1,
    Fertilizing = 2,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WeekOfMonth {
    First = 1,
    Second = 2,
    Third = 3,
    Fourth = 4,
    Last = 5,
}

/// A recurring care task template for a plant, scheduled by month and
/// week-of-month.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PlantMaintenance {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub task: TaskKind,
    pub task_description: String,
    pub week_of_month: WeekOfMonth,
    pub month: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePlantMaintenance {
    pub plant_id: Uuid,
    pub task: TaskKind,
    pub task_description: String,
    pub week_of_month: WeekOfMonth,
    pub month: i32,
}

pub type UpdatePlantMaintenance = CreatePlantMaintenance;

/// A maintenance task joined with the name of the plant it belongs to, as
/// listed on a garden's monthly schedule.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct GardenTask {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub task: PlantMaintenance,
    pub plant_name: String,
}

impl PlantMaintenance {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreatePlantMaintenance,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, PlantMaintenance>(
            r#"INSERT INTO plant_maintenance (id, plant_id, task, task_description, week_of_month, month)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.plant_id)
        .bind(data.task)
        .bind(&data.task_description)
        .bind(data.week_of_month)
        .bind(data.month)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PlantMaintenance>("SELECT * FROM plant_maintenance WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_plant_id(
        pool: &SqlitePool,
        plant_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PlantMaintenance>(
            r#"SELECT * FROM plant_maintenance
               WHERE plant_id = $1
               ORDER BY month, week_of_month, created_at"#,
        )
        .bind(plant_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdatePlantMaintenance,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PlantMaintenance>(
            r#"UPDATE plant_maintenance
               SET plant_id = $2, task = $3, task_description = $4,
                   week_of_month = $5, month = $6, updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.plant_id)
        .bind(data.task)
        .bind(&data.task_description)
        .bind(data.week_of_month)
        .bind(data.month)
        .fetch_one(pool)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM plant_maintenance WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Tasks for every plant planted in the garden, optionally restricted to
    /// one month. A plant planted more than once contributes its tasks once.
    pub async fn count_for_garden(
        pool: &SqlitePool,
        garden_id: Uuid,
        month: Option<i32>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(DISTINCT m.id)
               FROM plant_maintenance m
               JOIN plantings pg ON pg.plant_id = m.plant_id
               WHERE pg.garden_id = $1
                 AND ($2 IS NULL OR m.month = $2)"#,
        )
        .bind(garden_id)
        .bind(month)
        .fetch_one(pool)
        .await
    }

    pub async fn find_for_garden(
        pool: &SqlitePool,
        garden_id: Uuid,
        month: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GardenTask>, sqlx::Error> {
        sqlx::query_as::<_, GardenTask>(
            r#"SELECT DISTINCT m.id, m.plant_id, m.task, m.task_description,
                      m.week_of_month, m.month, m.created_at, m.updated_at,
                      p.name AS plant_name
               FROM plant_maintenance m
               JOIN plants p ON p.id = m.plant_id
               JOIN plantings pg ON pg.plant_id = m.plant_id
               WHERE pg.garden_id = $1
                 AND ($2 IS NULL OR m.month = $2)
               ORDER BY m.month, m.week_of_month, p.name, m.id
               LIMIT $3 OFFSET $4"#,
        )
        .bind(garden_id)
        .bind(month)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
