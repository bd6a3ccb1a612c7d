use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// One instance of a plant placed in a garden at a location and date.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Planting {
    pub id: Uuid,
    pub garden_id: Uuid,
    pub plant_id: Uuid,
    pub start_date: NaiveDate,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePlanting {
    pub plant_id: Uuid,
    pub start_date: NaiveDate,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdatePlanting {
    pub start_date: NaiveDate,
    pub location: String,
}

/// A planting joined with its plant name, as shown on the garden detail page.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PlantingWithPlant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub planting: Planting,
    pub plant_name: String,
}

impl Planting {
    pub async fn create(
        pool: &SqlitePool,
        garden_id: Uuid,
        data: &CreatePlanting,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Planting>(
            r#"INSERT INTO plantings (id, garden_id, plant_id, start_date, location)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(id)
        .bind(garden_id)
        .bind(data.plant_id)
        .bind(data.start_date)
        .bind(&data.location)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Planting>("SELECT * FROM plantings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_garden_id(
        pool: &SqlitePool,
        garden_id: Uuid,
    ) -> Result<Vec<PlantingWithPlant>, sqlx::Error> {
        sqlx::query_as::<_, PlantingWithPlant>(
            r#"SELECT pg.*, p.name AS plant_name
               FROM plantings pg
               JOIN plants p ON p.id = pg.plant_id
               WHERE pg.garden_id = $1
               ORDER BY pg.start_date, p.name, pg.id"#,
        )
        .bind(garden_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdatePlanting,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Planting>(
            r#"UPDATE plantings SET start_date = $2, location = $3
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(data.start_date)
        .bind(&data.location)
        .fetch_one(pool)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM plantings WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
