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
pub enum MaxHeight {
    Tall = 1,
    Medium = 2,
    Short = 3,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Spread {
    Wide = 1,
    Moderate = 2,
    Compact = 3,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FloweringSeason {
    Spring = 1,
    Summer = 2,
    Fall = 3,
    None = 4,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SunlightExposure {
    FullSun = 1,
    PartialShade = 2,
    Shade = 3,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PruningFrequency {
    Regular = 1,
    Occasional = 2,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WateringNeeds {
    Low = 1,
    Moderate = 2,
    High = 3,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Fertilization {
    Regular = 1,
    Occasional = 2,
}

#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PestDiseaseResistance {
    Resistant = 1,
    Susceptible = 2,
}

/// A species profile with its coded care attributes.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Plant {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub max_height: MaxHeight,
    pub spread: Spread,
    pub flowering_season: FloweringSeason,
    pub sunlight_exposure: SunlightExposure,
    pub pruning_frequency: PruningFrequency,
    pub watering_needs: WateringNeeds,
    pub fertilization: Fertilization,
    pub pest_disease_resistance: PestDiseaseResistance,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePlant {
    pub name: String,
    pub description: String,
    pub max_height: MaxHeight,
    pub spread: Spread,
    pub flowering_season: FloweringSeason,
    pub sunlight_exposure: SunlightExposure,
    pub pruning_frequency: PruningFrequency,
    pub watering_needs: WateringNeeds,
    pub fertilization: Fertilization,
    pub pest_disease_resistance: PestDiseaseResistance,
}

pub type UpdatePlant = CreatePlant;

/// Escape `%`, `_` and the escape character itself so user input matches
/// literally inside a LIKE pattern.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Plant {
    pub async fn create(pool: &SqlitePool, data: &CreatePlant) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Plant>(
            r#"INSERT INTO plants (
                   id, name, description, max_height, spread, flowering_season,
                   sunlight_exposure, pruning_frequency, watering_needs,
                   fertilization, pest_disease_resistance
               )
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.max_height)
        .bind(data.spread)
        .bind(data.flowering_season)
        .bind(data.sunlight_exposure)
        .bind(data.pruning_frequency)
        .bind(data.watering_needs)
        .bind(data.fertilization)
        .bind(data.pest_disease_resistance)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Plant>("SELECT * FROM plants WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_all(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plants")
            .fetch_one(pool)
            .await
    }

    pub async fn find_page(
        pool: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Plant>("SELECT * FROM plants ORDER BY name, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive substring match on the plant name.
    pub async fn search_by_name(
        pool: &SqlitePool,
        query: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = escape_like(query);
        sqlx::query_as::<_, Plant>(
            r#"SELECT * FROM plants
               WHERE name LIKE '%' || $1 || '%' ESCAPE '\'
               ORDER BY name, id"#,
        )
        .bind(pattern)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdatePlant,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Plant>(
            r#"UPDATE plants
               SET name = $2, description = $3, max_height = $4, spread = $5,
                   flowering_season = $6, sunlight_exposure = $7,
                   pruning_frequency = $8, watering_needs = $9,
                   fertilization = $10, pest_disease_resistance = $11,
                   updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.max_height)
        .bind(data.spread)
        .bind(data.flowering_season)
        .bind(data.sunlight_exposure)
        .bind(data.pruning_frequency)
        .bind(data.watering_needs)
        .bind(data.fertilization)
        .bind(data.pest_disease_resistance)
        .fetch_one(pool)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
pub(crate) fn sample_plant(name: &str) -> CreatePlant {
    CreatePlant {
        name: name.into(),
        description: format!("{name} description"),
        max_height: MaxHeight::Tall,
        spread: Spread::Moderate,
        flowering_season: FloweringSeason::Summer,
        sunlight_exposure: SunlightExposure::Shade,
        pruning_frequency: PruningFrequency::Regular,
        watering_needs: WateringNeeds::Low,
        fertilization: Fertilization::Regular,
        pest_disease_resistance: PestDiseaseResistance::Resistant,
    }
}
