use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A named collection of plantings owned by zero or more users.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Garden {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateGarden {
    pub name: String,
}

pub type UpdateGarden = CreateGarden;

impl Garden {
    /// Creates the garden and registers `owner` as its first owning user.
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateGarden,
        owner: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let mut tx = pool.begin().await?;
        let garden = sqlx::query_as::<_, Garden>(
            "INSERT INTO gardens (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .fetch_one(&mut *tx)
        .await?;
        sqlx::query("INSERT INTO garden_users (garden_id, user_id) VALUES ($1, $2)")
            .bind(garden.id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(garden)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Garden>("SELECT * FROM gardens WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Garden>(
            r#"SELECT g.* FROM gardens g
               JOIN garden_users gu ON gu.garden_id = g.id
               WHERE gu.user_id = $1
               ORDER BY g.name, g.id"#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn is_owned_by(
        pool: &SqlitePool,
        garden_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM garden_users WHERE garden_id = $1 AND user_id = $2",
        )
        .bind(garden_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn add_owner(
        pool: &SqlitePool,
        garden_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT OR IGNORE INTO garden_users (garden_id, user_id) VALUES ($1, $2)",
        )
        .bind(garden_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateGarden,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Garden>(
            r#"UPDATE gardens SET name = $2, updated_at = CURRENT_TIMESTAMP
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&data.name)
        .fetch_one(pool)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM gardens WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
