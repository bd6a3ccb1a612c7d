use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A user comment on a plant.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Comment {
    pub id: Uuid,
    pub plant_id: Uuid,
    pub user_id: Uuid,
    pub comment: String,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateComment {
    pub comment: String,
}

/// A comment joined with its author's username, as listed on a plant page.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    #[ts(flatten)]
    pub comment: Comment,
    pub username: String,
}

impl Comment {
    pub async fn create(
        pool: &SqlitePool,
        plant_id: Uuid,
        user_id: Uuid,
        data: &CreateComment,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Comment>(
            r#"INSERT INTO comments (id, plant_id, user_id, comment)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(id)
        .bind(plant_id)
        .bind(user_id)
        .bind(&data.comment)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Comments for a plant, newest first.
    pub async fn find_by_plant_id(
        pool: &SqlitePool,
        plant_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            r#"SELECT c.*, u.username
               FROM comments c
               JOIN users u ON u.id = c.user_id
               WHERE c.plant_id = $1
               ORDER BY c.created_on DESC, c.id"#,
        )
        .bind(plant_id)
        .fetch_all(pool)
        .await
    }
}
