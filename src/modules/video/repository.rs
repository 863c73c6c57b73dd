use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::model::Video;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence for video records.
///
/// Mutations take the owner id and only touch rows that still belong to that
/// owner, so the ownership check and the write are one atomic statement.
/// `None` / `false` means the row vanished or changed hands in between.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create(&self, video: &Video) -> RepositoryResult<Video>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Video>>;

    async fn list_by_owner(&self, user_id: Uuid) -> RepositoryResult<Vec<Video>>;

    async fn set_video_url(
        &self,
        id: Uuid,
        owner: Uuid,
        locator: &str,
    ) -> RepositoryResult<Option<Video>>;

    async fn set_thumbnail_url(
        &self,
        id: Uuid,
        owner: Uuid,
        url: &str,
    ) -> RepositoryResult<Option<Video>>;

    async fn delete(&self, id: Uuid, owner: Uuid) -> RepositoryResult<bool>;
}

pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create(&self, video: &Video) -> RepositoryResult<Video> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (id, user_id, title, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(video.id)
        .bind(video.user_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.created_at)
        .bind(video.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(video)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Video>> {
        let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(video)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> RepositoryResult<Vec<Video>> {
        let videos = sqlx::query_as::<_, Video>(
            "SELECT * FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    async fn set_video_url(
        &self,
        id: Uuid,
        owner: Uuid,
        locator: &str,
    ) -> RepositoryResult<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos SET video_url = $1, updated_at = NOW()
            WHERE id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(locator)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(video)
    }

    async fn set_thumbnail_url(
        &self,
        id: Uuid,
        owner: Uuid,
        url: &str,
    ) -> RepositoryResult<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos SET thumbnail_url = $1, updated_at = NOW()
            WHERE id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(url)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(video)
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
