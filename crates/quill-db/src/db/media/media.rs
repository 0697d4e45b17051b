use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_core::models::{
    MediaFileRecord, MediaKind, MediaRecord, MediaStatus, NewMedia, NewMediaFile,
};
use quill_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::transaction::TransactionGuard;
use crate::persistence::MediaPersistence;

/// Row of the `media` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaRow {
    pub id: Uuid,
    pub description: String,
    pub folder: String,
    pub kind: MediaKind,
    pub status: MediaStatus,
    pub updated_at: DateTime<Utc>,
}

impl MediaRow {
    fn into_record(self, files: Vec<MediaFileRecord>) -> MediaRecord {
        MediaRecord {
            id: self.id,
            description: self.description,
            folder: self.folder,
            kind: self.kind,
            status: self.status,
            updated_at: self.updated_at,
            files,
        }
    }
}

/// Postgres repository for media records and their files
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a media row inside an existing transaction.
    #[tracing::instrument(skip(self, tx), fields(db.table = "media", db.operation = "insert"))]
    pub async fn create_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        media: &NewMedia,
    ) -> Result<MediaRow, AppError> {
        let row: MediaRow = sqlx::query_as::<Postgres, MediaRow>(
            r#"
            INSERT INTO media (id, description, folder, kind, status, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, description, folder, kind, status, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&media.description)
        .bind(&media.folder)
        .bind(media.kind)
        .bind(media.status)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(row)
    }

    /// Insert file rows for `media_id` inside an existing transaction, in the given order.
    #[tracing::instrument(
        skip(self, tx, files),
        fields(db.table = "media_file", db.operation = "insert", file_count = files.len())
    )]
    pub async fn create_files_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        media_id: Uuid,
        files: &[NewMediaFile],
    ) -> Result<Vec<MediaFileRecord>, AppError> {
        let mut records = Vec::with_capacity(files.len());

        for file in files {
            let record: MediaFileRecord = sqlx::query_as::<Postgres, MediaFileRecord>(
                r#"
                INSERT INTO media_file (id, media_id, stored_filename, short_description, size, position)
                VALUES ($1, $2, $3, '', $4, $5)
                RETURNING id, media_id, stored_filename, short_description, size, position
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(media_id)
            .bind(&file.stored_filename)
            .bind(file.size)
            .bind(file.position)
            .fetch_one(&mut **tx)
            .await?;

            records.push(record);
        }

        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<MediaRow>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRow>(
            r#"
            SELECT id, description, folder, kind, status, updated_at
            FROM media
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_file", db.operation = "select"))]
    pub async fn files_for_media(&self, media_id: Uuid) -> Result<Vec<MediaFileRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, MediaFileRecord>(
            r#"
            SELECT id, media_id, stored_filename, short_description, size, position
            FROM media_file
            WHERE media_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(media_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl MediaPersistence for MediaRepository {
    async fn save_media_with_files(
        &self,
        media: NewMedia,
        files: Vec<NewMediaFile>,
    ) -> Result<MediaRecord, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let row = self.create_tx(tx.as_mut()?, &media).await?;
        let records = self.create_files_tx(tx.as_mut()?, row.id, &files).await?;

        tx.commit().await?;

        tracing::info!(
            media_id = %row.id,
            folder = %row.folder,
            file_count = records.len(),
            "Media record saved"
        );

        Ok(row.into_record(records))
    }

    async fn get_media(&self, id: Uuid) -> Result<Option<MediaRecord>, AppError> {
        let Some(row) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let files = self.files_for_media(row.id).await?;
        Ok(Some(row.into_record(files)))
    }
}
