use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::models::RefreshTokenId;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::models::SubjectId;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::session::errors::RepositoryError;

pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    subject_id: Uuid,
    signed_value: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            id: RefreshTokenId(row.id),
            subject_id: SubjectId(row.subject_id),
            signed_value: row.signed_value,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn save(&self, record: &RefreshTokenRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, subject_id, signed_value, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET signed_value = EXCLUDED.signed_value,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(record.id.0)
        .bind(record.subject_id.0)
        .bind(&record.signed_value)
        .bind(record.created_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::database("save_refresh_token", e))?;

        Ok(())
    }

    async fn find_by_signed_value(
        &self,
        signed_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT id, subject_id, signed_value, created_at, expires_at
            FROM refresh_tokens
            WHERE signed_value = $1
            "#,
        )
        .bind(signed_value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::database("find_refresh_token", e))?;

        Ok(row.map(RefreshTokenRecord::from))
    }

    async fn delete_by_signed_value(&self, signed_value: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE signed_value = $1
            "#,
        )
        .bind(signed_value)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::database("delete_refresh_token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_subject(&self, subject_id: &SubjectId) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE subject_id = $1
            "#,
        )
        .bind(subject_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::database("delete_subject_refresh_tokens", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::database("delete_expired_refresh_tokens", e))?;

        Ok(result.rows_affected())
    }
}
