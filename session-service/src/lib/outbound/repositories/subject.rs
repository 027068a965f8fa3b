use std::str::FromStr;

use async_trait::async_trait;
use auth::Role;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::Subject;
use crate::domain::session::models::SubjectId;
use crate::domain::session::ports::SubjectDirectory;
use crate::session::errors::RepositoryError;

/// Read-only subject lookup backed by the subjects table.
///
/// Subject lifecycle (registration, profile changes, deletion) is owned
/// elsewhere; this adapter only resolves credentials.
pub struct PostgresSubjectDirectory {
    pool: PgPool,
}

impl PostgresSubjectDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SubjectRow {
    id: Uuid,
    email: String,
    role: String,
    password_verifier: String,
}

impl SubjectRow {
    fn into_subject(self, operation: &'static str) -> Result<Subject, RepositoryError> {
        let email = EmailAddress::new(self.email)
            .map_err(|e| RepositoryError::database(operation, e))?;
        let role = Role::from_str(&self.role)
            .map_err(|e| RepositoryError::database(operation, e))?;

        Ok(Subject {
            id: SubjectId(self.id),
            email,
            role,
            password_verifier: self.password_verifier,
        })
    }
}

#[async_trait]
impl SubjectDirectory for PostgresSubjectDirectory {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Subject>, RepositoryError> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT id, email, role, password_verifier
            FROM subjects
            WHERE lower(email) = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::database("find_subject_by_email", e))?;

        row.map(|r| r.into_subject("find_subject_by_email")).transpose()
    }

    async fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, RepositoryError> {
        let row = sqlx::query_as::<_, SubjectRow>(
            r#"
            SELECT id, email, role, password_verifier
            FROM subjects
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::database("find_subject_by_id", e))?;

        row.map(|r| r.into_subject("find_subject_by_id")).transpose()
    }
}
