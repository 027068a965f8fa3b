use async_trait::async_trait;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::models::SessionTokens;
use crate::domain::session::models::Subject;
use crate::domain::session::models::SubjectId;
use crate::domain::session::models::TokenPair;
use crate::session::errors::MetricsError;
use crate::session::errors::RepositoryError;
use crate::session::errors::SessionError;

/// Port for session service operations.
///
/// Object-safe so the HTTP boundary can hold it as a trait object.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Authenticate a subject and open a session.
    ///
    /// # Returns
    /// Access token, refresh token and a subject summary
    ///
    /// # Errors
    /// * `Authentication` - unknown email or wrong password (indistinguishable)
    /// * `Repository` - storage operation failed
    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<SessionTokens, SessionError>;

    /// Exchange a live refresh token for a new access/refresh pair,
    /// invalidating the presented token.
    ///
    /// # Errors
    /// * `Authentication` - invalid, expired, rotated or revoked token
    /// * `Repository` - persisting the rotated record failed; the presented
    ///   token stays valid
    async fn refresh(&self, presented: &str) -> Result<TokenPair, SessionError>;

    /// Revoke a refresh token. Idempotent: revoking an unknown or
    /// already-revoked token succeeds.
    ///
    /// # Errors
    /// * `Repository` - storage operation failed
    async fn logout(&self, presented: &str) -> Result<(), SessionError>;

    /// Delete all refresh records past expiry.
    ///
    /// # Returns
    /// Number of records removed
    ///
    /// # Errors
    /// * `Repository` - storage operation failed
    async fn sweep_expired(&self) -> Result<u64, SessionError>;
}

/// Persistence operations for refresh token records.
///
/// Single-row atomicity of upsert and delete is the only consistency
/// requirement; concurrent callers racing on the same record resolve to
/// exactly one winner.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a record. Idempotent upsert keyed by record id.
    ///
    /// # Errors
    /// * `RepositoryError` - storage operation failed
    async fn save(&self, record: &RefreshTokenRecord) -> Result<(), RepositoryError>;

    /// Retrieve the record holding exactly this signed value.
    ///
    /// Matching on the stored signed value (not the record id) is what
    /// rejects a syntactically valid but already-rotated token even though
    /// its signature still verifies.
    ///
    /// # Errors
    /// * `RepositoryError` - storage operation failed
    async fn find_by_signed_value(
        &self,
        signed_value: &str,
    ) -> Result<Option<RefreshTokenRecord>, RepositoryError>;

    /// Delete the record holding this signed value.
    ///
    /// # Returns
    /// True if a record was deleted, false if none existed
    ///
    /// # Errors
    /// * `RepositoryError` - storage operation failed
    async fn delete_by_signed_value(&self, signed_value: &str) -> Result<bool, RepositoryError>;

    /// Delete every record belonging to a subject.
    ///
    /// # Returns
    /// Number of records removed
    ///
    /// # Errors
    /// * `RepositoryError` - storage operation failed
    async fn delete_all_for_subject(&self, subject_id: &SubjectId) -> Result<u64, RepositoryError>;

    /// Delete every record past expiry at `now`. Safe to run concurrently
    /// with live traffic; a record deleted mid-race surfaces downstream as
    /// "not found".
    ///
    /// # Returns
    /// Number of records removed
    ///
    /// # Errors
    /// * `RepositoryError` - storage operation failed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

/// Subject-lookup collaborator.
#[async_trait]
pub trait SubjectDirectory: Send + Sync + 'static {
    /// Retrieve a subject by email. Case-insensitive.
    ///
    /// # Errors
    /// * `RepositoryError` - storage operation failed
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<Subject>, RepositoryError>;

    /// Retrieve a subject by identifier.
    ///
    /// # Errors
    /// * `RepositoryError` - storage operation failed
    async fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, RepositoryError>;
}

/// Metrics collaborator. Best-effort: failures are logged by the caller,
/// never propagated.
#[async_trait]
pub trait AuthMetrics: Send + Sync + 'static {
    /// Record a successful login, tagged by role.
    async fn record_login(&self, role: Role) -> Result<(), MetricsError>;
}

/// Clock abstraction so record-expiry logic is testable.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
