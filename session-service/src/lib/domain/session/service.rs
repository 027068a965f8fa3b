use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenError;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::RefreshTokenId;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::models::SessionTokens;
use crate::domain::session::models::Subject;
use crate::domain::session::models::SubjectSummary;
use crate::domain::session::models::TokenPair;
use crate::session::errors::RepositoryError;
use crate::session::errors::SessionError;
use crate::session::ports::AuthMetrics;
use crate::session::ports::Clock;
use crate::session::ports::RefreshTokenRepository;
use crate::session::ports::SessionServicePort;
use crate::session::ports::SubjectDirectory;

/// Domain service implementing the credential lifecycle.
///
/// Orchestrates password verification, token issuance and the refresh-token
/// rotation state machine over injected ports. Holds no shared mutable
/// state; the refresh-token store's row-level atomicity is the only
/// synchronization relied on.
pub struct SessionService<RT, SD, M, C>
where
    RT: RefreshTokenRepository,
    SD: SubjectDirectory,
    M: AuthMetrics,
    C: Clock,
{
    refresh_tokens: Arc<RT>,
    subjects: Arc<SD>,
    metrics: Arc<M>,
    clock: C,
    codec: Arc<TokenCodec>,
}

fn storage_error(e: RepositoryError) -> SessionError {
    tracing::error!(error = %e, "Storage failure");
    SessionError::Repository(e)
}

fn issuance_error(e: TokenError) -> SessionError {
    tracing::error!(reason = ?e.reason(), "Token issuance failed");
    SessionError::Internal("token issuance failed".to_string())
}

impl<RT, SD, M, C> SessionService<RT, SD, M, C>
where
    RT: RefreshTokenRepository,
    SD: SubjectDirectory,
    M: AuthMetrics,
    C: Clock,
{
    /// Create a new session service with injected dependencies.
    pub fn new(
        refresh_tokens: Arc<RT>,
        subjects: Arc<SD>,
        metrics: Arc<M>,
        clock: C,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            refresh_tokens,
            subjects,
            metrics,
            clock,
            codec,
        }
    }

    /// Sign a fresh refresh token and build its record. Nothing is
    /// persisted here.
    fn issue_refresh_record(
        &self,
        subject: &Subject,
        now: DateTime<Utc>,
    ) -> Result<(String, RefreshTokenRecord), SessionError> {
        let id = RefreshTokenId::new();
        let signed_value = self
            .codec
            .issue_refresh(&subject.id.to_string(), &id.to_string(), now)
            .map_err(issuance_error)?;
        let record = RefreshTokenRecord::issue(id, subject.id, signed_value.clone(), now);

        Ok((signed_value, record))
    }

    /// Remove a record that can no longer be honored. Best-effort: the
    /// caller already has its outcome and the sweep removes stragglers.
    async fn retire_record(&self, record: &RefreshTokenRecord, context: &'static str) {
        match self
            .refresh_tokens
            .delete_by_signed_value(&record.signed_value)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(record_id = %record.id, context, "Refresh record already gone")
            }
            Err(e) => {
                tracing::warn!(record_id = %record.id, context, error = %e, "Failed to delete refresh record")
            }
        }
    }
}

#[async_trait]
impl<RT, SD, M, C> SessionServicePort for SessionService<RT, SD, M, C>
where
    RT: RefreshTokenRepository,
    SD: SubjectDirectory,
    M: AuthMetrics,
    C: Clock,
{
    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<SessionTokens, SessionError> {
        let subject = self
            .subjects
            .find_by_email(email)
            .await
            .map_err(storage_error)?;

        // Unknown email and wrong password collapse into the same error so
        // the endpoint cannot be used to enumerate accounts.
        let Some(subject) = subject else {
            tracing::debug!("Login rejected: unknown email");
            return Err(SessionError::Authentication);
        };

        // Argon2 is CPU-bound; keep it off the async worker threads.
        let password = password.to_owned();
        let verifier = subject.password_verifier.clone();
        let verified =
            tokio::task::spawn_blocking(move || PasswordHasher::new().verify(&password, &verifier))
                .await
                .expect("password verification task panicked");

        if !verified {
            tracing::debug!(subject_id = %subject.id, "Login rejected: password mismatch");
            return Err(SessionError::Authentication);
        }

        let now = self.clock.now();
        let access_token = self
            .codec
            .issue_access(
                &subject.id.to_string(),
                subject.email.as_str(),
                subject.role,
                now,
            )
            .map_err(issuance_error)?;

        let (refresh_token, record) = self.issue_refresh_record(&subject, now)?;
        self.refresh_tokens
            .save(&record)
            .await
            .map_err(storage_error)?;

        if let Err(e) = self.metrics.record_login(subject.role).await {
            tracing::warn!(error = %e, "Failed to record login metric");
        }

        tracing::info!(subject_id = %subject.id, role = %subject.role, "Session opened");

        Ok(SessionTokens {
            access_token,
            refresh_token,
            subject: SubjectSummary::from(&subject),
        })
    }

    async fn refresh(&self, presented: &str) -> Result<TokenPair, SessionError> {
        // Signature/claim verification first; the store stays untouched on
        // failure so garbage input cannot invalidate live sessions.
        let claims = self.codec.verify_refresh(presented).map_err(|e| {
            tracing::debug!(reason = ?e.reason(), "Refresh rejected: token verification failed");
            SessionError::Authentication
        })?;

        // A verified signature is not enough: the exact signed value must
        // still map to a live record. Rotated and revoked tokens fail here.
        let record = self
            .refresh_tokens
            .find_by_signed_value(presented)
            .await
            .map_err(storage_error)?;
        let Some(record) = record else {
            tracing::debug!(jti = %claims.jti, "Refresh rejected: no live record");
            return Err(SessionError::Authentication);
        };

        if claims.jti != record.id.to_string() {
            tracing::warn!(
                jti = %claims.jti,
                record_id = %record.id,
                "Refresh rejected: claim/record id mismatch"
            );
            return Err(SessionError::Authentication);
        }

        // The record's expiry is authoritative, independent of the claim.
        let now = self.clock.now();
        if record.is_expired(now) {
            tracing::debug!(record_id = %record.id, "Refresh rejected: record expired");
            self.retire_record(&record, "expired").await;
            return Err(SessionError::Authentication);
        }

        let subject = self
            .subjects
            .find_by_id(&record.subject_id)
            .await
            .map_err(storage_error)?;
        let Some(subject) = subject else {
            tracing::warn!(subject_id = %record.subject_id, "Refresh rejected: subject gone");
            self.retire_record(&record, "orphaned").await;
            return Err(SessionError::Authentication);
        };

        let access_token = self
            .codec
            .issue_access(
                &subject.id.to_string(),
                subject.email.as_str(),
                subject.role,
                now,
            )
            .map_err(issuance_error)?;

        // The rotated record must be persisted before the old one is
        // touched: if this save fails the presented token stays valid and
        // the subject is not locked out.
        let (refresh_token, new_record) = self.issue_refresh_record(&subject, now)?;
        self.refresh_tokens
            .save(&new_record)
            .await
            .map_err(storage_error)?;

        // Retiring the old record is awaited but non-fatal; the sweep
        // removes stragglers.
        self.retire_record(&record, "rotated").await;

        tracing::debug!(
            subject_id = %subject.id,
            old_record = %record.id,
            new_record = %new_record.id,
            "Refresh token rotated"
        );

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn logout(&self, presented: &str) -> Result<(), SessionError> {
        let deleted = self
            .refresh_tokens
            .delete_by_signed_value(presented)
            .await
            .map_err(storage_error)?;

        // A token that never existed or is already revoked is a success:
        // logout is an idempotent terminal operation.
        if deleted {
            tracing::debug!("Refresh token revoked");
        }

        Ok(())
    }

    async fn sweep_expired(&self) -> Result<u64, SessionError> {
        let removed = self
            .refresh_tokens
            .delete_expired(self.clock.now())
            .await
            .map_err(storage_error)?;

        if removed > 0 {
            tracing::info!(removed, "Expired refresh records swept");
        }

        Ok(removed)
    }
}
