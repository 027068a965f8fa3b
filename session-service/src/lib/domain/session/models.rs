use std::fmt;
use std::str::FromStr;

use auth::token::REFRESH_TOKEN_TTL_SECS;
use auth::Role;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::session::errors::EmailError;
use crate::session::errors::SubjectIdError;

/// Subject unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubjectId(pub Uuid);

impl SubjectId {
    /// Generate a new random subject ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a subject ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, SubjectIdError> {
        Uuid::parse_str(s)
            .map(SubjectId)
            .map_err(|e| SubjectIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Refresh record unique identifier type.
///
/// Doubles as the `jti` claim of the refresh token tied to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshTokenId(pub Uuid);

impl RefreshTokenId {
    /// Generate a new random refresh record ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RefreshTokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RefreshTokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates format using an RFC 5322 compliant parser and normalizes to
/// lowercase, so lookups are case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, lowercase-normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email.to_lowercase()))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Read model of a subject as seen by the credential core.
///
/// Provided by the subject-lookup collaborator; never mutated here.
#[derive(Debug, Clone)]
pub struct Subject {
    pub id: SubjectId,
    pub email: EmailAddress,
    pub role: Role,
    pub password_verifier: String,
}

/// Persisted registration of a live refresh token.
///
/// A given signed value maps to at most one live record; once the record is
/// deleted the signed value can never become valid again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: RefreshTokenId,
    pub subject_id: SubjectId,
    pub signed_value: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Build a record for a freshly signed token, expiring after the shared
    /// refresh TTL so the record and the claim agree.
    pub fn issue(
        id: RefreshTokenId,
        subject_id: SubjectId,
        signed_value: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            subject_id,
            signed_value,
            created_at: now,
            expires_at: now + Duration::seconds(REFRESH_TOKEN_TTL_SECS),
        }
    }

    /// True if the record is past expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Public summary of a subject, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSummary {
    pub id: SubjectId,
    pub email: EmailAddress,
    pub role: Role,
}

impl From<&Subject> for SubjectSummary {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id,
            email: subject.email.clone(),
            role: subject.role,
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub subject: SubjectSummary,
}

/// Result of a successful rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalized_to_lowercase() {
        let email = EmailAddress::new("Alice@Example.COM".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_email_rejects_invalid_format() {
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new("".to_string()).is_err());
    }

    #[test]
    fn test_subject_id_parsing() {
        let id = SubjectId::new();
        let parsed = SubjectId::from_string(&id.to_string()).unwrap();
        assert_eq!(parsed, id);

        assert!(SubjectId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_record_expiry_matches_refresh_ttl() {
        let now = Utc::now();
        let record = RefreshTokenRecord::issue(
            RefreshTokenId::new(),
            SubjectId::new(),
            "signed".to_string(),
            now,
        );

        assert_eq!(
            (record.expires_at - record.created_at).num_seconds(),
            REFRESH_TOKEN_TTL_SECS
        );
        assert!(!record.is_expired(now));
        assert!(record.is_expired(record.expires_at));
    }
}
