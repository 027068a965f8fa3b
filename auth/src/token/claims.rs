use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::UnknownRole;

/// Access token lifetime: 15 minutes.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Issuer claim stamped into every issued token and required at verification.
pub const ISSUER: &str = "session-service";

/// Audience claim stamped into every issued token and required at verification.
pub const AUDIENCE: &str = "session-service-clients";

/// Subject role.
///
/// Closed enumeration ordered by privilege: `Member < Moderator < Admin`.
/// Serialized as lowercase strings inside token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Moderator,
    Admin,
}

impl Role {
    /// Ordinal rank backing the role hierarchy.
    pub fn rank(&self) -> u8 {
        match self {
            Role::Member => 0,
            Role::Moderator => 1,
            Role::Admin => 2,
        }
    }

    /// Ordinal "at least" check: true if this role ranks at or above `minimum`.
    pub fn at_least(&self, minimum: Role) -> bool {
        self.rank() >= minimum.rank()
    }

    /// Lowercase wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Claims carried by an access token.
///
/// Stateless: reconstructed only at verification time, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject identifier
    pub sub: String,
    /// Subject email address
    pub email: String,
    /// Subject role
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

impl AccessClaims {
    /// Build access claims for `subject_id`, expiring
    /// [`ACCESS_TOKEN_TTL_SECS`] after `now`.
    pub fn new(subject_id: &str, email: &str, role: Role, now: DateTime<Utc>) -> Self {
        let expires = now + Duration::seconds(ACCESS_TOKEN_TTL_SECS);

        Self {
            sub: subject_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires.timestamp(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        }
    }
}

/// Claims carried by a refresh token.
///
/// `jti` is the identifier of the persisted refresh record this token is
/// tied to; verification alone is never sufficient, the record must exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Refresh record identifier
    pub jti: String,
    /// Subject identifier
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

impl RefreshClaims {
    /// Build refresh claims for `subject_id` tied to record `token_id`,
    /// expiring [`REFRESH_TOKEN_TTL_SECS`] after `now`.
    pub fn new(subject_id: &str, token_id: &str, now: DateTime<Utc>) -> Self {
        let expires = now + Duration::seconds(REFRESH_TOKEN_TTL_SECS);

        Self {
            jti: token_id.to_string(),
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        }
    }
}
