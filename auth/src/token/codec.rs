use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::claims::AccessClaims;
use super::claims::RefreshClaims;
use super::claims::Role;
use super::claims::AUDIENCE;
use super::claims::ISSUER;
use super::errors::TokenError;
use super::errors::TokenErrorReason;

/// Signing secrets for the two token contexts.
///
/// The secrets must differ; access and refresh tokens are never
/// interchangeable.
#[derive(Clone)]
pub struct TokenKeys {
    pub access_secret: String,
    pub refresh_secret: String,
}

/// One self-contained signing context: key pair plus the validation rules
/// applied to every token it verifies.
struct SigningContext {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SigningContext {
    fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| TokenError::new(TokenErrorReason::EncodingFailed))
    }

    fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenErrorReason::Expired,
                    ErrorKind::InvalidSignature => TokenErrorReason::InvalidSignature,
                    ErrorKind::InvalidIssuer => TokenErrorReason::WrongIssuer,
                    ErrorKind::InvalidAudience => TokenErrorReason::WrongAudience,
                    _ => TokenErrorReason::Malformed,
                };
                TokenError::new(reason)
            })
    }
}

/// Token codec with independent signing contexts for access and refresh
/// credentials.
///
/// The contexts share no key material, so a token signed in one context can
/// never validate in the other. Signature, issuer, audience and expiry are
/// checked together; every rejection surfaces as the same opaque
/// [`TokenError`].
pub struct TokenCodec {
    access: SigningContext,
    refresh: SigningContext,
}

impl TokenCodec {
    /// Create a codec from the two signing secrets.
    ///
    /// # Security Notes
    /// - Each secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(keys: &TokenKeys) -> Self {
        Self {
            access: SigningContext::new(keys.access_secret.as_bytes()),
            refresh: SigningContext::new(keys.refresh_secret.as_bytes()),
        }
    }

    /// Issue an access token for `subject_id`, valid for 15 minutes from `now`.
    ///
    /// # Errors
    /// * `TokenError` - claim serialization failed
    pub fn issue_access(
        &self,
        subject_id: &str,
        email: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = AccessClaims::new(subject_id, email, role, now);
        self.access.sign(&claims)
    }

    /// Issue a refresh token for `subject_id` tied to the persisted record
    /// `token_id`, valid for 7 days from `now`.
    ///
    /// # Errors
    /// * `TokenError` - claim serialization failed
    pub fn issue_refresh(
        &self,
        subject_id: &str,
        token_id: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = RefreshClaims::new(subject_id, token_id, now);
        self.refresh.sign(&claims)
    }

    /// Verify an access token: signature, issuer, audience and expiry.
    ///
    /// # Errors
    /// * `TokenError` - opaque rejection; the internal reason is available
    ///   via [`TokenError::reason`] for logging
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.access.verify(token)
    }

    /// Verify a refresh token: signature, issuer, audience and expiry.
    ///
    /// # Errors
    /// * `TokenError` - opaque rejection; the internal reason is available
    ///   via [`TokenError::reason`] for logging
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.refresh.verify(token)
    }
}
