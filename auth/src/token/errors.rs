use thiserror::Error;

/// Opaque token rejection.
///
/// The `Display` output is constant regardless of which check failed, so the
/// error can be returned to callers without leaking an oracle. The precise
/// cause is kept for logging via [`TokenError::reason`].
#[derive(Debug, Clone, Error)]
#[error("token rejected")]
pub struct TokenError {
    reason: TokenErrorReason,
}

/// Internal cause of a token rejection, retained for logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenErrorReason {
    /// Token could not be parsed or its claims did not deserialize.
    Malformed,
    /// Signature did not verify under this signing context.
    InvalidSignature,
    /// The `exp` claim is in the past.
    Expired,
    /// The `iss` claim does not match the expected issuer.
    WrongIssuer,
    /// The `aud` claim does not match the expected audience.
    WrongAudience,
    /// Token serialization failed at issuance.
    EncodingFailed,
}

impl TokenError {
    pub(crate) fn new(reason: TokenErrorReason) -> Self {
        Self { reason }
    }

    /// Internal rejection cause, for logging.
    pub fn reason(&self) -> TokenErrorReason {
        self.reason
    }
}

/// Error for parsing role names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);
