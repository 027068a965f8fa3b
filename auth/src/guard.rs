use std::sync::Arc;

use thiserror::Error;

use crate::token::AccessClaims;
use crate::token::Role;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Inbound request guard: parses `Authorization` headers and verifies the
/// bearer token in the access signing context.
pub struct AuthGuard {
    codec: Arc<TokenCodec>,
}

/// Guard operation errors.
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    /// Header is not the exact two-part `Bearer <token>` shape.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Header shape was fine but the token did not verify.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthGuard {
    /// Create a guard verifying against the given codec's access context.
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Authorize a raw `Authorization` header value.
    ///
    /// Requires exactly `Bearer <token>` - a missing scheme, extra parts,
    /// doubled whitespace or an empty token are rejected before any
    /// cryptographic work.
    ///
    /// # Errors
    /// * `MalformedHeader` - header shape is wrong
    /// * `Token` - token failed verification (opaque)
    pub fn authorize(&self, header_value: &str) -> Result<AccessClaims, GuardError> {
        let token = Self::bearer_token(header_value)?;
        Ok(self.codec.verify_access(token)?)
    }

    /// Pure set-membership role check.
    pub fn has_role(claims: &AccessClaims, allowed: &[Role]) -> bool {
        allowed.contains(&claims.role)
    }

    fn bearer_token(header_value: &str) -> Result<&str, GuardError> {
        let mut parts = header_value.split(' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
            _ => Err(GuardError::MalformedHeader),
        }
    }
}
