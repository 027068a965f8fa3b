pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::AccessClaims;
pub use claims::RefreshClaims;
pub use claims::Role;
pub use claims::ACCESS_TOKEN_TTL_SECS;
pub use claims::AUDIENCE;
pub use claims::ISSUER;
pub use claims::REFRESH_TOKEN_TTL_SECS;
pub use codec::TokenCodec;
pub use codec::TokenKeys;
pub use errors::TokenError;
pub use errors::TokenErrorReason;
pub use errors::UnknownRole;
