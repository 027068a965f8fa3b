//! Session credential toolkit
//!
//! Provides the cryptographic building blocks for session management:
//! - Password hashing (Argon2id)
//! - Access/refresh token issuance and verification with independent
//!   signing contexts
//! - Authorization-header parsing and role checks
//!
//! The service layer defines its own ports and adapts these implementations.
//! This crate performs no I/O; signing keys are injected at construction.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let verifier = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &verifier));
//! assert!(!hasher.verify("wrong_password", &verifier));
//! ```
//!
//! ## Signed Tokens
//! ```
//! use auth::{Role, TokenCodec, TokenKeys};
//! use chrono::Utc;
//!
//! let codec = TokenCodec::new(&TokenKeys {
//!     access_secret: "access_secret_at_least_32_bytes!!".into(),
//!     refresh_secret: "refresh_secret_at_least_32_bytes!".into(),
//! });
//! let token = codec
//!     .issue_access("user123", "alice@example.com", Role::Member, Utc::now())
//!     .unwrap();
//! let claims = codec.verify_access(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Guarding Requests
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AuthGuard, Role, TokenCodec, TokenKeys};
//! use chrono::Utc;
//!
//! let codec = Arc::new(TokenCodec::new(&TokenKeys {
//!     access_secret: "access_secret_at_least_32_bytes!!".into(),
//!     refresh_secret: "refresh_secret_at_least_32_bytes!".into(),
//! }));
//! let token = codec
//!     .issue_access("user123", "alice@example.com", Role::Admin, Utc::now())
//!     .unwrap();
//!
//! let guard = AuthGuard::new(codec);
//! let claims = guard.authorize(&format!("Bearer {token}")).unwrap();
//! assert!(AuthGuard::has_role(&claims, &[Role::Admin]));
//! ```

pub mod guard;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use guard::AuthGuard;
pub use guard::GuardError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AccessClaims;
pub use token::RefreshClaims;
pub use token::Role;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenKeys;
