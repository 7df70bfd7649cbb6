//! Authentication primitives shared by the account service.
//!
//! - Password hashing (Argon2id, self-describing PHC output)
//! - Signed identity tokens (HS256 JWT with subject and role claims)
//!
//! The crate knows nothing about HTTP or persistence. Services define their
//! own ports and adapt these implementations to them.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! assert!(hasher.verify("not_my_password", &hash).is_err());
//! ```
//!
//! ## Identity Tokens
//! ```
//! use auth::{JwtHandler, TokenSettings};
//!
//! let handler = JwtHandler::new(TokenSettings {
//!     secret: b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     issuer: "account-service".to_string(),
//!     lifetime_seconds: 3600,
//! });
//! let token = handler.issue("user123", "USER").unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.subject, "user123");
//! assert_eq!(claims.role, "USER");
//! ```

pub mod jwt;
pub mod password;

pub use jwt::Claims;
pub use jwt::IdentityClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenSettings;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::WorkFactor;
