//! Bindings from the `auth` crate to the domain ports.

use auth::JwtError;
use auth::JwtHandler;
use auth::PasswordError;
use auth::PasswordHasher;

use crate::domain::user::models::Role;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::PasswordHashing;
use crate::domain::user::ports::TokenIssuing;

impl PasswordHashing for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        PasswordHasher::hash(self, password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        PasswordHasher::verify(self, password, hash)
    }
}

impl TokenIssuing for JwtHandler {
    fn issue(&self, user_id: &UserId, role: Role) -> Result<String, JwtError> {
        JwtHandler::issue(self, &user_id.to_string(), role.as_str())
    }
}
