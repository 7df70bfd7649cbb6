use async_trait::async_trait;

use crate::domain::user::models::AdminAccount;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserSummary;
use crate::user::errors::LoginError;
use crate::user::errors::RegistrationError;
use crate::user::errors::UserError;

/// Outcome of the startup administrator check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminBootstrap {
    Created,
    AlreadyExists,
}

/// Port for the credential use cases.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account with role USER.
    ///
    /// Steps run in a fixed order: duplicate check, validation, hashing,
    /// persistence. A duplicate is reported before any hashing work is done.
    ///
    /// # Arguments
    /// * `command` - Raw username, email and password
    ///
    /// # Returns
    /// Username and email of the created account
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Validation` - A field failed validation
    /// * `HashingFailed` - Password hashing failed
    /// * `PersistenceFailed` - User store failed
    async fn register(&self, command: RegisterCommand) -> Result<UserSummary, RegistrationError>;

    /// Authenticate by email and password and issue a signed token.
    ///
    /// No token is issued unless the password verified.
    ///
    /// # Arguments
    /// * `command` - Raw email and password
    ///
    /// # Returns
    /// Signed token carrying the user's ID and role
    ///
    /// # Errors
    /// * `UserNotFound` - No account for this email
    /// * `PasswordMismatch` - Wrong password
    /// * `LookupFailed` - User store failed
    /// * `VerificationFailed` - Stored hash is unusable
    /// * `TokenIssuanceFailed` - Signing failed
    async fn login(&self, command: LoginCommand) -> Result<String, LoginError>;

    /// Create the configured administrator unless the email is taken.
    ///
    /// # Errors
    /// Same classification as `register`.
    async fn bootstrap_admin(
        &self,
        account: AdminAccount,
    ) -> Result<AdminBootstrap, RegistrationError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Check whether an account exists for an email.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn exists_by_email(&self, email: &str) -> Result<bool, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;
}

/// One-way password hashing as needed by the use cases.
pub trait PasswordHashing: Send + Sync + 'static {
    fn hash(&self, password: &str) -> Result<String, auth::PasswordError>;

    fn verify(&self, password: &str, hash: &str) -> Result<(), auth::PasswordError>;
}

/// Token issuance for an authenticated account.
pub trait TokenIssuing: Send + Sync + 'static {
    fn issue(&self, user_id: &UserId, role: Role) -> Result<String, auth::JwtError>;
}
