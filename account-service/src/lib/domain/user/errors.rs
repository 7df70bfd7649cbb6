use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("username can only contain letters and numbers")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password strength failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error(
        "password must be at least {min} characters long and include at least 1 uppercase letter, \
         1 lowercase letter, 1 number, and 1 special character"
    )]
    TooWeak { min: usize },
}

/// Error for strict role parsing
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("unknown role: {0}")]
    Unknown(String),
}

/// Any rejected registration field
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    Password(#[from] PasswordPolicyError),

    #[error(transparent)]
    Username(#[from] UsernameError),
}

/// Errors raised by the user store
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Failure of the registration use case.
///
/// Duplicate and validation failures carry messages that are safe to show to
/// the caller. The remaining variants are internal and must be reported
/// generically.
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    #[error("user already exists")]
    EmailAlreadyExists(String),

    #[error("failed to validate create user parameters: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to salt and hash password: {0}")]
    HashingFailed(String),

    #[error("failed to persist user: {0}")]
    PersistenceFailed(String),
}

impl RegistrationError {
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            RegistrationError::EmailAlreadyExists(_) | RegistrationError::Validation(_)
        )
    }
}

/// Failure of the login use case.
///
/// `UserNotFound` and `PasswordMismatch` stay distinct for logging; callers
/// must map both to the same external response.
#[derive(Debug, Clone, Error)]
pub enum LoginError {
    #[error("user not found")]
    UserNotFound,

    #[error("invalid password")]
    PasswordMismatch,

    #[error("user lookup failed: {0}")]
    LookupFailed(String),

    #[error("password verification failed: {0}")]
    VerificationFailed(String),

    #[error("token issuance failed: {0}")]
    TokenIssuanceFailed(String),
}

impl LoginError {
    pub fn is_user_facing(&self) -> bool {
        matches!(self, LoginError::UserNotFound | LoginError::PasswordMismatch)
    }
}
