use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::AdminAccount;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::PasswordPolicy;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserSummary;
use crate::domain::user::models::Username;
use crate::user::errors::LoginError;
use crate::user::errors::RegistrationError;
use crate::user::errors::UserError;
use crate::user::errors::ValidationError;
use crate::user::ports::AdminBootstrap;
use crate::user::ports::PasswordHashing;
use crate::user::ports::TokenIssuing;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Credential use cases: registration, login and administrator bootstrap.
///
/// Holds no mutable state; every dependency is shared read-only.
pub struct UserService<UR, PH, TI>
where
    UR: UserRepository,
    PH: PasswordHashing,
    TI: TokenIssuing,
{
    repository: Arc<UR>,
    password_hasher: Arc<PH>,
    token_issuer: Arc<TI>,
}

impl<UR, PH, TI> UserService<UR, PH, TI>
where
    UR: UserRepository,
    PH: PasswordHashing,
    TI: TokenIssuing,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User store
    /// * `password_hasher` - Password hashing implementation
    /// * `token_issuer` - Token signing implementation
    pub fn new(repository: Arc<UR>, password_hasher: Arc<PH>, token_issuer: Arc<TI>) -> Self {
        Self {
            repository,
            password_hasher,
            token_issuer,
        }
    }

    async fn ensure_email_available(&self, email: &str) -> Result<(), RegistrationError> {
        let exists = self
            .repository
            .exists_by_email(email)
            .await
            .map_err(|e| RegistrationError::PersistenceFailed(e.to_string()))?;

        if exists {
            return Err(RegistrationError::EmailAlreadyExists(email.to_string()));
        }
        Ok(())
    }

    async fn create_account(
        &self,
        username: Username,
        email: EmailAddress,
        password: &str,
        role: Role,
    ) -> Result<User, RegistrationError> {
        let password_hash = self
            .password_hasher
            .hash(password)
            .map_err(|e| RegistrationError::HashingFailed(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            username,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        };

        self.repository.create(user).await.map_err(|e| match e {
            UserError::EmailAlreadyExists(email) => RegistrationError::EmailAlreadyExists(email),
            other => RegistrationError::PersistenceFailed(other.to_string()),
        })
    }
}

/// Validate registration fields in order: email, password, username.
fn validate(
    username: String,
    email: String,
    password: &str,
) -> Result<(Username, EmailAddress), ValidationError> {
    let email = EmailAddress::new(email)?;
    PasswordPolicy::check(password)?;
    let username = Username::new(username)?;
    Ok((username, email))
}

#[async_trait]
impl<UR, PH, TI> UserServicePort for UserService<UR, PH, TI>
where
    UR: UserRepository,
    PH: PasswordHashing,
    TI: TokenIssuing,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserSummary, RegistrationError> {
        let RegisterCommand {
            username,
            email,
            password,
        } = command;

        self.ensure_email_available(&email).await?;
        let (username, email) = validate(username, email, &password)?;

        let user = self
            .create_account(username, email, &password, Role::User)
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        Ok(UserSummary::from(&user))
    }

    async fn login(&self, command: LoginCommand) -> Result<String, LoginError> {
        let user = self
            .repository
            .find_by_email(&command.email)
            .await
            .map_err(|e| LoginError::LookupFailed(e.to_string()))?
            .ok_or(LoginError::UserNotFound)?;

        self.password_hasher
            .verify(&command.password, &user.password_hash)
            .map_err(|e| match e {
                auth::PasswordError::Mismatch => LoginError::PasswordMismatch,
                other => LoginError::VerificationFailed(other.to_string()),
            })?;

        let token = self
            .token_issuer
            .issue(&user.id, user.role)
            .map_err(|e| LoginError::TokenIssuanceFailed(e.to_string()))?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(token)
    }

    async fn bootstrap_admin(
        &self,
        account: AdminAccount,
    ) -> Result<AdminBootstrap, RegistrationError> {
        let AdminAccount {
            username,
            email,
            password,
        } = account;

        match self.ensure_email_available(&email).await {
            Ok(()) => {}
            Err(RegistrationError::EmailAlreadyExists(_)) => {
                tracing::info!("Admin user already exists, skipping creation");
                return Ok(AdminBootstrap::AlreadyExists);
            }
            Err(e) => return Err(e),
        }

        let (username, email) = validate(username, email, &password)?;
        let admin = self
            .create_account(username, email, &password, Role::Admin)
            .await?;

        tracing::info!(
            user_id = %admin.id,
            username = %admin.username,
            email = %admin.email,
            "Admin user created"
        );

        Ok(AdminBootstrap::Created)
    }
}
