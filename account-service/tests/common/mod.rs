use std::sync::Arc;

use account_service::config::DatabaseConfig;
use account_service::domain::user::models::AdminAccount;
use account_service::domain::user::ports::UserServicePort;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::SqliteUserRepository;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth::TokenSettings;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "Adm1n!secret";

/// Test application that spawns a real server over an in-memory database
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

pub fn token_settings() -> TokenSettings {
    TokenSettings {
        secret: JWT_SECRET.to_vec(),
        issuer: "account-service".to_string(),
        lifetime_seconds: 86_400,
    }
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let pool = SqliteUserRepository::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 5,
        })
        .await
        .expect("Failed to open test database");

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let tokens = Arc::new(JwtHandler::new(token_settings()));
        let user_service = Arc::new(UserService::new(
            Arc::new(SqliteUserRepository::new(pool)),
            Arc::new(PasswordHasher::new()),
            Arc::clone(&tokens),
        ));

        user_service
            .bootstrap_admin(AdminAccount {
                username: "admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            })
            .await
            .expect("Failed to bootstrap administrator");

        let router = create_router(user_service, tokens);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            // No cookie store: tests inspect and send the token cookie explicitly
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(token_settings()),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request carrying the token cookie
    pub fn get_with_token(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path)
            .header(reqwest::header::COOKIE, format!("token={}", token))
    }

    /// Helper to submit a form
    pub fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::RequestBuilder {
        self.api_client
            .post(&format!("{}{}", self.address, path))
            .form(form)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post_form(
            "/api/register",
            &[("username", username), ("email", email), ("password", password)],
        )
        .send()
        .await
        .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_form("/api/login", &[("email", email), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the value of the token cookie
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let token = response
            .cookies()
            .find(|cookie| cookie.name() == "token")
            .map(|cookie| cookie.value().to_string())
            .expect("Login response should set the token cookie");
        token
    }
}
