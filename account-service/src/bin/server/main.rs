use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::ports::UserServicePort;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::SqliteUserRepository;
use auth::JwtHandler;
use auth::PasswordHasher;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.url,
        host = %config.server.host,
        port = config.server.port,
        jwt_issuer = %config.jwt.issuer,
        jwt_expiration_seconds = config.jwt.expiration_seconds,
        admin_configured = config.admin.is_some(),
        "Configuration loaded"
    );

    let pool = SqliteUserRepository::connect(&config.database).await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "sqlite",
        "Database ready, migrations completed"
    );

    let tokens = Arc::new(JwtHandler::new(config.jwt.token_settings()));
    let user_repository = Arc::new(SqliteUserRepository::new(pool));
    let password_hasher = Arc::new(PasswordHasher::new());

    let user_service = Arc::new(UserService::new(
        user_repository,
        password_hasher,
        Arc::clone(&tokens),
    ));

    if let Some(admin) = config.admin.clone() {
        user_service.bootstrap_admin(admin.into()).await?;
    }

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, protocol = "http", "Http server listening");

    let application = create_router(user_service, tokens);
    axum::serve(listener, application).await?;

    tracing::info!("Server exited");

    Ok(())
}
