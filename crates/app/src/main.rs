use auth::TokenService;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},server={level},engine={level},auth={level}",
            level = settings.app.level
        ))
        .init();

    let server_settings = settings.server;
    let tokens = TokenService::with_hs256(settings.auth.secret.as_bytes())?
        .with_ttl(settings.auth.token_ttl()?);

    let db = parse_database(&server_settings.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .build()
        .await?;

    let bind = server_settings
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server_settings.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(server::ServerState::new(engine, tokens), listener).await?;
    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::info!("Connecting to database...");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
