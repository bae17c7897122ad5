use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spesa={level},server={level},ledger={level}",
            level = settings.app.level
        ))
        .init();

    tracing::info!("Starting spesa...");
    let db = parse_database(&settings.server.database).await?;

    let (identity, auth) = parse_auth(settings.auth);
    let ledger = ledger::Ledger::builder()
        .database(db.clone())
        .identity(identity)
        .strict_amounts(settings.strict_amounts)
        .build();

    let bind = settings.server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(ledger, db, auth, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

fn parse_auth(config: settings::Auth) -> (ledger::IdentityMode, server::AuthConfig) {
    match config {
        settings::Auth::Open => (
            ledger::IdentityMode::Open,
            server::AuthConfig {
                mode: server::AuthMode::Open,
                secret: None,
            },
        ),
        settings::Auth::Bearer { secret, claim } => (
            ledger::IdentityMode::BearerClaims {
                claim: claim.unwrap_or_else(|| "sub".to_string()),
            },
            server::AuthConfig {
                mode: server::AuthMode::Bearer,
                secret: Some(secret),
            },
        ),
        settings::Auth::Session => (
            ledger::IdentityMode::Session,
            server::AuthConfig {
                mode: server::AuthMode::Session,
                secret: None,
            },
        ),
    }
}
