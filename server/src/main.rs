//! Grotto server: connects to PostgreSQL and serves every table as a REST resource.
//!
//! `grotto --db user:pass@localhost/app --listen 0.0.0.0:8008`

use clap::Parser;
use grotto::{router, AppState};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tokio::net::TcpListener;

const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "grotto", version, about = "Serve PostgreSQL tables as REST resources")]
struct Settings {
    /// PostgreSQL connection string; `postgres://` is added when no scheme is given.
    #[arg(long = "db", env = "DATABASE_URL")]
    database_url: String,

    #[arg(long = "listen", env = "LISTEN_ADDR", default_value = "0.0.0.0:8008")]
    listen: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// Maximum request body size in bytes.
    #[arg(long, env = "BODY_LIMIT_BYTES", default_value_t = 1024 * 1024)]
    body_limit: usize,

    #[arg(long, env = "DATABASE_CONNECT_ATTEMPTS", default_value_t = 5)]
    connect_attempts: u32,
}

fn connection_url(raw: &str) -> String {
    if raw.starts_with("postgres://") || raw.starts_with("postgresql://") {
        raw.to_string()
    } else {
        format!("postgres://{}", raw)
    }
}

async fn connect(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    let url = connection_url(&settings.database_url);
    let attempts = settings.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        match PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < attempts => {
                tracing::warn!(attempt, error = %e, "database connect failed, retrying");
                attempt += 1;
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("grotto=info,grotto_server=info,tower_http=info")
            }),
        )
        .init();

    let settings = Settings::parse();
    let pool = connect(&settings).await?;
    let app = router(AppState { pool }, settings.body_limit);

    let listener = TcpListener::bind(&settings.listen).await?;
    tracing::info!("Grotto now available @ {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
