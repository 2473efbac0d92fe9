use std::{sync::Arc, time::Duration};

use chrono::Utc;
use engine::Engine;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "studio={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::warn!("no server settings found, nothing to run");
        return Ok(());
    };

    let db = parse_database(&server.database).await?;
    let engine = Engine::builder()
        .database(db)
        .loyalty_policy(settings.commission.policy())
        .tax_table(settings.tax.table())
        .build()
        .await?;
    let engine = Arc::new(engine);

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let http_engine = engine.clone();
    tasks.spawn(async move {
        if let Err(err) = server::run_with_listener(http_engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    let interval_secs = settings.deductions.interval_secs;
    if interval_secs > 0 {
        tasks.spawn(async move {
            tracing::info!(interval_secs, "session deductions scheduled");
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                ticker.tick().await;
                if let Err(err) = engine.process_session_deductions(Utc::now()).await {
                    tracing::error!("session deduction pass failed: {err}");
                }
            }
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

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
