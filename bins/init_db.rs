//! One-shot schema bootstrap: create tables and the seed user, then exit.
use dotenvy::dotenv;
use tracing::{error, info};

async fn init(cfg: &configs::AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    let result = service::schema::initialize_schema(&db).await;
    db.close().await?;
    result?;
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "init_db", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = "init_db", event = "start", "initializing database");
    match init(&cfg).await {
        Ok(()) => {
            info!(service = "init_db", event = "done", "database initialization complete");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "init_db", event = "failed", error = %format!("{e:#}"), "database initialization failed");
            std::process::ExitCode::FAILURE
        }
    }
}
