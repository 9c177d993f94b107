mod config;
mod constants;
mod domain;
mod ingest;
mod logging;
mod models;
mod services;
mod transform;
mod youtube;

use std::process::ExitCode;

use anyhow::Context;

use config::Config;
use ingest::RunReport;
use youtube::YouTubeClient;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run_once().await {
        Ok(report) => {
            for dropped in &report.dropped {
                tracing::warn!(video_id = %dropped.id, "Dropped: {}", dropped.error);
            }
            tracing::info!(
                started_at = %report.started_at,
                fetched = report.fetched,
                persisted = report.persisted,
                new_versions = report.versions_inserted,
                unchanged = report.versions_reused,
                dropped = report.dropped.len(),
                "{} videos inserted",
                report.persisted
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Ingest run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_once() -> anyhow::Result<RunReport> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let client = YouTubeClient::new(&config.youtube.api_key, &config.youtube.base_url);

    let pool = services::db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let result = ingest::run(&config, &client, &pool).await;

    pool.close().await;
    tracing::info!("Database connection closed");

    Ok(result?)
}
