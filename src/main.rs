use std::env;

use docombine::{Application, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docombine=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_target(false)))
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting docombine document combiner");
    tracing::info!("Converter: {}", config.converter_url);
    tracing::info!("Max files: {}, max upload: {}MB", config.max_files, config.max_upload_mb);

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Startup failed: {:#}", e);
        e
    })?;

    app.run_until_stopped().await?;

    Ok(())
}
