use anyhow::{Context, Result};
use rustysum::{api, config, logging, processing, summarization, uploads::UploadStore};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing();
    let config = config::get_config();
    config.log_summary();

    let summarizer = summarization::build_summarization_client(config)
        .context("failed to initialize summarization backend")?;
    let service = Arc::new(processing::SummaryService::new(
        summarizer,
        UploadStore::new(&config.upload_dir),
    ));
    tracing::info!(
        backend = service.backend_name(),
        upload_dir = %config.upload_dir,
        "Summary service ready"
    );
    let app = api::create_router(service, config.max_upload_bytes);

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.server_port))
        .await
        .with_context(|| format!("failed to bind port {}", config.server_port))?;
    tracing::info!("Listening on http://0.0.0.0:{}", config.server_port);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}
