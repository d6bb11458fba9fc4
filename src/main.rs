use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let http_port = std::env::var("CHIRP_HTTP_PORT").unwrap_or_else(|_| "7880".to_string());
    let token_ttl = std::env::var("CHIRP_TOKEN_TTL_SECS").unwrap_or_else(|_| "3600".to_string());
    let gc_interval = std::env::var("CHIRP_GC_INTERVAL_SECS").unwrap_or_else(|_| "3600".to_string());
    info!(
        target: "chirp",
        "chirp starting: RUST_LOG='{}', http_port={}, token_ttl_secs={}, gc_interval_secs={}",
        rust_log, http_port, token_ttl, gc_interval
    );

    chirp::server::run().await
}
