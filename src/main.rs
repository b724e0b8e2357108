//! leorisk thermal service entry point.
//!
//! Serves the thermal simulation endpoint; the conjunction and propulsion
//! engines are library-only and consumed in-process by the front end.

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let app = leorisk::server::build_router();

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("leorisk thermal service listening on 0.0.0.0:{port}");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
