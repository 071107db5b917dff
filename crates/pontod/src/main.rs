use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod config;
mod dbus_interface;
mod engine;
mod wire;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = config::Config::from_env();
    tracing::info!(
        db = %config.db_path.display(),
        threshold = config.match_threshold,
        timezone = %config.timezone,
        "pontod starting"
    );

    let store = ponto_store::Store::open(&config.db_path).await?;
    let engine = engine::Engine::new(
        store.identities(),
        store.ledger(),
        config.match_threshold,
        config.timezone,
    );

    let _conn = zbus::connection::Builder::session()?
        .name("org.ponto.Ponto1")?
        .serve_at(
            "/org/ponto/Ponto1",
            dbus_interface::PontoService::new(engine, store),
        )?
        .build()
        .await?;

    tracing::info!("pontod ready");

    // Keep running until signaled
    tokio::signal::ctrl_c().await?;
    tracing::info!("pontod shutting down");

    Ok(())
}
