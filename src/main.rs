use std::{future::IntoFuture, net::SocketAddr, time::Duration};

use tokio::sync::oneshot;

use shopping_cart_api::{
    app::create_app,
    config::AppConfig,
    db::{create_pool, run_migrations},
    state::AppState,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing(config.environment);

    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    let app = create_app(AppState::new(pool.clone()), &config);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(environment = ?config.environment, "listening on {}", addr);

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            tracing::info!("shutdown signal received, draining in-flight requests");
            let _ = signalled_tx.send(());
        })
        .into_future();

    tokio::select! {
        result = server => result?,
        _ = grace_deadline(signalled_rx, config.shutdown_grace) => {
            tracing::warn!(
                grace_secs = config.shutdown_grace.as_secs(),
                "grace period elapsed, abandoning in-flight requests"
            );
        }
    }

    // The listener is gone by now; only then release the database.
    pool.close().await;
    tracing::info!("database pool closed");
    Ok(())
}

/// Resolves `grace` after the shutdown signal fired; never resolves otherwise.
async fn grace_deadline(signalled: oneshot::Receiver<()>, grace: Duration) {
    if signalled.await.is_err() {
        std::future::pending::<()>().await;
    }
    tokio::time::sleep(grace).await;
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
                return;
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(error = %err, "unix signal handlers unavailable, using ctrl-c");
            }
        }
    }
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
