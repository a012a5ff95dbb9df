use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use cafe_orders as app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = app::config::load_config()?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json || cfg.is_production());

    let db_pool = app::db::initialize(&cfg).await.map_err(|e| {
        error!("Failed to initialize database: {}", e);
        e
    })?;
    let db_arc = Arc::new(db_pool);

    let mailer = Arc::new(app::notifications::LogMailer::new(cfg.mail_sender.clone()));
    let services = app::handlers::AppServices::new(
        db_arc.clone(),
        mailer,
        &cfg.cafe_name,
        app::menu::Menu::cafe_default(),
    );

    let app_state = app::AppState {
        db: db_arc,
        config: cfg.clone(),
        services,
    };

    let addr: SocketAddr = cfg
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", cfg.bind_address()))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("cafe-orders listening on {}", addr);

    axum::serve(listener, app::app_router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
