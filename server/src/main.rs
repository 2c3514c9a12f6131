use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use server::bootstrap::router::create_router;
use server::bootstrap::scheduler::{spawn_auto_save, spawn_tick_scheduler};
use server::bootstrap::state::build_app_state;
use server::config_loader;
use server::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;
    observability::tracing::setup_logging(&config)?;

    info!("starting paintboard server");

    let config = Arc::new(config);
    let port = config.port;
    let state = build_app_state(config).await?;

    spawn_tick_scheduler(state.clone());
    spawn_auto_save(state.clone());

    let app = create_router(state.clone()).into_make_service_with_connect_info::<SocketAddr>();

    let address = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(address).await?;
    info!("server listening on http://{address}");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(err) = result {
        error!(error = %err, "server error");
        return Err(err.into());
    }

    if let Err(err) = state.persistence_use_case.save_now().await {
        error!(error = %err, "final save on shutdown failed");
    }

    info!("server shutdown completed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install ctrl+c handler");
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install terminate signal handler");
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {
            info!("received ctrl+c, starting graceful shutdown");
        },
        () = terminate => {
            info!("received terminate signal, starting graceful shutdown");
        },
    }
}
