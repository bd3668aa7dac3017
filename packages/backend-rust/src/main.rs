use std::net::SocketAddr;

use lexi_backend_rust::config::Config;
use lexi_backend_rust::logging;
use lexi_backend_rust::store::WordStore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let store = match WordStore::connect(config.database_url.as_deref()) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "word store configuration invalid");
            std::process::exit(1);
        }
    };

    match store.ensure_schema().await {
        Ok(()) => tracing::info!("word store schema ready"),
        Err(err) => {
            tracing::warn!(error = %err, "schema check failed at startup, /health/ready will retry")
        }
    }

    let app = lexi_backend_rust::app_with_store(store);

    let addr = config.bind_addr();
    tracing::info!(%addr, "backend-rust listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("HTTP server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
