use clap::Parser;
use tokio::net::TcpListener;

use todo_server::{logging, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let config = ServerConfig::parse();
    logging::init_logging(&config.log_level, config.json_logs);

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        id_scheme = ?config.id_scheme,
        update_mode = ?config.update_mode,
        seed = config.seed,
        cors = config.cors,
        "listening"
    );

    todo_server::run(listener, &config, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
