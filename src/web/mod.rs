pub mod routes;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::io::store::TodoStore;

pub use routes::{AppState, create_router};

/// Serve the web UI on localhost until Ctrl+C.
pub async fn serve(store: TodoStore, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let root = store.root().display().to_string();
    let app = create_router(AppState::new(store));

    info!(address = %addr, project = %root, "web ui listening");
    println!("Serving todos at http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("web ui stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
