//! REST backend for pet medical records.
//!
//! Serves the `/api` routes over one SQLite [`Database`]. The same routes are
//! what [`pet_records_core::RemoteStore`] talks to.

pub mod error;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use routes::{router, AppState};

use pet_records_core::Database;
use tracing::info;

/// Serve the API at `addr` (e.g. `"127.0.0.1:3000"`) until Ctrl-C.
pub async fn serve(db: Database, addr: &str) -> std::io::Result<()> {
    let app = router(AppState::new(db));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Pet records API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
