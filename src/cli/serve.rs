use repo_sync::core::{SyncError, SyncResult};
use repo_sync::di::ServiceContainer;
use repo_sync::server;
use repo_sync::sync::BatchSyncOrchestrator;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn run(bind: String) -> SyncResult<()> {
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| SyncError::Validation(format!("Invalid bind address '{}': {}", bind, e)))?;

    let orchestrator = Arc::new(BatchSyncOrchestrator::new(ServiceContainer::new()?));
    println!("Listening on http://{}", addr);

    server::serve(addr, orchestrator).await
}
