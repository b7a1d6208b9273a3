// Server loop module
// Accept loop with explicit shutdown instead of signal-driven process exit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::ShutdownSignal;
use crate::config::AppState;
use crate::logger;

/// How long to wait for in-flight connections after the listener closes
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Accept connections until the shutdown signal fires.
///
/// Accept errors are logged and the loop continues; only the shutdown
/// signal ends it. On shutdown the listener is dropped first (stopping new
/// connections and releasing the port), then in-flight connections get a
/// bounded drain window before the function returns `Ok(())`.
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: ShutdownSignal,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    // Also checked between iterations, so a trigger that lands while an
    // accept is being processed is not missed
    while !shutdown.is_triggered() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.wait() => break,
        }
    }

    logger::log_shutdown();

    // Stop accepting and release the descriptor before draining
    drop(listener);

    drain_active_connections(&active_connections).await;

    Ok(())
}

/// Wait for in-flight connections to finish, bounded by `DRAIN_TIMEOUT`.
async fn drain_active_connections(active_connections: &Arc<AtomicUsize>) {
    let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
    while active_connections.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown drain timed out with {} connection(s) still active",
                active_connections.load(Ordering::SeqCst)
            ));
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
