// Connection handling module
// Accepts a single TCP connection and serves it to completion.

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection and serve it in a spawned task.
///
/// The counter tracks in-flight connections for the shutdown drain.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve a single connection.
///
/// Wraps the stream in `TokioIo`, serves HTTP/1.1 with keep-alive, and
/// decrements the connection counter when the connection closes. Serve
/// errors are logged per-connection and never reach the accept loop.
fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().keep_alive(true).serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, state).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
