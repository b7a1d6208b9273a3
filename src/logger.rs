use chrono::Local;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

use crate::config::Config;

pub fn log_server_start(port: u16, config: &Config) {
    println!("======================================");
    println!("Serving Cavalry Web Player at http://localhost:{port}/");
    println!("Document root: {}", config.paths.document_root.display());
    println!("Asset directory: {}", config.asset_dir().display());
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

/// Timestamped access log line, one per request
pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    let time = Local::now().format("%d/%b/%Y %H:%M:%S");
    println!("[{time}] \"{method} {uri} {version:?}\"");
}

pub fn log_response(size: usize) {
    println!("[Response] Sent 200 OK ({size} bytes)");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_shutdown() {
    println!("\nShutting down...");
}
