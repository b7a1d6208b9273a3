//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, rewrite and
//! document-root dispatch, and the cross-origin isolation headers that every
//! response must carry.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    if state.config.logging.access_log {
        logger::log_request(req.method(), req.uri(), req.version());
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    Ok(respond(&method, &path, &state).await)
}

/// Produce the response for a single request.
///
/// Split from `handle_request` so the full dispatch path can be exercised
/// without a live hyper connection.
pub async fn respond(method: &Method, path: &str, state: &AppState) -> Response<Full<Bytes>> {
    let mut response = match *method {
        Method::GET => static_files::serve(path, false, state).await,
        Method::HEAD => static_files::serve(path, true, state).await,
        Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response()
        }
    };

    // Appended after all other headers, on every response class
    http::append_isolation_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LoggingConfig, PathsConfig, ServerConfig};
    use http_body_util::BodyExt;
    use std::path::{Path, PathBuf};

    fn state_for(root: &Path) -> AppState {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                start_port: 8000,
                max_port_attempts: 10,
                workers: None,
            },
            paths: PathsConfig {
                document_root: root.to_path_buf(),
                asset_dir: PathBuf::from("wasm-lib"),
                index_files: vec!["index.html".to_string(), "index.htm".to_string()],
            },
            logging: LoggingConfig { access_log: false },
        };
        AppState::new(&config)
    }

    fn assert_isolation_headers(response: &Response<Full<Bytes>>) {
        assert_eq!(
            response.headers().get("Cross-Origin-Embedder-Policy").unwrap(),
            "require-corp"
        );
        assert_eq!(
            response.headers().get("Cross-Origin-Opener-Policy").unwrap(),
            "same-origin"
        );
    }

    #[tokio::test]
    async fn test_get_found_carries_isolation_headers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>demo</html>").unwrap();
        let state = state_for(dir.path());

        let response = respond(&Method::GET, "/index.html", &state).await;
        assert_eq!(response.status(), 200);
        assert_isolation_headers(&response);
    }

    #[tokio::test]
    async fn test_not_found_carries_isolation_headers() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let response = respond(&Method::GET, "/missing.html", &state).await;
        assert_eq!(response.status(), 404);
        assert_isolation_headers(&response);
    }

    #[tokio::test]
    async fn test_options_carries_isolation_headers() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let response = respond(&Method::OPTIONS, "/", &state).await;
        assert_eq!(response.status(), 204);
        assert_eq!(response.headers().get("Allow").unwrap(), "GET, HEAD, OPTIONS");
        assert_isolation_headers(&response);
    }

    #[tokio::test]
    async fn test_unsupported_methods_are_405() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let response = respond(&method, "/index.html", &state).await;
            assert_eq!(response.status(), 405);
            assert_isolation_headers(&response);
        }
    }

    #[tokio::test]
    async fn test_head_has_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>demo</html>").unwrap();
        let state = state_for(dir.path());

        let response = respond(&Method::HEAD, "/index.html", &state).await;
        assert_eq!(response.status(), 200);
        assert_isolation_headers(&response);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
