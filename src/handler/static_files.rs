//! Static file serving module
//!
//! Resolves request paths to files and serves their contents. Rewrite-table
//! hits are served straight from the asset directory; everything else goes
//! through the confined document-root resolver.

use crate::config::AppState;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve a GET/HEAD request path.
pub async fn serve(path: &str, is_head: bool, state: &AppState) -> Response<Full<Bytes>> {
    // Rewrite table takes precedence over document-root resolution
    if let Some(target) = state.rewrites.lookup(path) {
        return serve_resolved(target, is_head, state).await;
    }

    let resolved = resolve_under_root(
        &state.config.paths.document_root,
        path,
        &state.config.paths.index_files,
    );
    match resolved {
        Some(file_path) => serve_resolved(&file_path, is_head, state).await,
        None => http::build_404_response(),
    }
}

/// Read a resolved file and build the response, mapping read errors to
/// per-request statuses. No error here ever touches the accept loop.
async fn serve_resolved(file_path: &Path, is_head: bool, state: &AppState) -> Response<Full<Bytes>> {
    match fs::read(file_path).await {
        Ok(content) => {
            let content_type = state.mime.content_type(file_path);
            if state.config.logging.access_log {
                logger::log_response(content.len());
            }
            http::build_file_response(content, content_type, is_head)
        }
        Err(e) => match e.kind() {
            ErrorKind::NotFound => http::build_404_response(),
            ErrorKind::PermissionDenied => {
                logger::log_warning(&format!(
                    "Permission denied reading '{}': {e}",
                    file_path.display()
                ));
                http::build_403_response()
            }
            _ => {
                logger::log_error(&format!(
                    "Failed to read file '{}': {e}",
                    file_path.display()
                ));
                http::build_500_response()
            }
        },
    }
}

/// Resolve a request path to a file under the document root.
///
/// Percent-escapes are decoded, empty and `.` segments are dropped, and `..`
/// pops the previous segment so resolution can never climb above the root.
/// Directory targets are probed for an index file. The canonicalized result
/// must stay under the canonicalized root; anything else is `None` and the
/// caller answers 404.
fn resolve_under_root(root: &Path, request_path: &str, index_files: &[String]) -> Option<PathBuf> {
    let decoded = match urlencoding::decode(request_path) {
        Ok(decoded) => decoded,
        Err(e) => {
            logger::log_warning(&format!("Undecodable request path '{request_path}': {e}"));
            return None;
        }
    };

    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                relative.pop();
            }
            segment => relative.push(segment),
        }
    }

    let root_canonical = match root.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            logger::log_warning(&format!(
                "Document root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    let mut file_path = root.join(&relative);

    // Directories are served through an index file or not at all
    if file_path.is_dir() {
        file_path = index_files
            .iter()
            .map(|index| file_path.join(index))
            .find(|candidate| candidate.is_file())?;
    }

    // A missing file is the ordinary 404, not worth a warning
    let file_canonical = file_path.canonicalize().ok()?;
    if file_canonical.starts_with(&root_canonical) {
        Some(file_canonical)
    } else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {request_path} -> {}",
            file_canonical.display()
        ));
        None
    }
}
