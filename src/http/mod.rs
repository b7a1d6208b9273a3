//! HTTP protocol layer module
//!
//! Content-type and response-building primitives, decoupled from path
//! resolution and the server loop.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use mime::MimeTable;
pub use response::{
    append_isolation_headers, build_403_response, build_404_response, build_405_response,
    build_500_response, build_file_response, build_options_response,
};
