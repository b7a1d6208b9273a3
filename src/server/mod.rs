// Server module entry
// Listener setup, connection handling and graceful shutdown.

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword and cannot name a module directly; use server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::bind_first_available;
pub use server_loop::run;
pub use signal::ShutdownSignal;
