// Server module entry point
// Binds the listener, accepts connections and stops on shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export common entry points
pub use listener::create_reusable_listener;
pub use server_loop::run_server_loop;
pub use signal::{start_signal_handler, Shutdown};
