// Server module entry
// Listener setup, connection serving, the accept loop and signal handling

pub mod connection;
pub mod listener;
pub mod serve;
pub mod signal;

pub use listener::create_listener;
pub use serve::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};
