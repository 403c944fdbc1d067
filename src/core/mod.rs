//! Core state shared across the client loops.

mod shutdown;

pub use shutdown::{is_shutdown, setup_shutdown_handler};
