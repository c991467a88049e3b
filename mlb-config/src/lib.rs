//! CLI parsing, environment layering, JSON config-blob loading, and TLS
//! material loading for the `mlb-server` binary.

mod cli;
pub mod constants;
mod loader;
mod models;
pub mod tls;

pub use cli::Cli;
pub use loader::load_interval_secs;
pub use models::Config;
