// barmon library - public API

// Re-export error types
pub mod error;
pub use error::{BarError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::BarConfig;
pub use crate::core::modules::{BarModule, ModuleKind};

/// Initialize logging. `RUST_LOG` wins over the default level, which is
/// `warn`, or `debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
