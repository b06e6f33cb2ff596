//! docsite CLI Library
//!
//! Build-end tooling for the C Web Framework documentation site. The binary
//! entry point lives in `main.rs`; commands are exposed here so they can be
//! driven from tests.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, sitemap, urls, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use docsite::cmd;
//!
//! # async fn example() -> color_eyre::eyre::Result<()> {
//! let paths = cmd::Paths::default();
//! cmd::build::run(Path::new("site.toml"), &paths, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod cmd;

pub use docsite_core::Config;
pub use docsite_generator::{BuildStats, Builder};

/// Initialize tracing with the specified verbosity level.
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
