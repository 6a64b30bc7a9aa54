//! textalign-cli
//!
//! Shared pieces of the `textalign` batch driver and the `textalign-query`
//! single-query tool.

pub mod args;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber; `RUST_LOG` overrides the default
/// `textalign=info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("textalign=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
