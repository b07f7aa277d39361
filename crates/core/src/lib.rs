pub mod export;
pub mod human;
pub mod mock;
pub mod search;
pub mod treemap;
pub mod trend;
pub mod viewport;

pub use treemap::*;
pub use trend::*;
pub use viewport::*;

/// Install the workspace-wide tracing subscriber. `RUST_LOG` controls the
/// filter; defaults to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
