pub mod config;
pub mod loader;
pub mod metrics;
pub mod plot;
pub mod record;
pub mod util;
pub mod value;

/// Placeholder version for files whose name carries no `vMAJOR.MINOR` tag
pub const UNKNOWN_VERSION: &str = "unknown";
