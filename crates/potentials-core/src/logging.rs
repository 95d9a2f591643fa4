//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events. Applications and tests call
//! [`init`] once to see them on stderr.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber filtered by `RUST_LOG`, defaulting to `info`
///
/// Returns `false` when a global subscriber was already installed.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter)
}

/// Install a formatted subscriber with an explicit filter directive
pub fn init_with_filter(directive: &str) -> bool {
    install(EnvFilter::new(directive))
}

fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_with_filter("debug");
        assert!(!init_with_filter("info"));
    }
}
