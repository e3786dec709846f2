//! Tracing subscriber setup for hosts that have none of their own.

use tracing_subscriber::EnvFilter;

use crate::config::BridgeConfig;

/// Install a global fmt subscriber filtered by `config.log_filter`
/// (`RUST_LOG` wins when set). Returns `false` if a global subscriber was
/// already installed, which leaves that one in place.
pub fn init(config: &BridgeConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        let config = BridgeConfig::new().with_log_filter("formbridge=debug");
        let _ = init(&config);
        assert!(!init(&config));
    }
}
