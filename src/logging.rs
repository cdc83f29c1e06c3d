//! Logger initialization helpers.
//!
//! The crate itself only emits through the `log` facade. Binaries and tests call one
//! of these helpers to install `env_logger`; repeated calls are ignored.

use once_cell::sync::OnceCell;

static LOGGER: OnceCell<()> = OnceCell::new();

/// Initializes the logger with the `env_logger` crate, honouring `RUST_LOG`.
pub fn init_logger() {
    LOGGER.get_or_init(|| {
        if env_logger::try_init().is_err() {
            log::debug!("Logger already installed by another component");
        }
    });
}

/// Initializes the logger with an explicit filter string (e.g. `"lr11x0_radio=debug"`).
///
/// Used by test binaries and tools that should not depend on the environment.
pub fn init_logger_with_filter(filter: &str) {
    LOGGER.get_or_init(|| {
        let result = env_logger::Builder::new()
            .parse_filters(filter)
            .is_test(cfg!(test))
            .try_init();
        if result.is_err() {
            log::debug!("Logger already installed by another component");
        }
    });
}

/// Returns true once one of the init helpers has run.
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logger_with_filter("debug");
        init_logger();
        init_logger_with_filter("trace");
        assert!(is_initialized());
    }
}
