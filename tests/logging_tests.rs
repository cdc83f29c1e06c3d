//! Tests for the logger initialization helpers.

use lr11x0_radio::logging::is_initialized;
use lr11x0_radio::{init_logger, init_logger_with_filter};

/// Tests that the logger initializes once and that log macros do not panic afterwards.
#[test]
fn test_init_logger() {
    init_logger_with_filter("lr11x0_radio=trace");
    assert!(is_initialized());

    log::error!("This is an error message");
    log::warn!("This is a warning message");
    log::info!("This is an info message");
    log::debug!("This is a debug message");
}

/// Repeated initialization is ignored rather than panicking.
#[test]
fn test_init_logger_repeated() {
    init_logger();
    init_logger();
    init_logger_with_filter("warn");
    assert!(is_initialized());
}
