//! Unit tests for the error enums and their `Display` implementations.

use lr11x0_radio::{
    Bandwidth, ChipError, ConfigError, ErrorKind, HalError, LoRaConfig, RadioError, RadioMode,
};

/// Tests that the `InvalidMode` variant names the operation and the mode.
#[test]
fn test_invalid_mode_error() {
    let err = RadioError::InvalidMode {
        op: "sleep",
        mode: RadioMode::Transmitting,
    };
    assert_eq!(err.to_string(), "sleep is not valid in mode Transmitting");
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

/// Tests that the `Busy` variant is correctly formatted and transient.
#[test]
fn test_busy_error() {
    let err = RadioError::Busy;
    assert_eq!(err.to_string(), "Radio busy, command not issued");
    assert!(err.is_transient());
}

/// Tests that payload errors are reported as invalid parameters.
#[test]
fn test_payload_errors() {
    let err = RadioError::PayloadTooLarge { len: 300, max: 255 };
    assert_eq!(err.to_string(), "Payload too large: 300 bytes (max 255)");
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let err = RadioError::EmptyPayload;
    assert_eq!(err.to_string(), "Empty payload");
}

/// Tests that chip errors keep their cause in the message.
#[test]
fn test_chip_error_wrapping() {
    let err = RadioError::Communication(ChipError::Timeout);
    assert_eq!(
        err.to_string(),
        "Communication with radio failed: Timeout waiting for BUSY to release"
    );

    let err = RadioError::SleepFailed(ChipError::Rejected { code: -3 });
    assert_eq!(
        err.to_string(),
        "Sleep command failed: Command rejected with status -3"
    );
    assert!(err.is_transient());

    let err: RadioError = ChipError::InvalidParameter {
        param: "frequency",
        value: 42,
    }
    .into();
    assert_eq!(err.to_string(), "Radio rejected parameter: Invalid frequency: 42");
}

/// Tests that a HAL failure inside the driver counts as a communication error.
#[test]
fn test_hal_errors() {
    let err: RadioError = ChipError::from(HalError::Spi).into();
    assert_eq!(err.kind(), ErrorKind::Communication);

    let err: RadioError = HalError::Gpio(17).into();
    assert_eq!(err.to_string(), "HAL error: GPIO operation error on pin 17");
    assert_eq!(err.kind(), ErrorKind::Communication);
}

/// Tests that configuration errors convert and format.
#[test]
fn test_config_errors() {
    let err = ConfigError::FrequencyOutOfRange(1_000);
    assert_eq!(err.to_string(), "Frequency 1000 Hz is outside the supported bands");

    let err = ConfigError::BandwidthNotAvailable(Bandwidth::BW812);
    assert_eq!(
        err.to_string(),
        "Bandwidth BW812 is only available in the 2.4 GHz band"
    );

    let err: RadioError = ConfigError::PreambleTooShort(4).into();
    assert_eq!(
        err.to_string(),
        "Invalid configuration: Preamble length 4 is shorter than 6 symbols"
    );
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);

    let parse = LoRaConfig::from_json("{ not json").unwrap_err();
    assert!(matches!(parse, ConfigError::Parse(_)));
}
