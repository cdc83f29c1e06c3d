//! # Radio Error Handling
//!
//! This module defines the RadioError enum returned by every fallible adapter
//! operation, and the coarse [`ErrorKind`] a caller uses to pick a recovery policy.

use crate::config::ConfigError;
use crate::radio::chip::ChipError;
use crate::radio::hal::HalError;
use crate::radio::interface::RadioMode;
use thiserror::Error;

/// Represents the different error types that can occur in the radio adapter.
#[derive(Debug, Error)]
pub enum RadioError {
    /// The chip could not be reached over the bus.
    #[error("Communication with radio failed: {0}")]
    Communication(ChipError),

    /// The chip answered but is not the expected family member.
    #[error("Wrong chip: expected {variant} (type 0x{expected:02X}), found type 0x{found:02X}")]
    WrongChip {
        variant: &'static str,
        expected: u8,
        found: u8,
    },

    /// The chip refused a parameter value.
    #[error("Radio rejected parameter: {0}")]
    InvalidParameter(ChipError),

    /// BUSY is still asserted; the command was not issued.
    #[error("Radio busy, command not issued")]
    Busy,

    /// The chip did not accept a command.
    #[error("Radio rejected command: {0}")]
    CommandRejected(ChipError),

    /// The sleep command could not be confirmed.
    #[error("Sleep command failed: {0}")]
    SleepFailed(ChipError),

    /// The operation is not allowed in the current mode.
    #[error("{op} is not valid in mode {mode:?}")]
    InvalidMode { op: &'static str, mode: RadioMode },

    #[error("Payload too large: {len} bytes (max {max})")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Empty payload")]
    EmptyPayload,

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("HAL error: {0}")]
    Hal(#[from] HalError),
}

/// Recovery category of a [`RadioError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bus or chip unreachable; fatal during init
    Communication,
    /// Settings rejected; caller may fall back to previous settings
    InvalidParameter,
    /// Try again later
    Transient,
    /// Call made in the wrong mode
    InvalidState,
}

impl RadioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RadioError::Communication(_) | RadioError::WrongChip { .. } | RadioError::Hal(_) => {
                ErrorKind::Communication
            }
            RadioError::InvalidParameter(_)
            | RadioError::Config(_)
            | RadioError::PayloadTooLarge { .. }
            | RadioError::EmptyPayload => ErrorKind::InvalidParameter,
            RadioError::Busy | RadioError::CommandRejected(_) | RadioError::SleepFailed(_) => {
                ErrorKind::Transient
            }
            RadioError::InvalidMode { .. } => ErrorKind::InvalidState,
        }
    }

    /// True for errors the caller should simply retry
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

/// Classify a driver error by what went wrong on the chip side.
impl From<ChipError> for RadioError {
    fn from(err: ChipError) -> Self {
        match err {
            ChipError::InvalidParameter { .. } => RadioError::InvalidParameter(err),
            ChipError::Rejected { .. } => RadioError::CommandRejected(err),
            ChipError::Bus(_) | ChipError::Timeout | ChipError::Hal(_) => {
                RadioError::Communication(err)
            }
        }
    }
}
