//! # lr11x0-radio - Lifecycle and Interrupt Adapter for LR11x0 LoRa Transceivers
//!
//! The lr11x0-radio crate drives the Semtech LR11x0 family (LR1110, LR1120, LR1121)
//! behind a single lifecycle and interrupt-handling contract, so that a mesh stack
//! sitting on top never needs per-chip logic.
//!
//! ## Features
//!
//! - Radio mode state machine (standby, receive, transmit, sleep) with per-call validation
//! - Interrupt glue built on a critical-section guarded `fn()` slot and an atomic pending flag
//! - Channel activity detection and "actively receiving" tracking for listen-before-talk
//! - Power amplifier path selection and TX/RX front-end switching before transmit
//! - Receive metadata (SNR, RSSI) enrichment with "unknown" sentinels on read failure
//! - Serde-backed provisioning with Meshtastic-style modem presets
//! - Scoped bus locking through a pluggable hardware abstraction layer
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lr11x0_radio::{init_logger, LoRaConfig, Lr11x0Interface, ModemPreset, PinAssignments};
//! # fn demo<C, H>(chip: C, hal: std::sync::Arc<H>) -> Result<(), lr11x0_radio::RadioError>
//! # where C: lr11x0_radio::ChipDriver, H: lr11x0_radio::Hal {
//! static RX_EVENT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
//! fn on_rx() {
//!     RX_EVENT.store(true, std::sync::atomic::Ordering::Release);
//! }
//!
//! init_logger();
//! let pins = PinAssignments::new(8, 24, 22, 25);
//! let config = LoRaConfig::from_preset(ModemPreset::LongFast, 869_525_000);
//! let mut radio = Lr11x0Interface::new(chip, hal, pins, config);
//! radio.set_isr_handlers(on_rx, on_rx);
//! radio.init()?;
//! radio.start_receive()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod radio;

pub use crate::config::{ConfigError, LoRaConfig, ModemPreset};
pub use crate::error::{ErrorKind, RadioError};
pub use crate::logging::{init_logger, init_logger_with_filter};

pub use radio::cad::CadParams;
pub use radio::chip::{
    ChipDriver, ChipError, ChipVersion, Lr1110, Lr1120, Lr1121, PaSelection, Variant,
};
pub use radio::hal::{BusLock, Hal, HalError, Pin, PinAssignments};
pub use radio::interface::{IsrHandlers, Lr11x0Interface, RadioEvent, RadioMode};
pub use radio::irq::{IrqCallback, IrqFlags, IrqLine};
pub use radio::modulation::{Bandwidth, CodingRate, SpreadingFactor};
pub use radio::packet::{ReceivedPacket, RxMetadata};

#[cfg(feature = "raspberry-pi")]
pub use radio::hal::raspberry_pi::{RaspberryPiHal, RpiHalError};
