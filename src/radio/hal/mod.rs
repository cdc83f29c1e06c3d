//! # Hardware Abstraction Layer for Radio Hardware
//!
//! This module defines the HAL trait consumed by the LR11x0 adapter: a scoped lock
//! around the shared SPI bus plus plain GPIO access for the board's control lines.
//! Register transactions themselves belong to the chip driver; the HAL only
//! guarantees that they never interleave with another user of the bus.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// GPIO pin number (BCM numbering on Raspberry Pi, port pin elsewhere)
pub type Pin = u8;

/// Errors that can occur during HAL operations
#[derive(Debug, Error)]
pub enum HalError {
    #[error("SPI communication error")]
    Spi,

    #[error("GPIO operation error on pin {0}")]
    Gpio(Pin),

    #[error("Pin {0} is not managed by this HAL")]
    UnknownPin(Pin),

    #[error("Bus lock poisoned by a panicking holder")]
    LockPoisoned,

    #[error("Timeout waiting for operation")]
    Timeout,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Hardware Abstraction Layer trait for LR11x0 radio control
///
/// Implementations are shared between the adapter and the chip driver (and possibly
/// other devices on the same bus), so every method takes `&self`.
pub trait Hal: Send + Sync {
    /// Guard returned by [`Hal::lock_bus`]; the bus is released when it drops.
    type BusGuard<'a>
    where
        Self: 'a;

    /// Acquire exclusive access to the radio's SPI bus
    fn lock_bus(&self) -> Result<Self::BusGuard<'_>, HalError>;

    /// Read the state of a GPIO pin
    fn gpio_read(&self, pin: Pin) -> Result<bool, HalError>;

    /// Drive a GPIO output pin
    fn gpio_write(&self, pin: Pin, high: bool) -> Result<(), HalError>;
}

/// Mutex-backed bus lock for HAL implementations running on an OS.
#[derive(Debug, Default)]
pub struct BusLock {
    inner: Mutex<()>,
}

impl BusLock {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(()),
        }
    }

    /// Block until the bus is free
    pub fn acquire(&self) -> Result<MutexGuard<'_, ()>, HalError> {
        self.inner.lock().map_err(|_| HalError::LockPoisoned)
    }

    /// Attempt to take the bus without blocking
    pub fn try_acquire(&self) -> Option<MutexGuard<'_, ()>> {
        self.inner.try_lock().ok()
    }
}

/// Board wiring between the host and one LR11x0 module
///
/// Optional lines are left `None` when the module handles them internally
/// (e.g. an RF switch driven from the chip's DIO pins).
///
/// # Examples
///
/// ```rust
/// use lr11x0_radio::PinAssignments;
///
/// let pins = PinAssignments::new(8, 24, 22, 25)
///     .with_rf_switch(5, 6)
///     .with_power_enable(26);
/// assert_eq!(pins.rx_enable, Some(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAssignments {
    /// SPI chip select (NSS)
    pub cs: Pin,
    /// IRQ line (DIO9 on LR11x0 modules)
    pub irq: Pin,
    /// NRESET (active low)
    pub reset: Pin,
    /// BUSY (input, high while the chip processes a command)
    pub busy: Pin,
    /// External PA / TX switch enable
    pub tx_enable: Option<Pin>,
    /// External LNA / RX switch enable
    pub rx_enable: Option<Pin>,
    /// Module power supply enable
    pub power_enable: Option<Pin>,
}

impl PinAssignments {
    pub const fn new(cs: Pin, irq: Pin, reset: Pin, busy: Pin) -> Self {
        Self {
            cs,
            irq,
            reset,
            busy,
            tx_enable: None,
            rx_enable: None,
            power_enable: None,
        }
    }

    pub const fn with_rf_switch(mut self, tx_enable: Pin, rx_enable: Pin) -> Self {
        self.tx_enable = Some(tx_enable);
        self.rx_enable = Some(rx_enable);
        self
    }

    pub const fn with_power_enable(mut self, power_enable: Pin) -> Self {
        self.power_enable = Some(power_enable);
        self
    }
}

// Platform implementations
#[cfg(feature = "raspberry-pi")]
pub mod raspberry_pi;

#[cfg(feature = "raspberry-pi")]
pub use raspberry_pi::{RaspberryPiHal, RpiHalError};
