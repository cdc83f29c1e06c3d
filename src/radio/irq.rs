//! # LR11x0 Interrupt Handling
//!
//! This module covers both halves of the interrupt path:
//!
//! - [`IrqFlags`]: the chip's 32-bit IRQ status register, read and cleared over SPI
//!   from normal context only.
//! - [`IrqLine`]: the host side of the IRQ pin. The platform's edge handler calls
//!   [`IrqLine::on_edge`] in interrupt context; the adapter installs and removes the
//!   `fn()` callback from normal context.
//!
//! ## Handoff Model
//!
//! ```text
//!  IRQ pin edge ──► IrqLine::on_edge() ──► pending = true ──► callback()
//!                                                               │ (signal only)
//!  normal context ◄── take_pending() / read_irq_flags() ◄───────┘
//! ```
//!
//! The callback slot sits behind a `critical_section::Mutex`, and `on_edge` invokes
//! the callback while still inside the critical section. Attach and detach take the
//! same critical section, so once [`IrqLine::detach`] returns no edge can reach the
//! old callback.

use bitflags::bitflags;
use critical_section::Mutex;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Interrupt callback installed by the base radio interface.
///
/// Runs in interrupt context: it must only signal (set a flag, post to a queue) and
/// must never touch the SPI bus.
pub type IrqCallback = fn();

bitflags! {
    /// LR11x0 IRQ status bits (GetStatus / ClearIrq register layout)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lr11x0_radio::IrqFlags;
    ///
    /// let flags = IrqFlags::RX_DONE | IrqFlags::CRC_ERROR;
    /// assert!(flags.rx_done());
    /// assert!(flags.is_corrupt());
    /// ```
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct IrqFlags: u32 {
        /// Packet transmission completed
        const TX_DONE = 1 << 2;
        /// Packet reception completed
        const RX_DONE = 1 << 3;
        /// LoRa preamble detected
        const PREAMBLE_DETECTED = 1 << 4;
        /// Sync word (FSK) or valid LoRa header received
        const HEADER_VALID = 1 << 5;
        /// LoRa header CRC failed
        const HEADER_ERROR = 1 << 6;
        /// Payload CRC failed
        const CRC_ERROR = 1 << 7;
        /// Channel activity detection finished
        const CAD_DONE = 1 << 8;
        /// Channel activity detected during CAD
        const CAD_DETECTED = 1 << 9;
        /// RX or TX timeout
        const TIMEOUT = 1 << 10;
        /// Host command could not be executed
        const CMD_ERROR = 1 << 22;
        /// Internal chip error (see GetErrors)
        const ERROR = 1 << 23;
    }
}

impl IrqFlags {
    /// Sources armed while listening for packets
    pub const RX_MASK: Self = Self::RX_DONE
        .union(Self::TIMEOUT)
        .union(Self::CRC_ERROR)
        .union(Self::HEADER_ERROR)
        .union(Self::PREAMBLE_DETECTED)
        .union(Self::HEADER_VALID);

    /// Sources armed while transmitting
    pub const TX_MASK: Self = Self::TX_DONE.union(Self::TIMEOUT);

    pub fn rx_done(&self) -> bool {
        self.contains(Self::RX_DONE)
    }

    pub fn tx_done(&self) -> bool {
        self.contains(Self::TX_DONE)
    }

    pub fn has_any(&self) -> bool {
        !self.is_empty()
    }

    /// Preamble or header seen but the packet is not complete yet
    pub fn signal_detected(&self) -> bool {
        self.intersects(Self::PREAMBLE_DETECTED | Self::HEADER_VALID)
    }

    /// The received frame failed header or payload CRC
    pub fn is_corrupt(&self) -> bool {
        self.intersects(Self::CRC_ERROR | Self::HEADER_ERROR)
    }
}

/// Host-side IRQ line with a single callback slot
///
/// # Examples
///
/// ```rust
/// use lr11x0_radio::IrqLine;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// static HITS: AtomicU32 = AtomicU32::new(0);
/// fn on_irq() {
///     HITS.fetch_add(1, Ordering::Relaxed);
/// }
///
/// let line = IrqLine::new();
/// line.attach(on_irq);
/// line.on_edge();
/// line.detach();
/// line.on_edge();
/// assert_eq!(HITS.load(Ordering::Relaxed), 1);
/// ```
pub struct IrqLine {
    action: Mutex<Cell<Option<IrqCallback>>>,
    pending: AtomicBool,
    dispatched: AtomicU32,
    masked: AtomicU32,
}

impl IrqLine {
    pub const fn new() -> Self {
        Self {
            action: Mutex::new(Cell::new(None)),
            pending: AtomicBool::new(false),
            dispatched: AtomicU32::new(0),
            masked: AtomicU32::new(0),
        }
    }

    /// Install `callback`, replacing any previous one. Returns the replaced callback.
    pub fn attach(&self, callback: IrqCallback) -> Option<IrqCallback> {
        critical_section::with(|cs| self.action.borrow(cs).replace(Some(callback)))
    }

    /// Remove the callback and mask the line. Detaching an empty slot is a no-op.
    pub fn detach(&self) -> Option<IrqCallback> {
        let previous = critical_section::with(|cs| self.action.borrow(cs).take());
        // An edge that was dispatched before the detach is stale now
        self.pending.store(false, Ordering::Release);
        previous
    }

    pub fn is_attached(&self) -> bool {
        critical_section::with(|cs| self.action.borrow(cs).get().is_some())
    }

    /// Called by the platform edge handler in interrupt context.
    ///
    /// Edges arriving while no callback is attached are counted and dropped.
    pub fn on_edge(&self) {
        critical_section::with(|cs| match self.action.borrow(cs).get() {
            Some(callback) => {
                self.pending.store(true, Ordering::Release);
                self.dispatched.fetch_add(1, Ordering::Relaxed);
                callback();
            }
            None => {
                self.masked.fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    /// Consume the "event occurred" flag from normal context
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Number of edges delivered to a callback
    pub fn dispatch_count(&self) -> u32 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Number of edges dropped because the line was masked
    pub fn masked_count(&self) -> u32 {
        self.masked.load(Ordering::Relaxed)
    }
}

impl Default for IrqLine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IrqLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IrqLine")
            .field("attached", &self.is_attached())
            .field("pending", &self.is_pending())
            .field("dispatched", &self.dispatch_count())
            .field("masked", &self.masked_count())
            .finish()
    }
}
