//! # Raspberry Pi HAL Implementation
//!
//! Hardware abstraction layer for Raspberry Pi 4 and 5 boards carrying an LR11x0
//! module, built on the rppal crate.
//!
//! ### Pinout (40-pin GPIO header, SPI0)
//! ```text
//! Pi Pin │ BCM GPIO │ LR11x0 Pin │ Function
//! ───────┼──────────┼────────────┼─────────────────────
//! 19     │ GPIO 10  │ MOSI       │ SPI data out
//! 21     │ GPIO 9   │ MISO       │ SPI data in
//! 23     │ GPIO 11  │ SCK        │ SPI clock
//! 24     │ GPIO 8   │ NSS        │ Chip select (CE0)
//! 22     │ GPIO 25  │ BUSY       │ Status (input)
//! 18     │ GPIO 24  │ DIO9       │ IRQ (input)
//! 15     │ GPIO 22  │ NRESET     │ Reset (output)
//! ```
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use lr11x0_radio::{IrqLine, PinAssignments, RaspberryPiHal};
//! use std::sync::Arc;
//!
//! let pins = PinAssignments::new(8, 24, 22, 25);
//! let hal = Arc::new(RaspberryPiHal::new(0, &pins)?);
//! let line = Arc::new(IrqLine::new());
//! hal.bind_irq(Arc::clone(&line))?;
//! # Ok::<(), lr11x0_radio::RpiHalError>(())
//! ```

use crate::radio::hal::{BusLock, Hal, HalError, Pin, PinAssignments};
use crate::radio::irq::IrqLine;
use rppal::gpio::{Gpio, InputPin, Level, OutputPin, Trigger};
use rppal::spi::{BitOrder, Bus, Error as SpiError, Mode, SlaveSelect, Spi};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// SPI clock used for the LR11x0 (max 16 MHz)
const SPI_CLOCK_HZ: u32 = 8_000_000;

/// Errors specific to Raspberry Pi HAL implementation
#[derive(Error, Debug)]
pub enum RpiHalError {
    /// SPI bus initialization failed
    #[error("SPI initialization failed: {0}")]
    SpiInit(#[from] SpiError),
    /// GPIO initialization failed
    #[error("GPIO initialization failed: {0}")]
    GpioInit(#[from] rppal::gpio::Error),
    /// Invalid configuration parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// A lock protecting a peripheral was poisoned
    #[error("Peripheral lock poisoned")]
    LockPoisoned,
}

/// Raspberry Pi HAL for one LR11x0 module
///
/// The SPI peripheral stays inside the HAL; chip drivers reach it through
/// [`RaspberryPiHal::transfer`] while the adapter holds the bus lock.
pub struct RaspberryPiHal {
    bus: BusLock,
    spi: Mutex<Spi>,
    busy_pin: Mutex<InputPin>,
    irq_pin: Mutex<InputPin>,
    outputs: Mutex<HashMap<Pin, OutputPin>>,
    pins: PinAssignments,
}

impl RaspberryPiHal {
    /// Create a new Raspberry Pi HAL instance
    ///
    /// # Arguments
    ///
    /// * `spi_bus` - SPI bus number (0 for primary SPI, 1 for auxiliary SPI)
    /// * `pins` - Board wiring; `pins.cs` selects CE0 (GPIO 8) or CE1 (GPIO 7)
    ///
    /// Reset is released (driven high) and the TX/RX switch lines start low.
    pub fn new(spi_bus: u8, pins: &PinAssignments) -> Result<Self, RpiHalError> {
        let bus = match spi_bus {
            0 => Bus::Spi0,
            1 => Bus::Spi1,
            _ => {
                return Err(RpiHalError::InvalidConfig(format!(
                    "Invalid SPI bus {spi_bus}, only 0 and 1 are supported"
                )))
            }
        };
        let slave_select = match pins.cs {
            8 => SlaveSelect::Ss0,
            7 => SlaveSelect::Ss1,
            other => {
                return Err(RpiHalError::InvalidConfig(format!(
                    "Chip select GPIO {other} is not a hardware CE line"
                )))
            }
        };

        let spi = Spi::new(bus, slave_select, SPI_CLOCK_HZ, Mode::Mode0)?;
        spi.set_bit_order(BitOrder::MsbFirst)?;

        let gpio = Gpio::new()?;
        let busy_pin = gpio.get(pins.busy)?.into_input();
        let irq_pin = gpio.get(pins.irq)?.into_input_pulldown();

        let mut outputs = HashMap::new();
        let mut reset = gpio.get(pins.reset)?.into_output();
        reset.set_high();
        outputs.insert(pins.reset, reset);
        for pin in [pins.tx_enable, pins.rx_enable, pins.power_enable]
            .into_iter()
            .flatten()
        {
            let mut output = gpio.get(pin)?.into_output();
            output.set_low();
            outputs.insert(pin, output);
        }

        log::info!("Raspberry Pi HAL initialized:");
        log::info!("  SPI{spi_bus} CE{}", if pins.cs == 8 { 0 } else { 1 });
        log::info!("  BUSY: GPIO {}", pins.busy);
        log::info!("  IRQ: GPIO {}", pins.irq);
        log::info!("  RESET: GPIO {}", pins.reset);
        if let (Some(tx), Some(rx)) = (pins.tx_enable, pins.rx_enable) {
            log::info!("  RF switch: TX GPIO {tx}, RX GPIO {rx}");
        }
        if let Some(power) = pins.power_enable {
            log::info!("  POWER: GPIO {power}");
        }

        Ok(Self {
            bus: BusLock::new(),
            spi: Mutex::new(spi),
            busy_pin: Mutex::new(busy_pin),
            irq_pin: Mutex::new(irq_pin),
            outputs: Mutex::new(outputs),
            pins: *pins,
        })
    }

    /// Route rising edges of the IRQ pin to `line`
    ///
    /// rppal runs the handler on its own interrupt thread; [`IrqLine::on_edge`]
    /// only signals, so nothing on that thread touches the bus.
    pub fn bind_irq(&self, line: Arc<IrqLine>) -> Result<(), RpiHalError> {
        let mut irq_pin = self.irq_pin.lock().map_err(|_| RpiHalError::LockPoisoned)?;
        irq_pin.set_async_interrupt(Trigger::RisingEdge, move |_level| line.on_edge())?;
        log::debug!("IRQ GPIO {} bound", self.pins.irq);
        Ok(())
    }

    /// Full-duplex SPI transfer. Callers must hold the bus lock.
    pub fn transfer(&self, write: &[u8], read: &mut [u8]) -> Result<(), HalError> {
        let spi = self.spi.lock().map_err(|_| HalError::LockPoisoned)?;
        spi.transfer(read, write).map_err(|err| {
            log::warn!("SPI transfer failed: {err}");
            HalError::Spi
        })?;
        log::trace!("SPI transfer, {} bytes", write.len());
        Ok(())
    }

    /// Pulse NRESET low for 100 µs and give the chip time to boot
    pub fn reset_radio(&self) -> Result<(), HalError> {
        log::debug!("Performing hardware reset of LR11x0");
        self.gpio_write(self.pins.reset, false)?;
        thread::sleep(Duration::from_micros(100));
        self.gpio_write(self.pins.reset, true)?;
        thread::sleep(Duration::from_millis(1));
        Ok(())
    }

    fn read_input(pin: &Mutex<InputPin>, number: Pin) -> Result<bool, HalError> {
        let pin = pin.lock().map_err(|_| HalError::Gpio(number))?;
        Ok(pin.read() == Level::High)
    }
}

impl Hal for RaspberryPiHal {
    type BusGuard<'a> = MutexGuard<'a, ()>;

    fn lock_bus(&self) -> Result<Self::BusGuard<'_>, HalError> {
        self.bus.acquire()
    }

    fn gpio_read(&self, pin: Pin) -> Result<bool, HalError> {
        if pin == self.pins.busy {
            Self::read_input(&self.busy_pin, pin)
        } else if pin == self.pins.irq {
            Self::read_input(&self.irq_pin, pin)
        } else {
            let outputs = self.outputs.lock().map_err(|_| HalError::Gpio(pin))?;
            outputs
                .get(&pin)
                .map(|output| output.is_set_high())
                .ok_or(HalError::UnknownPin(pin))
        }
    }

    fn gpio_write(&self, pin: Pin, high: bool) -> Result<(), HalError> {
        let mut outputs = self.outputs.lock().map_err(|_| HalError::Gpio(pin))?;
        let output = outputs.get_mut(&pin).ok_or(HalError::UnknownPin(pin))?;
        if high {
            output.set_high();
        } else {
            output.set_low();
        }
        Ok(())
    }
}
