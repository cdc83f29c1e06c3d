//! # LR11x0 Chip Driver Seam
//!
//! The adapter never talks to registers itself. It issues a small, fixed command
//! vocabulary through [`ChipDriver`], implemented once per driver library, and
//! reads the chip family's capabilities from the [`Variant`] marker at compile
//! time.
//!
//! Every `ChipDriver` method that touches the SPI bus is invoked by the adapter
//! while it holds the HAL bus lock; implementations must not take that lock
//! themselves.

use crate::constants::{
    CHIP_TYPE_LR1110, CHIP_TYPE_LR1120, CHIP_TYPE_LR1121, LOW_POWER_PA_MAX_DBM,
    LR11X0_MAX_POWER_2G4_DBM, LR11X0_MAX_POWER_DBM,
};
use crate::radio::cad::CadParams;
use crate::radio::hal::{HalError, PinAssignments};
use crate::radio::irq::{IrqFlags, IrqLine};
use crate::radio::modulation::{Bandwidth, CodingRate, SpreadingFactor};
use thiserror::Error;

/// Errors reported by a chip driver
#[derive(Debug, Error)]
pub enum ChipError {
    /// SPI transaction failed or returned garbage
    #[error("SPI transaction failed: {0}")]
    Bus(String),
    /// BUSY line never released
    #[error("Timeout waiting for BUSY to release")]
    Timeout,
    /// Chip or driver refused a parameter value
    #[error("Invalid {param}: {value}")]
    InvalidParameter { param: &'static str, value: i64 },
    /// Command not accepted, driver-specific status code
    #[error("Command rejected with status {code}")]
    Rejected { code: i16 },
    /// Underlying HAL failure (GPIO, bus)
    #[error("HAL error: {0}")]
    Hal(#[from] HalError),
}

/// Result of the GetVersion command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipVersion {
    pub hardware: u8,
    pub chip_type: u8,
    pub firmware: u16,
}

/// Power amplifier path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaSelection {
    /// Sub-GHz low power PA, up to +14 dBm
    LowPower,
    /// Sub-GHz high power PA, up to +22 dBm
    HighPower,
    /// 2.4 GHz PA
    HighFrequency,
}

impl PaSelection {
    pub fn for_output(power_dbm: i8, band_2g4: bool) -> Self {
        if band_2g4 {
            Self::HighFrequency
        } else if power_dbm <= LOW_POWER_PA_MAX_DBM {
            Self::LowPower
        } else {
            Self::HighPower
        }
    }
}

/// Compile-time description of one LR11x0 family member
pub trait Variant: Send + 'static {
    /// Human readable part name
    const NAME: &'static str;
    /// Chip type byte expected from GetVersion
    const CHIP_TYPE: u8;
    /// Whether the part has the 2.4 GHz front end
    const HAS_2G4: bool;

    /// Highest output power for the selected band
    fn max_power_dbm(band_2g4: bool) -> i8 {
        if band_2g4 {
            LR11X0_MAX_POWER_2G4_DBM
        } else {
            LR11X0_MAX_POWER_DBM
        }
    }
}

/// LR1110: sub-GHz LoRa with GNSS and Wi-Fi scanning
#[derive(Debug, Clone, Copy, Default)]
pub struct Lr1110;

/// LR1120: LR1110 plus 2.4 GHz and S-band
#[derive(Debug, Clone, Copy, Default)]
pub struct Lr1120;

/// LR1121: sub-GHz and 2.4 GHz LoRa transceiver only
#[derive(Debug, Clone, Copy, Default)]
pub struct Lr1121;

impl Variant for Lr1110 {
    const NAME: &'static str = "LR1110";
    const CHIP_TYPE: u8 = CHIP_TYPE_LR1110;
    const HAS_2G4: bool = false;
}

impl Variant for Lr1120 {
    const NAME: &'static str = "LR1120";
    const CHIP_TYPE: u8 = CHIP_TYPE_LR1120;
    const HAS_2G4: bool = true;
}

impl Variant for Lr1121 {
    const NAME: &'static str = "LR1121";
    const CHIP_TYPE: u8 = CHIP_TYPE_LR1121;
    const HAS_2G4: bool = true;
}

/// Command vocabulary the adapter needs from an LR11x0 driver
pub trait ChipDriver {
    type Variant: Variant;

    // Setup

    /// Bind the driver to the board wiring (chip select, BUSY, reset)
    fn attach(&mut self, pins: &PinAssignments) -> Result<(), ChipError>;
    /// Pulse NRESET and wait for BUSY to drop
    fn reset(&mut self) -> Result<(), ChipError>;
    fn identify(&mut self) -> Result<ChipVersion, ChipError>;
    /// Enter STDBY_RC; also wakes the chip from sleep
    fn set_standby(&mut self) -> Result<(), ChipError>;
    fn set_tcxo(&mut self, millivolts: u16) -> Result<(), ChipError>;
    fn set_regulator_dcdc(&mut self, enabled: bool) -> Result<(), ChipError>;
    fn set_crc(&mut self, enabled: bool) -> Result<(), ChipError>;
    fn set_rx_boosted_gain(&mut self, enabled: bool) -> Result<(), ChipError>;

    // Modem

    fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), ChipError>;
    fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), ChipError>;
    fn set_spreading_factor(&mut self, sf: SpreadingFactor) -> Result<(), ChipError>;
    fn set_coding_rate(&mut self, cr: CodingRate) -> Result<(), ChipError>;
    fn set_sync_word(&mut self, sync_word: u8) -> Result<(), ChipError>;
    fn set_preamble_length(&mut self, symbols: u16) -> Result<(), ChipError>;
    /// Select the PA path and program the output power
    fn configure_pa(&mut self, pa: PaSelection, power_dbm: i8) -> Result<(), ChipError>;

    // Receive and transmit

    /// Continuous receive with the given IRQ sources routed to the IRQ pin
    fn start_receive(&mut self, irq_mask: IrqFlags) -> Result<(), ChipError>;
    fn start_transmit(&mut self, payload: &[u8]) -> Result<(), ChipError>;
    fn read_irq_flags(&mut self) -> Result<IrqFlags, ChipError>;
    fn clear_irq_flags(&mut self, flags: IrqFlags) -> Result<(), ChipError>;
    /// Copy the last received payload into `buf`, returning its length
    fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, ChipError>;

    // Status

    /// SNR of the last packet in dB
    fn read_snr(&mut self) -> Result<f32, ChipError>;
    /// RSSI of the last packet in dBm
    fn read_rssi(&mut self) -> Result<f32, ChipError>;
    /// Run one CAD, returning true if a LoRa preamble was detected
    fn scan_channel(&mut self, params: &CadParams) -> Result<bool, ChipError>;
    /// State of the BUSY line
    fn is_busy(&mut self) -> Result<bool, ChipError>;

    /// Enter sleep; with `retain_config` false the chip forgets its settings
    fn sleep(&mut self, retain_config: bool) -> Result<(), ChipError>;

    /// Host-side IRQ line for this chip. Touches no bus.
    fn irq_line(&self) -> &IrqLine;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pa_selection() {
        assert_eq!(PaSelection::for_output(10, false), PaSelection::LowPower);
        assert_eq!(PaSelection::for_output(14, false), PaSelection::LowPower);
        assert_eq!(PaSelection::for_output(15, false), PaSelection::HighPower);
        assert_eq!(PaSelection::for_output(10, true), PaSelection::HighFrequency);
    }

    #[test]
    fn test_variant_capabilities() {
        assert!(!Lr1110::HAS_2G4);
        assert!(Lr1120::HAS_2G4);
        assert!(Lr1121::HAS_2G4);
        assert_eq!(Lr1121::CHIP_TYPE, 0x03);
        assert_eq!(Lr1110::max_power_dbm(false), 22);
        assert_eq!(Lr1121::max_power_dbm(true), 13);
    }
}
