//! LR11x0 Radio Constants
//!
//! Limits and defaults applied by the adapter, based on the LR1110/LR1120/LR1121
//! datasheets and the LoRa mesh modem settings.

/// Maximum LoRa payload length in bytes
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Maximum output power of the sub-GHz high power PA (dBm)
pub const LR11X0_MAX_POWER_DBM: i8 = 22;

/// Maximum output power of the 2.4 GHz PA (dBm)
pub const LR11X0_MAX_POWER_2G4_DBM: i8 = 13;

/// Minimum programmable output power (dBm)
pub const LR11X0_MIN_POWER_DBM: i8 = -9;

/// Highest power the low power PA path can deliver (dBm)
pub const LOW_POWER_PA_MAX_DBM: i8 = 14;

/// Preamble length used in sub-GHz bands (symbols)
pub const DEFAULT_PREAMBLE_LENGTH: u16 = 16;

/// Preamble length used in the 2.4 GHz band (symbols)
pub const PREAMBLE_LENGTH_2G4: u16 = 12;

/// Shortest preamble the LoRa modem accepts (symbols)
pub const MIN_PREAMBLE_LENGTH: u16 = 6;

/// Default LoRa sync word for private mesh networks
pub const DEFAULT_SYNC_WORD: u8 = 0x2B;

/// Sub-GHz frequency range (Hz)
pub const SUB_GHZ_MIN_HZ: u32 = 150_000_000;
pub const SUB_GHZ_MAX_HZ: u32 = 960_000_000;

/// 2.4 GHz ISM frequency range (Hz)
pub const BAND_2G4_MIN_HZ: u32 = 2_400_000_000;
pub const BAND_2G4_MAX_HZ: u32 = 2_500_000_000;

/// Default TCXO supply voltage (millivolts)
pub const DEFAULT_TCXO_VOLTAGE_MV: u16 = 1_600;

/// TCXO supply range supported by the DIO3 regulator (millivolts)
pub const TCXO_MIN_MV: u16 = 1_600;
pub const TCXO_MAX_MV: u16 = 3_300;

/// Symbols scanned per CAD in sub-GHz bands
pub const CAD_SYMBOLS: u8 = 2;

/// Symbols scanned per CAD in the 2.4 GHz band
pub const CAD_SYMBOLS_2G4: u8 = 4;

/// Chip type byte reported by the GetVersion command
pub const CHIP_TYPE_LR1110: u8 = 0x01;
pub const CHIP_TYPE_LR1120: u8 = 0x02;
pub const CHIP_TYPE_LR1121: u8 = 0x03;
