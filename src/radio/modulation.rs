//! LoRa modulation parameters for the LR11x0 family
//!
//! Register codes follow the LR11x0 SetModulationParams command. The 2.4 GHz
//! capable parts (LR1120, LR1121) add three wide bandwidths that are only
//! usable in that band.

use serde::{Deserialize, Serialize};

/// Spreading Factor for LoRa
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpreadingFactor {
    SF5 = 0x05,
    SF6 = 0x06,
    SF7 = 0x07,
    SF8 = 0x08,
    SF9 = 0x09,
    SF10 = 0x0A,
    SF11 = 0x0B,
    SF12 = 0x0C,
}

impl SpreadingFactor {
    /// Numeric spreading factor (5..=12)
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(sf: u8) -> Option<Self> {
        match sf {
            5 => Some(Self::SF5),
            6 => Some(Self::SF6),
            7 => Some(Self::SF7),
            8 => Some(Self::SF8),
            9 => Some(Self::SF9),
            10 => Some(Self::SF10),
            11 => Some(Self::SF11),
            12 => Some(Self::SF12),
            _ => None,
        }
    }
}

/// LoRa bandwidth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bandwidth {
    BW7_8 = 0x00,    // 7.8 kHz
    BW10_4 = 0x08,   // 10.4 kHz
    BW15_6 = 0x01,   // 15.6 kHz
    BW20_8 = 0x09,   // 20.8 kHz
    BW31_2 = 0x02,   // 31.25 kHz
    BW41_7 = 0x0A,   // 41.7 kHz
    BW62_5 = 0x03,   // 62.5 kHz
    BW125 = 0x04,    // 125 kHz
    BW250 = 0x05,    // 250 kHz
    BW500 = 0x06,    // 500 kHz
    BW203 = 0x0D,    // 203.125 kHz, 2.4 GHz only
    BW406 = 0x0E,    // 406.25 kHz, 2.4 GHz only
    BW812 = 0x0F,    // 812.5 kHz, 2.4 GHz only
}

impl Bandwidth {
    /// Register code for SetModulationParams
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Bandwidth in Hz
    pub fn hz(self) -> u32 {
        match self {
            Self::BW7_8 => 7_810,
            Self::BW10_4 => 10_420,
            Self::BW15_6 => 15_630,
            Self::BW20_8 => 20_830,
            Self::BW31_2 => 31_250,
            Self::BW41_7 => 41_670,
            Self::BW62_5 => 62_500,
            Self::BW125 => 125_000,
            Self::BW250 => 250_000,
            Self::BW500 => 500_000,
            Self::BW203 => 203_125,
            Self::BW406 => 406_250,
            Self::BW812 => 812_500,
        }
    }

    /// Bandwidths only available in the 2.4 GHz band
    pub fn is_wide(self) -> bool {
        matches!(self, Self::BW203 | Self::BW406 | Self::BW812)
    }

    /// Equivalent wide bandwidth used when a sub-GHz setting is moved to 2.4 GHz
    pub fn widened(self) -> Self {
        match self {
            Self::BW62_5 => Self::BW203,
            Self::BW125 => Self::BW406,
            Self::BW250 | Self::BW500 => Self::BW812,
            other => other,
        }
    }
}

/// Coding Rate (CR) for LoRa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodingRate {
    CR4_5 = 0x01,
    CR4_6 = 0x02,
    CR4_7 = 0x03,
    CR4_8 = 0x04,
}

impl CodingRate {
    /// Denominator of the coding rate (4/5 -> 5)
    pub fn denominator(self) -> u8 {
        self as u8 + 4
    }

    pub fn from_denominator(cr: u8) -> Option<Self> {
        match cr {
            5 => Some(Self::CR4_5),
            6 => Some(Self::CR4_6),
            7 => Some(Self::CR4_7),
            8 => Some(Self::CR4_8),
            _ => None,
        }
    }
}

/// Symbol duration in microseconds: 2^SF / BW
pub fn symbol_time_us(sf: SpreadingFactor, bw: Bandwidth) -> u64 {
    (1u64 << sf.value()) * 1_000_000 / u64::from(bw.hz())
}

/// Low data rate optimisation is mandatory once a symbol exceeds 16 ms
pub fn low_data_rate_optimize(sf: SpreadingFactor, bw: Bandwidth) -> bool {
    symbol_time_us(sf, bw) > 16_000
}

/// LoRa time-on-air calculator (explicit header mode)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeOnAir {
    pub spreading_factor: SpreadingFactor,
    pub bandwidth: Bandwidth,
    pub coding_rate: CodingRate,
    pub preamble_symbols: u16,
    pub crc_enabled: bool,
}

impl TimeOnAir {
    /// Duration of the preamble plus sync symbols in microseconds
    pub fn preamble_us(&self) -> u64 {
        let t_sym = symbol_time_us(self.spreading_factor, self.bandwidth) as f64;
        ((f64::from(self.preamble_symbols) + 4.25) * t_sym) as u64
    }

    /// Full packet airtime in microseconds
    pub fn packet_us(&self, payload_bytes: usize) -> u64 {
        let sf = f64::from(self.spreading_factor.value());
        let t_sym = symbol_time_us(self.spreading_factor, self.bandwidth) as f64;
        let de = if low_data_rate_optimize(self.spreading_factor, self.bandwidth) {
            1.0
        } else {
            0.0
        };
        let crc_bits = if self.crc_enabled { 16.0 } else { 0.0 };

        // 8*PL - 4*SF + 28 + 16*CRC, explicit header
        let numerator = 8.0 * payload_bytes as f64 - 4.0 * sf + 28.0 + crc_bits;
        let denominator = 4.0 * (sf - 2.0 * de);
        let cr = f64::from(self.coding_rate.denominator());
        let payload_symbols = 8.0 + (numerator / denominator).ceil().max(0.0) * cr;

        self.preamble_us() + (payload_symbols * t_sym) as u64
    }
}
