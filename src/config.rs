//! Radio provisioning
//!
//! [`LoRaConfig`] is the full set of settings the adapter pushes to the chip on
//! `init()` and `reconfigure()`. It is plain serde data so a node can keep it in
//! its settings store and load it with [`LoRaConfig::from_json`].

use crate::constants::{
    BAND_2G4_MAX_HZ, BAND_2G4_MIN_HZ, DEFAULT_PREAMBLE_LENGTH, DEFAULT_SYNC_WORD,
    DEFAULT_TCXO_VOLTAGE_MV, LR11X0_MAX_POWER_DBM, LR11X0_MIN_POWER_DBM, MIN_PREAMBLE_LENGTH,
    PREAMBLE_LENGTH_2G4, SUB_GHZ_MAX_HZ, SUB_GHZ_MIN_HZ, TCXO_MAX_MV, TCXO_MIN_MV,
};
use crate::radio::chip::Variant;
use crate::radio::modulation::{Bandwidth, CodingRate, SpreadingFactor, TimeOnAir};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation and loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Frequency {0} Hz is outside the supported bands")]
    FrequencyOutOfRange(u32),

    #[error("{variant} has no 2.4 GHz front end")]
    BandNotSupported { variant: &'static str },

    #[error("Bandwidth {0:?} is only available in the 2.4 GHz band")]
    BandwidthNotAvailable(Bandwidth),

    #[error("Preamble length {0} is shorter than 6 symbols")]
    PreambleTooShort(u16),

    #[error("TCXO voltage {0} mV outside 1600-3300 mV")]
    TcxoVoltage(u16),

    #[error("TX power {0} dBm below the chip minimum of -9 dBm")]
    PowerTooLow(i8),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Named modem settings shared by every node of a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModemPreset {
    ShortTurbo,
    ShortFast,
    ShortSlow,
    MediumFast,
    MediumSlow,
    LongFast,
    LongModerate,
    LongSlow,
    VeryLongSlow,
}

impl ModemPreset {
    /// Sub-GHz bandwidth, spreading factor and coding rate of the preset
    pub fn params(self) -> (Bandwidth, SpreadingFactor, CodingRate) {
        use ModemPreset::*;
        match self {
            ShortTurbo => (Bandwidth::BW500, SpreadingFactor::SF7, CodingRate::CR4_5),
            ShortFast => (Bandwidth::BW250, SpreadingFactor::SF7, CodingRate::CR4_5),
            ShortSlow => (Bandwidth::BW250, SpreadingFactor::SF8, CodingRate::CR4_5),
            MediumFast => (Bandwidth::BW250, SpreadingFactor::SF9, CodingRate::CR4_5),
            MediumSlow => (Bandwidth::BW250, SpreadingFactor::SF10, CodingRate::CR4_5),
            LongFast => (Bandwidth::BW250, SpreadingFactor::SF11, CodingRate::CR4_5),
            LongModerate => (Bandwidth::BW125, SpreadingFactor::SF11, CodingRate::CR4_8),
            LongSlow => (Bandwidth::BW125, SpreadingFactor::SF12, CodingRate::CR4_8),
            VeryLongSlow => (Bandwidth::BW62_5, SpreadingFactor::SF12, CodingRate::CR4_8),
        }
    }
}

/// Full radio provisioning
///
/// # Examples
///
/// ```rust
/// use lr11x0_radio::{LoRaConfig, ModemPreset};
///
/// let config = LoRaConfig::from_preset(ModemPreset::LongFast, 869_525_000);
/// assert!(config.validate().is_ok());
///
/// let json = r#"{ "frequency_hz": 915000000, "tx_power_dbm": 20 }"#;
/// let config = LoRaConfig::from_json(json).unwrap();
/// assert_eq!(config.tx_power_dbm, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoRaConfig {
    /// Carrier frequency in Hz
    pub frequency_hz: u32,
    pub bandwidth: Bandwidth,
    pub spreading_factor: SpreadingFactor,
    pub coding_rate: CodingRate,
    pub sync_word: u8,
    /// Requested output power; clamped to the chip's limit when applied
    pub tx_power_dbm: i8,
    /// Preamble length in symbols
    pub preamble_length: u16,
    /// TCXO supply voltage; `None` for boards with a plain crystal
    pub tcxo_voltage_mv: Option<u16>,
    pub rx_boosted_gain: bool,
    pub crc_enabled: bool,
    /// Use the DC-DC converter instead of the LDO
    pub use_dcdc: bool,
    /// Keep the chip configuration across sleep (warm start)
    pub sleep_retain_config: bool,
}

impl Default for LoRaConfig {
    fn default() -> Self {
        Self::from_preset(ModemPreset::LongFast, 869_525_000)
    }
}

impl LoRaConfig {
    /// Build a configuration from a modem preset
    ///
    /// In the 2.4 GHz band the preset's bandwidth is widened and the preamble
    /// shortened.
    pub fn from_preset(preset: ModemPreset, frequency_hz: u32) -> Self {
        let (bandwidth, spreading_factor, coding_rate) = preset.params();
        let band_2g4 = is_2g4_frequency(frequency_hz);
        Self {
            frequency_hz,
            bandwidth: if band_2g4 { bandwidth.widened() } else { bandwidth },
            spreading_factor,
            coding_rate,
            sync_word: DEFAULT_SYNC_WORD,
            tx_power_dbm: LR11X0_MAX_POWER_DBM,
            preamble_length: if band_2g4 {
                PREAMBLE_LENGTH_2G4
            } else {
                DEFAULT_PREAMBLE_LENGTH
            },
            tcxo_voltage_mv: Some(DEFAULT_TCXO_VOLTAGE_MV),
            rx_boosted_gain: true,
            crc_enabled: true,
            use_dcdc: true,
            sleep_retain_config: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_2g4(&self) -> bool {
        is_2g4_frequency(self.frequency_hz)
    }

    /// Check ranges that hold for every LR11x0 part
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sub_ghz = (SUB_GHZ_MIN_HZ..=SUB_GHZ_MAX_HZ).contains(&self.frequency_hz);
        if !sub_ghz && !self.is_2g4() {
            return Err(ConfigError::FrequencyOutOfRange(self.frequency_hz));
        }
        if self.bandwidth.is_wide() && !self.is_2g4() {
            return Err(ConfigError::BandwidthNotAvailable(self.bandwidth));
        }
        if self.preamble_length < MIN_PREAMBLE_LENGTH {
            return Err(ConfigError::PreambleTooShort(self.preamble_length));
        }
        if let Some(mv) = self.tcxo_voltage_mv {
            if !(TCXO_MIN_MV..=TCXO_MAX_MV).contains(&mv) {
                return Err(ConfigError::TcxoVoltage(mv));
            }
        }
        if self.tx_power_dbm < LR11X0_MIN_POWER_DBM {
            return Err(ConfigError::PowerTooLow(self.tx_power_dbm));
        }
        Ok(())
    }

    /// [`validate`](Self::validate) plus the capabilities of a specific part
    pub fn validate_for<V: Variant>(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.is_2g4() && !V::HAS_2G4 {
            return Err(ConfigError::BandNotSupported { variant: V::NAME });
        }
        Ok(())
    }

    /// Airtime calculator for these settings
    pub fn time_on_air(&self) -> TimeOnAir {
        TimeOnAir {
            spreading_factor: self.spreading_factor,
            bandwidth: self.bandwidth,
            coding_rate: self.coding_rate,
            preamble_symbols: self.preamble_length,
            crc_enabled: self.crc_enabled,
        }
    }
}

fn is_2g4_frequency(frequency_hz: u32) -> bool {
    (BAND_2G4_MIN_HZ..=BAND_2G4_MAX_HZ).contains(&frequency_hz)
}
