//! External values the decoder depends on but does not define.
//!
//! The numeric type codes carried in `PublicInfo` and the prefix used when
//! rendering interface-position addresses are owned by the scanner software.
//! They are supplied at runtime, usually from a TOML file:
//!
//! ```toml
//! ip_prefix = "10.0."
//!
//! [type_codes]
//! raw_data = 1
//! listmode_data = 2
//! mich_data = 3
//! energy_calibration_map = 4
//! time_calibration_map = 5
//! energy_spectrum_data = 6
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DataKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("type code {code} is assigned to both {first} and {second}")]
    DuplicateTypeCode {
        code: u16,
        first: &'static str,
        second: &'static str,
    },
}

/// Discriminator values for each payload category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeCodes {
    pub raw_data: u16,
    pub listmode_data: u16,
    pub mich_data: u16,
    pub energy_calibration_map: u16,
    pub time_calibration_map: u16,
    pub energy_spectrum_data: u16,
}

impl TypeCodes {
    /// Map a discriminator to its category; unlisted values fall through to
    /// [`DataKind::Other`].
    ///
    /// # Examples
    /// ```
    /// use petdata_core::{DataKind, TypeCodes};
    ///
    /// let codes = TypeCodes {
    ///     raw_data: 10,
    ///     listmode_data: 11,
    ///     mich_data: 12,
    ///     energy_calibration_map: 20,
    ///     time_calibration_map: 21,
    ///     energy_spectrum_data: 22,
    /// };
    /// assert_eq!(codes.kind_of(11), DataKind::ListmodeData);
    /// assert_eq!(codes.kind_of(99), DataKind::Other(99));
    /// ```
    pub fn kind_of(&self, code: u16) -> DataKind {
        self.entries()
            .into_iter()
            .find(|(value, _, _)| *value == code)
            .map_or(DataKind::Other(code), |(_, kind, _)| kind)
    }

    /// Reject tables where two categories share a code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self.entries();
        for (i, (code, _, first)) in entries.iter().enumerate() {
            if let Some((_, _, second)) = entries[i + 1..].iter().find(|(c, _, _)| c == code) {
                return Err(ConfigError::DuplicateTypeCode {
                    code: *code,
                    first: *first,
                    second: *second,
                });
            }
        }
        Ok(())
    }

    fn entries(&self) -> [(u16, DataKind, &'static str); 6] {
        [
            (self.raw_data, DataKind::RawData, "raw_data"),
            (self.listmode_data, DataKind::ListmodeData, "listmode_data"),
            (self.mich_data, DataKind::MichData, "mich_data"),
            (
                self.energy_calibration_map,
                DataKind::EnergyCalibrationMap,
                "energy_calibration_map",
            ),
            (
                self.time_calibration_map,
                DataKind::TimeCalibrationMap,
                "time_calibration_map",
            ),
            (
                self.energy_spectrum_data,
                DataKind::EnergySpectrumData,
                "energy_spectrum_data",
            ),
        ]
    }
}

/// Validated decoder settings.
///
/// Fields are only reachable through constructors that reject duplicate type
/// codes, including serde deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile")]
pub struct DecoderConfig {
    ip_prefix: String,
    type_codes: TypeCodes,
}

/// On-disk shape, before validation.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    ip_prefix: String,
    type_codes: TypeCodes,
}

impl TryFrom<ConfigFile> for DecoderConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        Self::new(file.ip_prefix, file.type_codes)
    }
}

impl DecoderConfig {
    pub fn new(ip_prefix: impl Into<String>, type_codes: TypeCodes) -> Result<Self, ConfigError> {
        type_codes.validate()?;
        Ok(Self {
            ip_prefix: ip_prefix.into(),
            type_codes,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        Self::try_from(file)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Prepended to the dotted `high.low` rendering of interface positions.
    pub fn ip_prefix(&self) -> &str {
        &self.ip_prefix
    }

    pub fn type_codes(&self) -> &TypeCodes {
        &self.type_codes
    }
}
