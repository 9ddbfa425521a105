use std::fmt;
use std::str::FromStr;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Byte order applied to every multi-byte numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    pub(crate) fn u16(self, bytes: &[u8]) -> u16 {
        match self {
            Endian::Big => BigEndian::read_u16(bytes),
            Endian::Little => LittleEndian::read_u16(bytes),
        }
    }

    pub(crate) fn u32(self, bytes: &[u8]) -> u32 {
        match self {
            Endian::Big => BigEndian::read_u32(bytes),
            Endian::Little => LittleEndian::read_u32(bytes),
        }
    }

    pub(crate) fn f32(self, bytes: &[u8]) -> f32 {
        match self {
            Endian::Big => BigEndian::read_f32(bytes),
            Endian::Little => LittleEndian::read_f32(bytes),
        }
    }

    pub(crate) fn f64(self, bytes: &[u8]) -> f64 {
        match self {
            Endian::Big => BigEndian::read_f64(bytes),
            Endian::Little => LittleEndian::read_f64(bytes),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Endian::Big => "big",
            Endian::Little => "little",
        }
    }
}

/// How fixed-width text fields are turned into strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringPolicy {
    /// Keep every byte of the field, trailing zero padding included.
    Raw,
    /// Drop trailing zero bytes; an all-zero field becomes empty.
    Trimmed,
}

impl StringPolicy {
    /// Convert a fixed-width text field according to the policy.
    ///
    /// # Examples
    /// ```
    /// use petdata_core::StringPolicy;
    ///
    /// let field = *b"ABC\0\0\0\0\0";
    /// assert_eq!(StringPolicy::Trimmed.apply(&field), "ABC");
    /// assert_eq!(StringPolicy::Raw.apply(&field).len(), 8);
    /// ```
    pub fn apply(self, bytes: &[u8]) -> String {
        let kept = match self {
            StringPolicy::Raw => bytes,
            StringPolicy::Trimmed => {
                let end = bytes
                    .iter()
                    .rposition(|b| *b != 0)
                    .map_or(0, |last| last + 1);
                &bytes[..end]
            }
        };
        String::from_utf8_lossy(kept).into_owned()
    }

    fn as_str(self) -> &'static str {
        match self {
            StringPolicy::Raw => "raw",
            StringPolicy::Trimmed => "trimmed",
        }
    }
}

/// Byte order and string policy bound to a reader for one decode.
///
/// Scanner files come in two flavours, [`FormatProfile::LITTLE_RAW`] and
/// [`FormatProfile::BIG_TRIMMED`]. Section and payload decoders never look at
/// the profile directly; only the field reader does.
///
/// # Examples
/// ```
/// use petdata_core::{Endian, FormatProfile, StringPolicy};
///
/// let profile: FormatProfile = "big-trimmed".parse().unwrap();
/// assert_eq!(profile, FormatProfile::BIG_TRIMMED);
/// assert_eq!(profile.endian, Endian::Big);
/// assert_eq!(profile.strings, StringPolicy::Trimmed);
/// assert_eq!(profile.to_string(), "big-trimmed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatProfile {
    pub endian: Endian,
    pub strings: StringPolicy,
}

impl FormatProfile {
    pub const LITTLE_RAW: FormatProfile = FormatProfile::new(Endian::Little, StringPolicy::Raw);
    pub const BIG_TRIMMED: FormatProfile = FormatProfile::new(Endian::Big, StringPolicy::Trimmed);

    pub const fn new(endian: Endian, strings: StringPolicy) -> Self {
        Self { endian, strings }
    }
}

impl fmt::Display for FormatProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.endian.as_str(), self.strings.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid format profile '{input}': expected <big|little>-<raw|trimmed>")]
pub struct ProfileParseError {
    pub input: String,
}

impl FromStr for FormatProfile {
    type Err = ProfileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProfileParseError {
            input: s.to_string(),
        };
        let normalized = s.trim().to_ascii_lowercase();
        let (endian, strings) = normalized.split_once('-').ok_or_else(invalid)?;
        let endian = match endian {
            "big" => Endian::Big,
            "little" => Endian::Little,
            _ => return Err(invalid()),
        };
        let strings = match strings {
            "raw" => StringPolicy::Raw,
            "trimmed" => StringPolicy::Trimmed,
            _ => return Err(invalid()),
        };
        Ok(FormatProfile::new(endian, strings))
    }
}
