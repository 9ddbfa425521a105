//! petdata core library for decoding PET/CT scanner data files.
//!
//! A data file is a fixed, positional sequence of header sections followed
//! by at most one payload. The `PublicInfo` type code, read first, decides
//! which sections are present and which payload follows:
//!
//! - raw detector blocks, list-mode events or Michelogram bins, each after
//!   acquisition and data headers;
//! - calibration maps and energy spectra, data header only;
//! - anything else is an image file with acquisition, image and data headers.
//!
//! Decoding is a single forward pass over any [`std::io::Read`]. Byte order
//! and string trimming come from a [`FormatProfile`]; the numeric type codes
//! and the interface-position prefix come from a [`DecoderConfig`]. Header
//! fields are mandatory; payload records are read until the source runs out
//! and a trailing incomplete record is dropped.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use petdata_core::{DecoderConfig, FormatProfile, decode_file};
//!
//! let config = DecoderConfig::load(Path::new("petdata.toml"))?;
//! let dataset = decode_file(Path::new("scan.dat"), FormatProfile::LITTLE_RAW, &config)?;
//! println!("{} records", dataset.payload.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

mod config;
pub mod format;
mod source;

pub use config::{ConfigError, DecoderConfig, TypeCodes};
pub use format::{
    ChannelWord, DecodeError, Decoder, Endian, FieldReader, FormatProfile, ProfileParseError,
    StringPolicy, decode, format_ip_address,
};
pub use source::{SourceError, decode_file};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the caller does not provide one.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Payload category selected by the `PublicInfo` type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    RawData,
    ListmodeData,
    MichData,
    EnergyCalibrationMap,
    TimeCalibrationMap,
    EnergySpectrumData,
    /// Any code not in the configured table; decoded as an image file.
    Other(u16),
}

impl DataKind {
    pub fn has_acquisition_info(self) -> bool {
        matches!(
            self,
            DataKind::RawData | DataKind::ListmodeData | DataKind::MichData | DataKind::Other(_)
        )
    }

    pub fn has_image_info(self) -> bool {
        matches!(self, DataKind::Other(_))
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::RawData => write!(f, "raw data"),
            DataKind::ListmodeData => write!(f, "list-mode data"),
            DataKind::MichData => write!(f, "Michelogram data"),
            DataKind::EnergyCalibrationMap => write!(f, "energy calibration map"),
            DataKind::TimeCalibrationMap => write!(f, "time calibration map"),
            DataKind::EnergySpectrumData => write!(f, "energy spectrum"),
            DataKind::Other(code) => write!(f, "image data (type {code})"),
        }
    }
}

/// Fully decoded data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    /// Category the type code resolved to.
    pub kind: DataKind,
    pub public_info: PublicInfo,
    pub device_info: DeviceInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquisition_info: Option<AcquisitionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_info: Option<ImageInfo>,
    pub data_info: DataInfo,
    pub payload: Payload,
}

/// File-level header. The 16-byte magic prefix is not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicInfo {
    /// Header CRC as stored; never verified.
    pub header_crc: u16,
    pub length: u32,
    /// Type code, resolved through [`TypeCodes`].
    pub data_type: u16,
    pub software_version: String,
    pub header_length: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub length: u32,
    pub device: String,
    pub serial: String,
    pub axial_detectors: u16,
    pub transaxial_detectors: u16,
    pub detector_rings: u16,
    pub detector_channels: u16,
    pub ip_count: u16,
    pub ip_start: u16,
    pub channel_count: u16,
    pub channel_start: u16,
    /// Eight calibration thresholds.
    pub calibration_thresholds: Vec<f32>,
    /// Three calibration parameters.
    pub calibration_parameters: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionInfo {
    pub length: u32,
    pub isotope: u16,
    pub activity: f32,
    pub injection_time: String,
    pub acquisition_time: String,
    pub duration: u16,
    pub time_window: f32,
    pub delay_window: f32,
    pub crosstalk_window: f32,
    pub energy_window: [u32; 2],
    pub position_window: u16,
    pub corrected: u16,
    pub table_position: f32,
    pub table_height: f32,
    pub pet_ct_spacing: f32,
    pub table_count: u16,
    pub table_index: u16,
    pub scan_length_per_table: f32,
    pub patient_id: String,
    pub study_id: String,
    pub patient_name: String,
    pub patient_sex: String,
    pub patient_height: f32,
    pub patient_weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub length: u32,
    pub rows: u16,
    pub columns: u16,
    pub slices: u16,
    pub row_pixel_size: f32,
    pub column_pixel_size: f32,
    pub slice_thickness: f32,
    pub recon_method: String,
    pub max_ring_difference: u16,
    pub subsets: u16,
    pub iterations: u16,
    pub attenuation_calibration: u16,
    pub scatter_calibration: u16,
    pub scatter_parameters: Vec<f32>,
    pub tv_parameters: Vec<f32>,
    pub pet_ct_fov_offset: Vec<f32>,
    pub ct_rotation_angle: f32,
    pub series_number: u16,
    pub recon_software_version: String,
    pub prompt_counts: u32,
    pub delay_counts: u32,
}

/// Payload header. Neither length is checked against the payload read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataInfo {
    pub length: u32,
    pub data_length: u32,
    /// Payload CRC as stored; never verified.
    pub crc: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataItem {
    /// One 1152-byte detector block.
    pub data: Vec<u8>,
    /// Interface position, rendered with the configured prefix.
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListmodeDataItem {
    pub ip: String,
    pub crosstalk: bool,
    pub reserved: u8,
    pub channel: u16,
    pub energy: f32,
    pub time: f64,
}

/// The single payload a data file carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum Payload {
    /// Calibration maps, spectra and image files carry no records.
    None,
    Raw(Vec<RawDataItem>),
    Listmode(Vec<ListmodeDataItem>),
    Mich(Vec<u16>),
}

impl Payload {
    /// Number of decoded records (Michelogram bins count one each).
    pub fn len(&self) -> usize {
        match self {
            Payload::None => 0,
            Payload::Raw(items) => items.len(),
            Payload::Listmode(items) => items.len(),
            Payload::Mich(bins) => bins.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compact description of a [`DataSet`].
///
/// # Examples
/// ```
/// use petdata_core::{DataKind, DataSetSummary};
///
/// let summary = DataSetSummary {
///     kind: DataKind::MichData,
///     data_type: 3,
///     software_version: "1.0".to_string(),
///     device: "scanner".to_string(),
///     serial: "0001".to_string(),
///     has_acquisition_info: true,
///     has_image_info: false,
///     data_length: 4,
///     records: 2,
/// };
/// assert_eq!(summary.records, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSetSummary {
    pub kind: DataKind,
    pub data_type: u16,
    pub software_version: String,
    pub device: String,
    pub serial: String,
    pub has_acquisition_info: bool,
    pub has_image_info: bool,
    /// Payload length declared in `DataInfo`.
    pub data_length: u32,
    /// Records actually decoded.
    pub records: usize,
}

impl DataSet {
    pub fn summary(&self) -> DataSetSummary {
        DataSetSummary {
            kind: self.kind,
            data_type: self.public_info.data_type,
            software_version: printable(&self.public_info.software_version),
            device: printable(&self.device_info.device),
            serial: printable(&self.device_info.serial),
            has_acquisition_info: self.acquisition_info.is_some(),
            has_image_info: self.image_info.is_some(),
            data_length: self.data_info.data_length,
            records: self.payload.len(),
        }
    }
}

// Raw-profile text keeps zero padding, which is noise in a summary.
fn printable(text: &str) -> String {
    text.trim_end_matches('\0').to_string()
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "petdata").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input file metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// JSON envelope around a decoded data set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    pub input: InputInfo,
    /// Profile the file was decoded with.
    pub profile: FormatProfile,
    pub summary: DataSetSummary,
    pub dataset: DataSet,
}

/// Wrap a decoded data set in a report with base fields filled.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
///
/// use petdata_core::{DecoderConfig, FormatProfile, decode_file, make_report};
///
/// let config = DecoderConfig::load(Path::new("petdata.toml"))?;
/// let dataset = decode_file(Path::new("scan.dat"), FormatProfile::LITTLE_RAW, &config)?;
/// let report = make_report("scan.dat", 1024, FormatProfile::LITTLE_RAW, dataset);
/// assert_eq!(report.report_version, petdata_core::REPORT_VERSION);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn make_report(
    input_path: &str,
    input_bytes: u64,
    profile: FormatProfile,
    dataset: DataSet,
) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "petdata".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        profile,
        summary: dataset.summary(),
        dataset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibration_dataset() -> DataSet {
        DataSet {
            kind: DataKind::EnergyCalibrationMap,
            public_info: PublicInfo {
                header_crc: 1,
                length: 2,
                data_type: 4,
                software_version: "v1\0\0".to_string(),
                header_length: 3,
            },
            device_info: DeviceInfo {
                length: 96,
                device: "PET\0".to_string(),
                serial: "SN1".to_string(),
                axial_detectors: 1,
                transaxial_detectors: 2,
                detector_rings: 3,
                detector_channels: 4,
                ip_count: 5,
                ip_start: 6,
                channel_count: 7,
                channel_start: 8,
                calibration_thresholds: vec![0.0; 8],
                calibration_parameters: vec![0.0; 3],
            },
            acquisition_info: None,
            image_info: None,
            data_info: DataInfo {
                length: 10,
                data_length: 0,
                crc: 0,
            },
            payload: Payload::None,
        }
    }

    #[test]
    fn report_omits_absent_sections() {
        let report = make_report(
            "scan.dat",
            1,
            FormatProfile::LITTLE_RAW,
            calibration_dataset(),
        );
        let value = serde_json::to_value(&report).expect("report json");
        let dataset = &value["dataset"];
        assert!(dataset.get("acquisition_info").is_none());
        assert!(dataset.get("image_info").is_none());
        assert_eq!(dataset["kind"], "energy_calibration_map");
        assert_eq!(dataset["payload"]["kind"], "none");
        assert_eq!(value["profile"]["endian"], "little");
    }

    #[test]
    fn summary_strips_zero_padding() {
        let summary = calibration_dataset().summary();
        assert_eq!(summary.software_version, "v1");
        assert_eq!(summary.device, "PET");
        assert_eq!(summary.records, 0);
        assert!(!summary.has_acquisition_info);
    }

    #[test]
    fn payload_len_counts_records() {
        assert_eq!(Payload::Mich(vec![1, 2, 3]).len(), 3);
        assert!(Payload::None.is_empty());
        assert!(Payload::Raw(Vec::new()).is_empty());
    }

    #[test]
    fn kind_section_presence() {
        assert!(DataKind::RawData.has_acquisition_info());
        assert!(!DataKind::RawData.has_image_info());
        assert!(!DataKind::EnergySpectrumData.has_acquisition_info());
        assert!(DataKind::Other(42).has_image_info());
        assert_eq!(DataKind::Other(42).to_string(), "image data (type 42)");
    }
}
