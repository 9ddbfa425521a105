use std::io::Read;

use log::{debug, trace};

use crate::config::DecoderConfig;
use crate::{DataKind, DataSet, Payload};

use super::error::DecodeError;
use super::payload::{read_listmode_data, read_mich_data, read_raw_data};
use super::profile::FormatProfile;
use super::reader::FieldReader;
use super::sections::{
    read_acquisition_info, read_data_info, read_device_info, read_image_info, read_public_info,
};

/// Profile and external configuration bound together for repeated decodes.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use petdata_core::{DecodeError, Decoder, DecoderConfig, FormatProfile, TypeCodes};
///
/// let codes = TypeCodes {
///     raw_data: 1,
///     listmode_data: 2,
///     mich_data: 3,
///     energy_calibration_map: 4,
///     time_calibration_map: 5,
///     energy_spectrum_data: 6,
/// };
/// let config = DecoderConfig::new("10.0.", codes).unwrap();
/// let decoder = Decoder::new(FormatProfile::LITTLE_RAW, config);
///
/// let err = decoder.decode(Cursor::new(vec![0u8; 8])).unwrap_err();
/// assert!(matches!(err, DecodeError::ShortRead { field: "public_info.magic", .. }));
/// ```
#[derive(Debug, Clone)]
pub struct Decoder {
    profile: FormatProfile,
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(profile: FormatProfile, config: DecoderConfig) -> Self {
        Self { profile, config }
    }

    pub fn profile(&self) -> FormatProfile {
        self.profile
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn decode<R: Read>(&self, source: R) -> Result<DataSet, DecodeError> {
        decode(source, self.profile, &self.config)
    }
}

/// Decode one data file from `source` in a single forward pass.
///
/// The source is read until it is exhausted. Any header field that cannot be
/// read in full aborts the decode; no partial data set is returned.
pub fn decode<R: Read>(
    source: R,
    profile: FormatProfile,
    config: &DecoderConfig,
) -> Result<DataSet, DecodeError> {
    let mut reader = FieldReader::new(source, profile);

    let public_info = read_public_info(&mut reader)?;
    let device_info = read_device_info(&mut reader)?;
    let kind = config.type_codes().kind_of(public_info.data_type);
    trace!("type code {} dispatched as {kind}", public_info.data_type);

    let acquisition_info = if kind.has_acquisition_info() {
        Some(read_acquisition_info(&mut reader)?)
    } else {
        None
    };
    let image_info = if kind.has_image_info() {
        Some(read_image_info(&mut reader)?)
    } else {
        None
    };
    let data_info = read_data_info(&mut reader)?;

    let payload = match kind {
        DataKind::RawData => Payload::Raw(read_raw_data(&mut reader, config.ip_prefix())?),
        DataKind::ListmodeData => {
            Payload::Listmode(read_listmode_data(&mut reader, config.ip_prefix())?)
        }
        DataKind::MichData => Payload::Mich(read_mich_data(&mut reader)?),
        DataKind::EnergyCalibrationMap
        | DataKind::TimeCalibrationMap
        | DataKind::EnergySpectrumData
        | DataKind::Other(_) => Payload::None,
    };

    debug!(
        "decoded {kind} with {} records from {} bytes",
        payload.len(),
        reader.consumed()
    );

    Ok(DataSet {
        kind,
        public_info,
        device_info,
        acquisition_info,
        image_info,
        data_info,
        payload,
    })
}
