pub const MAGIC_LEN: usize = 16;

pub const U16_LEN: usize = 2;
pub const U32_LEN: usize = 4;
pub const F32_LEN: usize = 4;
pub const F64_LEN: usize = 8;

pub const VERSION_TEXT_LEN: usize = 16;
pub const DEVICE_TEXT_LEN: usize = 16;
pub const TIMESTAMP_TEXT_LEN: usize = 16;
pub const RECON_TEXT_LEN: usize = 16;
pub const PATIENT_ID_LEN: usize = 64;
pub const STUDY_ID_LEN: usize = 64;
pub const PATIENT_NAME_LEN: usize = 128;
pub const PATIENT_SEX_LEN: usize = 8;

pub const CALIBRATION_THRESHOLDS: usize = 8;
pub const CALIBRATION_PARAMETERS: usize = 3;
pub const SCATTER_PARAMETERS: usize = 6;
pub const TV_PARAMETERS: usize = 2;
pub const FOV_OFFSET_AXES: usize = 3;

/// Bytes after the magic prefix.
pub const PUBLIC_INFO_LEN: usize = 28;
pub const DEVICE_INFO_LEN: usize = 96;
pub const ACQUISITION_INFO_LEN: usize = 360;
pub const IMAGE_INFO_LEN: usize = 122;
pub const DATA_INFO_LEN: usize = 10;

pub const RAW_BLOCK_LEN: usize = 1152;
pub const RAW_RECORD_LEN: usize = RAW_BLOCK_LEN + U16_LEN;
pub const LISTMODE_RECORD_LEN: usize = U16_LEN + U16_LEN + F32_LEN + F64_LEN;

pub const CROSSTALK_MASK: u16 = 0x8000;
pub const RESERVED_SHIFT: u16 = 12;
pub const RESERVED_MASK: u16 = 0x0007;
pub const CHANNEL_MASK: u16 = 0x0fff;
