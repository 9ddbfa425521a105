#![allow(dead_code)]

use petdata_core::format::layout;
use petdata_core::{DecoderConfig, Endian, FormatProfile, TypeCodes};

pub const RAW: u16 = 0x0101;
pub const LISTMODE: u16 = 0x0102;
pub const MICH: u16 = 0x0103;
pub const ENERGY_MAP: u16 = 0x0201;
pub const TIME_MAP: u16 = 0x0202;
pub const SPECTRUM: u16 = 0x0203;
pub const IMAGE: u16 = 0x0300;

pub const PREFIX: &str = "192.168.";

pub fn config() -> DecoderConfig {
    DecoderConfig::new(
        PREFIX,
        TypeCodes {
            raw_data: RAW,
            listmode_data: LISTMODE,
            mich_data: MICH,
            energy_calibration_map: ENERGY_MAP,
            time_calibration_map: TIME_MAP,
            energy_spectrum_data: SPECTRUM,
        },
    )
    .expect("valid config")
}

/// Writes data files field by field in the byte order of a profile.
pub struct FileBuilder {
    endian: Endian,
    bytes: Vec<u8>,
}

impl FileBuilder {
    pub fn new(profile: FormatProfile) -> Self {
        Self {
            endian: profile.endian,
            bytes: Vec::new(),
        }
    }

    /// Public, device and the type-specific header sections.
    pub fn headers(profile: FormatProfile, type_code: u16) -> Self {
        let mut builder = Self::new(profile);
        builder.public_info(type_code).device_info();
        match type_code {
            RAW | LISTMODE | MICH => {
                builder.acquisition_info().data_info(0);
            }
            ENERGY_MAP | TIME_MAP | SPECTRUM => {
                builder.data_info(0);
            }
            _ => {
                builder.acquisition_info().image_info().data_info(0);
            }
        }
        builder
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        let bytes = match self.endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        self.bytes.extend_from_slice(&bytes);
        self
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        let bytes = match self.endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        self.bytes.extend_from_slice(&bytes);
        self
    }

    pub fn f32(&mut self, value: f32) -> &mut Self {
        let bytes = match self.endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        self.bytes.extend_from_slice(&bytes);
        self
    }

    pub fn f64(&mut self, value: f64) -> &mut Self {
        let bytes = match self.endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        self.bytes.extend_from_slice(&bytes);
        self
    }

    pub fn text(&mut self, value: &str, len: usize) -> &mut Self {
        let mut field = value.as_bytes().to_vec();
        field.resize(len, 0);
        self.bytes.extend_from_slice(&field);
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn public_info(&mut self, type_code: u16) -> &mut Self {
        self.text("PETCT-DATA", layout::MAGIC_LEN)
            .u16(0xbeef)
            .u32(layout::PUBLIC_INFO_LEN as u32)
            .u16(type_code)
            .text("3.2.1", layout::VERSION_TEXT_LEN)
            .u32(1024)
    }

    pub fn device_info(&mut self) -> &mut Self {
        self.u32(layout::DEVICE_INFO_LEN as u32)
            .text("uPET-900", layout::DEVICE_TEXT_LEN)
            .text("SN-0042", layout::DEVICE_TEXT_LEN)
            .u16(48)
            .u16(640)
            .u16(112)
            .u16(144)
            .u16(28)
            .u16(1)
            .u16(4096)
            .u16(0);
        for i in 0..layout::CALIBRATION_THRESHOLDS {
            self.f32(50.0 * (i + 1) as f32);
        }
        self.f32(0.25).f32(1.5).f32(-3.0)
    }

    pub fn acquisition_info(&mut self) -> &mut Self {
        self.u32(layout::ACQUISITION_INFO_LEN as u32)
            .u16(18)
            .f32(370.0)
            .text("20240312T081500", layout::TIMESTAMP_TEXT_LEN)
            .text("20240312T091500", layout::TIMESTAMP_TEXT_LEN)
            .u16(900)
            .f32(4.7)
            .f32(200.0)
            .f32(1.2)
            .u32(350)
            .u32(650)
            .u16(3)
            .u16(1)
            .f32(1200.5)
            .f32(85.0)
            .f32(1750.0)
            .u16(4)
            .u16(2)
            .f32(300.0)
            .text("PID-7781", layout::PATIENT_ID_LEN)
            .text("STUDY-19", layout::STUDY_ID_LEN)
            .text("DOE^JOHN", layout::PATIENT_NAME_LEN)
            .text("M", layout::PATIENT_SEX_LEN)
            .f32(178.0)
            .f32(82.5)
    }

    pub fn image_info(&mut self) -> &mut Self {
        self.u32(layout::IMAGE_INFO_LEN as u32)
            .u16(192)
            .u16(192)
            .u16(673)
            .f32(2.0)
            .f32(2.0)
            .f32(1.5)
            .text("OSEM", layout::RECON_TEXT_LEN)
            .u16(79)
            .u16(12)
            .u16(3)
            .u16(1)
            .u16(1);
        for value in [0.1, 0.2, 0.3, 0.4, 0.5, 0.6] {
            self.f32(value);
        }
        self.f32(0.01).f32(0.02).f32(1.0).f32(-2.0).f32(3.0);
        self.f32(90.0)
            .u16(5)
            .text("recon-1.4", layout::VERSION_TEXT_LEN)
            .u32(12_000_000)
            .u32(450_000)
    }

    pub fn data_info(&mut self, data_length: u32) -> &mut Self {
        self.u32(layout::DATA_INFO_LEN as u32)
            .u32(data_length)
            .u16(0x1234)
    }

    pub fn raw_record(&mut self, fill: u8, ip: u16) -> &mut Self {
        self.raw(&[fill; layout::RAW_BLOCK_LEN]).u16(ip)
    }

    pub fn listmode_record(&mut self, ip: u16, word: u16, energy: f32, time: f64) -> &mut Self {
        self.u16(ip).u16(word).f32(energy).f64(time)
    }
}
