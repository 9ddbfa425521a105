use std::io::Read;

use log::debug;

use crate::{AcquisitionInfo, DataInfo, DeviceInfo, ImageInfo, PublicInfo};

use super::error::DecodeError;
use super::layout;
use super::reader::FieldReader;

pub fn read_public_info<R: Read>(reader: &mut FieldReader<R>) -> Result<PublicInfo, DecodeError> {
    reader.read_bytes("public_info.magic", layout::MAGIC_LEN)?;
    let info = PublicInfo {
        header_crc: reader.read_u16("public_info.header_crc")?,
        length: reader.read_u32("public_info.length")?,
        data_type: reader.read_u16("public_info.data_type")?,
        software_version: reader
            .read_text("public_info.software_version", layout::VERSION_TEXT_LEN)?,
        header_length: reader.read_u32("public_info.header_length")?,
    };
    debug!("public info decoded: type code {}", info.data_type);
    Ok(info)
}

pub fn read_device_info<R: Read>(reader: &mut FieldReader<R>) -> Result<DeviceInfo, DecodeError> {
    let info = DeviceInfo {
        length: reader.read_u32("device_info.length")?,
        device: reader.read_text("device_info.device", layout::DEVICE_TEXT_LEN)?,
        serial: reader.read_text("device_info.serial", layout::DEVICE_TEXT_LEN)?,
        axial_detectors: reader.read_u16("device_info.axial_detectors")?,
        transaxial_detectors: reader.read_u16("device_info.transaxial_detectors")?,
        detector_rings: reader.read_u16("device_info.detector_rings")?,
        detector_channels: reader.read_u16("device_info.detector_channels")?,
        ip_count: reader.read_u16("device_info.ip_count")?,
        ip_start: reader.read_u16("device_info.ip_start")?,
        channel_count: reader.read_u16("device_info.channel_count")?,
        channel_start: reader.read_u16("device_info.channel_start")?,
        calibration_thresholds: reader.read_f32_array(
            "device_info.calibration_thresholds",
            layout::CALIBRATION_THRESHOLDS,
        )?,
        calibration_parameters: reader.read_f32_array(
            "device_info.calibration_parameters",
            layout::CALIBRATION_PARAMETERS,
        )?,
    };
    debug!("device info decoded");
    Ok(info)
}

pub fn read_acquisition_info<R: Read>(
    reader: &mut FieldReader<R>,
) -> Result<AcquisitionInfo, DecodeError> {
    let info = AcquisitionInfo {
        length: reader.read_u32("acquisition_info.length")?,
        isotope: reader.read_u16("acquisition_info.isotope")?,
        activity: reader.read_f32("acquisition_info.activity")?,
        injection_time: reader
            .read_text("acquisition_info.injection_time", layout::TIMESTAMP_TEXT_LEN)?,
        acquisition_time: reader
            .read_text("acquisition_info.acquisition_time", layout::TIMESTAMP_TEXT_LEN)?,
        duration: reader.read_u16("acquisition_info.duration")?,
        time_window: reader.read_f32("acquisition_info.time_window")?,
        delay_window: reader.read_f32("acquisition_info.delay_window")?,
        crosstalk_window: reader.read_f32("acquisition_info.crosstalk_window")?,
        energy_window: [
            reader.read_u32("acquisition_info.energy_window")?,
            reader.read_u32("acquisition_info.energy_window")?,
        ],
        position_window: reader.read_u16("acquisition_info.position_window")?,
        corrected: reader.read_u16("acquisition_info.corrected")?,
        table_position: reader.read_f32("acquisition_info.table_position")?,
        table_height: reader.read_f32("acquisition_info.table_height")?,
        pet_ct_spacing: reader.read_f32("acquisition_info.pet_ct_spacing")?,
        table_count: reader.read_u16("acquisition_info.table_count")?,
        table_index: reader.read_u16("acquisition_info.table_index")?,
        scan_length_per_table: reader.read_f32("acquisition_info.scan_length_per_table")?,
        patient_id: reader.read_text("acquisition_info.patient_id", layout::PATIENT_ID_LEN)?,
        study_id: reader.read_text("acquisition_info.study_id", layout::STUDY_ID_LEN)?,
        patient_name: reader
            .read_text("acquisition_info.patient_name", layout::PATIENT_NAME_LEN)?,
        patient_sex: reader.read_text("acquisition_info.patient_sex", layout::PATIENT_SEX_LEN)?,
        patient_height: reader.read_f32("acquisition_info.patient_height")?,
        patient_weight: reader.read_f32("acquisition_info.patient_weight")?,
    };
    debug!("acquisition info decoded");
    Ok(info)
}

pub fn read_image_info<R: Read>(reader: &mut FieldReader<R>) -> Result<ImageInfo, DecodeError> {
    let info = ImageInfo {
        length: reader.read_u32("image_info.length")?,
        rows: reader.read_u16("image_info.rows")?,
        columns: reader.read_u16("image_info.columns")?,
        slices: reader.read_u16("image_info.slices")?,
        row_pixel_size: reader.read_f32("image_info.row_pixel_size")?,
        column_pixel_size: reader.read_f32("image_info.column_pixel_size")?,
        slice_thickness: reader.read_f32("image_info.slice_thickness")?,
        recon_method: reader.read_text("image_info.recon_method", layout::RECON_TEXT_LEN)?,
        max_ring_difference: reader.read_u16("image_info.max_ring_difference")?,
        subsets: reader.read_u16("image_info.subsets")?,
        iterations: reader.read_u16("image_info.iterations")?,
        attenuation_calibration: reader.read_u16("image_info.attenuation_calibration")?,
        scatter_calibration: reader.read_u16("image_info.scatter_calibration")?,
        scatter_parameters: reader
            .read_f32_array("image_info.scatter_parameters", layout::SCATTER_PARAMETERS)?,
        tv_parameters: reader.read_f32_array("image_info.tv_parameters", layout::TV_PARAMETERS)?,
        pet_ct_fov_offset: reader
            .read_f32_array("image_info.pet_ct_fov_offset", layout::FOV_OFFSET_AXES)?,
        ct_rotation_angle: reader.read_f32("image_info.ct_rotation_angle")?,
        series_number: reader.read_u16("image_info.series_number")?,
        recon_software_version: reader
            .read_text("image_info.recon_software_version", layout::VERSION_TEXT_LEN)?,
        prompt_counts: reader.read_u32("image_info.prompt_counts")?,
        delay_counts: reader.read_u32("image_info.delay_counts")?,
    };
    debug!("image info decoded");
    Ok(info)
}

pub fn read_data_info<R: Read>(reader: &mut FieldReader<R>) -> Result<DataInfo, DecodeError> {
    let info = DataInfo {
        length: reader.read_u32("data_info.length")?,
        data_length: reader.read_u32("data_info.data_length")?,
        crc: reader.read_u16("data_info.crc")?,
    };
    debug!("data info decoded: {} payload bytes declared", info.data_length);
    Ok(info)
}
