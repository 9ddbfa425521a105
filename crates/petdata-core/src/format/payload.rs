use std::io::Read;

use log::debug;

use crate::{ListmodeDataItem, RawDataItem};

use super::error::DecodeError;
use super::layout;
use super::reader::FieldReader;

/// Render an interface-position address as `<prefix><high>.<low>`.
///
/// # Examples
/// ```
/// use petdata_core::format_ip_address;
///
/// assert_eq!(format_ip_address("192.168.", 0x0102), "192.168.1.2");
/// ```
pub fn format_ip_address(prefix: &str, value: u16) -> String {
    let [high, low] = value.to_be_bytes();
    format!("{prefix}{high}.{low}")
}

/// Packed list-mode channel word: cross-talk flag in bit 15, a 3-bit reserved
/// field in bits 14..12 and the channel number in bits 11..0.
///
/// # Examples
/// ```
/// use petdata_core::ChannelWord;
///
/// let word = ChannelWord::unpack(0x8fff);
/// assert!(word.crosstalk);
/// assert_eq!(word.reserved, 0);
/// assert_eq!(word.channel, 4095);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelWord {
    pub crosstalk: bool,
    pub reserved: u8,
    pub channel: u16,
}

impl ChannelWord {
    pub fn unpack(word: u16) -> Self {
        Self {
            crosstalk: word & layout::CROSSTALK_MASK != 0,
            reserved: ((word >> layout::RESERVED_SHIFT) & layout::RESERVED_MASK) as u8,
            channel: word & layout::CHANNEL_MASK,
        }
    }
}

/// Read raw detector records until the source runs out.
///
/// Each record is probed whole, so any tail shorter than one record is
/// dropped rather than reported.
pub fn read_raw_data<R: Read>(
    reader: &mut FieldReader<R>,
    ip_prefix: &str,
) -> Result<Vec<RawDataItem>, DecodeError> {
    let endian = reader.profile().endian;
    let mut items = Vec::new();
    while let Some(mut record) = reader.probe_bytes("raw_data.record", layout::RAW_RECORD_LEN)? {
        let ip = endian.u16(&record[layout::RAW_BLOCK_LEN..]);
        record.truncate(layout::RAW_BLOCK_LEN);
        items.push(RawDataItem {
            data: record,
            ip: format_ip_address(ip_prefix, ip),
        });
    }
    debug!("raw data decoded: {} records", items.len());
    Ok(items)
}

/// Read list-mode events until the source runs out.
///
/// Only the leading address is probed; once it is read the rest of the event
/// is mandatory.
pub fn read_listmode_data<R: Read>(
    reader: &mut FieldReader<R>,
    ip_prefix: &str,
) -> Result<Vec<ListmodeDataItem>, DecodeError> {
    let mut items = Vec::new();
    while let Some(ip) = reader.probe_u16("listmode_data.ip")? {
        let word = ChannelWord::unpack(reader.read_u16("listmode_data.channel")?);
        items.push(ListmodeDataItem {
            ip: format_ip_address(ip_prefix, ip),
            crosstalk: word.crosstalk,
            reserved: word.reserved,
            channel: word.channel,
            energy: reader.read_f32("listmode_data.energy")?,
            time: reader.read_f64("listmode_data.time")?,
        });
    }
    debug!("list-mode data decoded: {} events", items.len());
    Ok(items)
}

/// Read Michelogram bins until the source runs out.
pub fn read_mich_data<R: Read>(reader: &mut FieldReader<R>) -> Result<Vec<u16>, DecodeError> {
    let mut bins = Vec::new();
    while let Some(bin) = reader.probe_u16("mich_data.bin")? {
        bins.push(bin);
    }
    debug!("Michelogram data decoded: {} bins", bins.len());
    Ok(bins)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{ChannelWord, format_ip_address, read_listmode_data, read_mich_data, read_raw_data};
    use crate::format::error::DecodeError;
    use crate::format::layout;
    use crate::format::profile::FormatProfile;
    use crate::format::reader::FieldReader;

    fn reader(bytes: Vec<u8>, profile: FormatProfile) -> FieldReader<Cursor<Vec<u8>>> {
        FieldReader::new(Cursor::new(bytes), profile)
    }

    fn listmode_event(ip: u16, word: u16, energy: f32, time: f64) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(layout::LISTMODE_RECORD_LEN);
        bytes.extend_from_slice(&ip.to_le_bytes());
        bytes.extend_from_slice(&word.to_le_bytes());
        bytes.extend_from_slice(&energy.to_le_bytes());
        bytes.extend_from_slice(&time.to_le_bytes());
        bytes
    }

    #[test]
    fn ip_address_renders_high_then_low() {
        assert_eq!(format_ip_address("ip:", 0x0102), "ip:1.2");
        assert_eq!(format_ip_address("", 0xff00), "255.0");
        assert_eq!(format_ip_address("10.", 0x00ff), "10.0.255");
    }

    #[test]
    fn channel_word_unpacking() {
        assert_eq!(
            ChannelWord::unpack(0x8fff),
            ChannelWord {
                crosstalk: true,
                reserved: 0,
                channel: 4095,
            }
        );
        assert_eq!(
            ChannelWord::unpack(0x1000),
            ChannelWord {
                crosstalk: false,
                reserved: 1,
                channel: 0,
            }
        );
        assert_eq!(ChannelWord::unpack(0x7abc).reserved, 7);
        assert_eq!(ChannelWord::unpack(0x7abc).channel, 0x0abc);
    }

    #[test]
    fn raw_records_keep_order_and_drop_tail() {
        let mut bytes = Vec::new();
        for i in 0..3u8 {
            bytes.extend(std::iter::repeat_n(i, layout::RAW_BLOCK_LEN));
            bytes.extend_from_slice(&u16::from_be_bytes([i, i + 1]).to_be_bytes());
        }
        bytes.extend(std::iter::repeat_n(9, layout::RAW_BLOCK_LEN + 1));

        let mut r = reader(bytes, FormatProfile::BIG_TRIMMED);
        let items = read_raw_data(&mut r, "").unwrap();
        assert_eq!(items.len(), 3);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.data.len(), layout::RAW_BLOCK_LEN);
            assert!(item.data.iter().all(|b| *b as usize == i));
            assert_eq!(item.ip, format!("{}.{}", i, i + 1));
        }
    }

    #[test]
    fn listmode_events_decode() {
        let mut bytes = listmode_event(0x0102, 0x8fff, 511.0, 1.5e-3);
        bytes.extend(listmode_event(0x0a0b, 0x1000, 480.25, 2.0));

        let mut r = reader(bytes, FormatProfile::LITTLE_RAW);
        let items = read_listmode_data(&mut r, "p/").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].ip, "p/1.2");
        assert!(items[0].crosstalk);
        assert_eq!(items[0].channel, 4095);
        assert_eq!(items[0].energy, 511.0);
        assert_eq!(items[0].time, 1.5e-3);
        assert_eq!(items[1].ip, "p/10.11");
        assert!(!items[1].crosstalk);
        assert_eq!(items[1].reserved, 1);
        assert_eq!(items[1].time, 2.0);
    }

    #[test]
    fn listmode_started_event_must_complete() {
        let mut bytes = listmode_event(1, 2, 3.0, 4.0);
        bytes.truncate(layout::LISTMODE_RECORD_LEN - 1);

        let mut r = reader(bytes, FormatProfile::LITTLE_RAW);
        let err = read_listmode_data(&mut r, "").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ShortRead {
                field: "listmode_data.time",
                ..
            }
        ));
    }

    #[test]
    fn listmode_single_trailing_byte_is_dropped() {
        let mut bytes = listmode_event(1, 2, 3.0, 4.0);
        bytes.push(0xff);

        let mut r = reader(bytes, FormatProfile::LITTLE_RAW);
        assert_eq!(read_listmode_data(&mut r, "").unwrap().len(), 1);
    }

    #[test]
    fn mich_bins_flat_sequence() {
        let bytes = vec![0x00, 0x01, 0x00, 0x02, 0xff, 0xff, 0x07];
        let mut r = reader(bytes, FormatProfile::BIG_TRIMMED);
        assert_eq!(read_mich_data(&mut r).unwrap(), vec![1, 2, 0xffff]);
    }

    #[test]
    fn empty_payloads_are_not_errors() {
        let mut r = reader(Vec::new(), FormatProfile::LITTLE_RAW);
        assert!(read_raw_data(&mut r, "").unwrap().is_empty());
        assert!(read_listmode_data(&mut r, "").unwrap().is_empty());
        assert!(read_mich_data(&mut r).unwrap().is_empty());
    }
}
