use std::io::{ErrorKind, Read};

use log::debug;

use super::error::DecodeError;
use super::layout;
use super::profile::FormatProfile;

/// Forward-only field reader bound to one byte source and one profile.
///
/// `read_*` methods are strict: running out of bytes is a
/// [`DecodeError::ShortRead`]. `probe_*` methods return `Ok(None)` when the
/// source is exhausted before the value is complete; any bytes of an
/// incomplete value are consumed and dropped.
pub struct FieldReader<R> {
    source: R,
    profile: FormatProfile,
    consumed: u64,
}

impl<R: Read> FieldReader<R> {
    pub fn new(source: R, profile: FormatProfile) -> Self {
        Self {
            source,
            profile,
            consumed: 0,
        }
    }

    pub fn profile(&self) -> FormatProfile {
        self.profile
    }

    /// Total bytes pulled from the source so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, DecodeError> {
        let bytes = self.take::<{ layout::U16_LEN }>(field)?;
        Ok(self.profile.endian.u16(&bytes))
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.take::<{ layout::U32_LEN }>(field)?;
        Ok(self.profile.endian.u32(&bytes))
    }

    pub fn read_f32(&mut self, field: &'static str) -> Result<f32, DecodeError> {
        let bytes = self.take::<{ layout::F32_LEN }>(field)?;
        Ok(self.profile.endian.f32(&bytes))
    }

    pub fn read_f64(&mut self, field: &'static str) -> Result<f64, DecodeError> {
        let bytes = self.take::<{ layout::F64_LEN }>(field)?;
        Ok(self.profile.endian.f64(&bytes))
    }

    pub fn read_text(&mut self, field: &'static str, len: usize) -> Result<String, DecodeError> {
        let bytes = self.read_bytes(field, len)?;
        Ok(self.profile.strings.apply(&bytes))
    }

    pub fn read_f32_array(
        &mut self,
        field: &'static str,
        len: usize,
    ) -> Result<Vec<f32>, DecodeError> {
        let bytes = self.read_bytes(field, len * layout::F32_LEN)?;
        Ok(self.f32_values(&bytes))
    }

    pub fn read_bytes(&mut self, field: &'static str, len: usize) -> Result<Vec<u8>, DecodeError> {
        let mut buf = vec![0u8; len];
        self.require(field, &mut buf)?;
        Ok(buf)
    }

    pub fn probe_u16(&mut self, field: &'static str) -> Result<Option<u16>, DecodeError> {
        let bytes = self.probe::<{ layout::U16_LEN }>(field)?;
        Ok(bytes.map(|b| self.profile.endian.u16(&b)))
    }

    pub fn probe_u32(&mut self, field: &'static str) -> Result<Option<u32>, DecodeError> {
        let bytes = self.probe::<{ layout::U32_LEN }>(field)?;
        Ok(bytes.map(|b| self.profile.endian.u32(&b)))
    }

    pub fn probe_f32(&mut self, field: &'static str) -> Result<Option<f32>, DecodeError> {
        let bytes = self.probe::<{ layout::F32_LEN }>(field)?;
        Ok(bytes.map(|b| self.profile.endian.f32(&b)))
    }

    pub fn probe_f64(&mut self, field: &'static str) -> Result<Option<f64>, DecodeError> {
        let bytes = self.probe::<{ layout::F64_LEN }>(field)?;
        Ok(bytes.map(|b| self.profile.endian.f64(&b)))
    }

    pub fn probe_text(
        &mut self,
        field: &'static str,
        len: usize,
    ) -> Result<Option<String>, DecodeError> {
        let bytes = self.probe_bytes(field, len)?;
        Ok(bytes.map(|b| self.profile.strings.apply(&b)))
    }

    pub fn probe_f32_array(
        &mut self,
        field: &'static str,
        len: usize,
    ) -> Result<Option<Vec<f32>>, DecodeError> {
        let bytes = self.probe_bytes(field, len * layout::F32_LEN)?;
        Ok(bytes.map(|b| self.f32_values(&b)))
    }

    pub fn probe_bytes(
        &mut self,
        field: &'static str,
        len: usize,
    ) -> Result<Option<Vec<u8>>, DecodeError> {
        let mut buf = vec![0u8; len];
        let filled = self.fill(field, &mut buf)?;
        if filled < len {
            self.drop_partial(field, filled);
            return Ok(None);
        }
        Ok(Some(buf))
    }

    fn take<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let mut buf = [0u8; N];
        self.require(field, &mut buf)?;
        Ok(buf)
    }

    fn probe<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<Option<[u8; N]>, DecodeError> {
        let mut buf = [0u8; N];
        let filled = self.fill(field, &mut buf)?;
        if filled < N {
            self.drop_partial(field, filled);
            return Ok(None);
        }
        Ok(Some(buf))
    }

    fn require(&mut self, field: &'static str, buf: &mut [u8]) -> Result<(), DecodeError> {
        let filled = self.fill(field, buf)?;
        if filled < buf.len() {
            return Err(DecodeError::ShortRead {
                field,
                needed: buf.len(),
                actual: filled,
            });
        }
        Ok(())
    }

    /// Read until `buf` is full or the source reports end of input.
    fn fill(&mut self, field: &'static str, buf: &mut [u8]) -> Result<usize, DecodeError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(DecodeError::Source { field, source }),
            }
        }
        self.consumed += filled as u64;
        Ok(filled)
    }

    fn drop_partial(&self, field: &'static str, filled: usize) {
        if filled > 0 {
            debug!("dropping {filled} trailing bytes at {field} (incomplete record)");
        }
    }

    fn f32_values(&self, bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(layout::F32_LEN)
            .map(|chunk| self.profile.endian.f32(chunk))
            .collect()
    }
}
