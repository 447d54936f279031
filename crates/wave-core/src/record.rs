use crate::error::{Result, WaveError};
use crate::WaveHeader;

/// A decoded container: one header and the payload it describes.
///
/// Records only come out of [`crate::reader::decode`], so a fresh record
/// always holds exactly `subchunk2Size` payload bytes. The mutators below
/// leave the header's size fields alone; use [`WaveRecord::sync_sizes`] or
/// [`crate::SizePolicy::Recompute`] when the payload length changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveRecord {
    header: WaveHeader,
    payload: Vec<u8>,
}

impl WaveRecord {
    pub(crate) fn from_parts(header: WaveHeader, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    pub fn header(&self) -> &WaveHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut WaveHeader {
        &mut self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Vec<u8> {
        &mut self.payload
    }

    /// Swaps in a new payload and returns the old one. The header is untouched.
    pub fn replace_payload(&mut self, payload: Vec<u8>) -> Vec<u8> {
        std::mem::replace(&mut self.payload, payload)
    }

    /// True when `subchunk2Size` matches the payload length.
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.header.data_len()).map_or(false, |n| n == self.payload.len())
    }

    /// Header as it would be written for the current payload length.
    pub fn synced_header(&self) -> Result<WaveHeader> {
        let len = u32::try_from(self.payload.len())
            .map_err(|_| WaveError::PayloadTooLarge { len: self.payload.len() })?;
        let mut header = self.header;
        header.set_data_len(len);
        Ok(header)
    }

    /// Rewrites `chunkSize` and `subchunk2Size` from the payload length.
    pub fn sync_sizes(&mut self) -> Result<()> {
        self.header = self.synced_header()?;
        Ok(())
    }
}
