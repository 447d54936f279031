//! Codec for the canonical 44-byte RIFF/WAVE container.
//!
//! A [`WaveRecord`] is produced by [`reader::decode`] and written back with
//! [`writer::encode`]. Decode validates only the `RIFF`/`WAVE` markers and
//! assumes exactly one `fmt ` sub-chunk followed by one `data` sub-chunk.
//! Files with other chunk layouts can be walked with [`chunks::scan`].

use std::fmt;
use std::time::Duration;

use zerocopy::byteorder::{LittleEndian, U16, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

pub mod chunks;
pub mod error;
pub mod reader;
pub mod record;
pub mod writer;

pub use error::{Result, WaveError};
pub use record::WaveRecord;
pub use writer::SizePolicy;

/// Magic bytes 'RIFF' opening every container.
pub const RIFF_MAGIC: [u8; 4] = *b"RIFF";
/// Form type 'WAVE' at offset 8.
pub const WAVE_MAGIC: [u8; 4] = *b"WAVE";
/// Nominal id of the format sub-chunk.
pub const FMT_ID: [u8; 4] = *b"fmt ";
/// Nominal id of the sample data sub-chunk.
pub const DATA_ID: [u8; 4] = *b"data";

/// Encoded size of [`WaveHeader`].
pub const HEADER_LEN: usize = 44;

/// `audioFormat` tag for linear PCM.
pub const FORMAT_PCM: u16 = 1;

// chunkSize counts everything after its own field: the 36 header bytes past
// offset 8 plus the payload.
const RIFF_OVERHEAD: u32 = (HEADER_LEN - 8) as u32;

/// Fixed header of a canonical wave file.
///
/// Every multi-byte field is stored little-endian and the struct has
/// alignment 1, so its in-memory bytes are exactly the 44 bytes on disk.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, FromZeroes, AsBytes, Unaligned)]
pub struct WaveHeader {
    pub chunk_id: [u8; 4],
    pub chunk_size: U32<LittleEndian>,
    pub format: [u8; 4],
    pub subchunk1_id: [u8; 4],
    pub subchunk1_size: U32<LittleEndian>,
    pub audio_format: U16<LittleEndian>,
    pub num_channels: U16<LittleEndian>,
    pub sample_rate: U32<LittleEndian>,
    pub byte_rate: U32<LittleEndian>,
    pub block_align: U16<LittleEndian>,
    pub bits_per_sample: U16<LittleEndian>,
    pub subchunk2_id: [u8; 4],
    pub subchunk2_size: U32<LittleEndian>,
}

const _: () = assert!(std::mem::size_of::<WaveHeader>() == HEADER_LEN);

impl WaveHeader {
    /// Builds a canonical PCM header describing `data_len` bytes of samples.
    pub fn pcm(num_channels: u16, sample_rate: u32, bits_per_sample: u16, data_len: u32) -> Self {
        let block_align = num_channels.wrapping_mul(bits_per_sample.div_ceil(8));
        Self {
            chunk_id: RIFF_MAGIC,
            chunk_size: U32::new(RIFF_OVERHEAD.wrapping_add(data_len)),
            format: WAVE_MAGIC,
            subchunk1_id: FMT_ID,
            subchunk1_size: U32::new(16),
            audio_format: U16::new(FORMAT_PCM),
            num_channels: U16::new(num_channels),
            sample_rate: U32::new(sample_rate),
            byte_rate: U32::new(sample_rate.wrapping_mul(u32::from(block_align))),
            block_align: U16::new(block_align),
            bits_per_sample: U16::new(bits_per_sample),
            subchunk2_id: DATA_ID,
            subchunk2_size: U32::new(data_len),
        }
    }

    /// True when both container markers are present.
    pub fn has_valid_magic(&self) -> bool {
        self.chunk_id == RIFF_MAGIC && self.format == WAVE_MAGIC
    }

    /// Declared payload length in bytes.
    pub fn data_len(&self) -> u32 {
        self.subchunk2_size.get()
    }

    /// Rewrites `subchunk2Size` and `chunkSize` for a payload of `data_len` bytes.
    pub fn set_data_len(&mut self, data_len: u32) {
        self.subchunk2_size.set(data_len);
        self.chunk_size.set(RIFF_OVERHEAD.saturating_add(data_len));
    }

    pub fn is_pcm(&self) -> bool {
        self.audio_format.get() == FORMAT_PCM
    }

    /// Number of whole sample frames in the declared payload.
    pub fn frame_count(&self) -> u32 {
        match self.block_align.get() {
            0 => 0,
            align => self.data_len() / u32::from(align),
        }
    }

    /// Playback length of the declared payload, if the sample rate is known.
    pub fn duration(&self) -> Option<Duration> {
        let rate = self.sample_rate.get();
        if rate == 0 {
            return None;
        }
        let frames = u64::from(self.frame_count());
        let rate = u64::from(rate);
        let secs = frames / rate;
        let nanos = (frames % rate) * 1_000_000_000 / rate;
        Some(Duration::new(secs, nanos as u32))
    }
}

impl fmt::Display for WaveHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.is_pcm() { "PCM" } else { "non-PCM" };
        write!(
            f,
            "{} (format {}), {} ch, {} Hz, {}-bit",
            tag,
            self.audio_format.get(),
            self.num_channels.get(),
            self.sample_rate.get(),
            self.bits_per_sample.get(),
        )
    }
}
