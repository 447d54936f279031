//! Walks the sub-chunks of an in-memory RIFF/WAVE file.
//!
//! This is an opt-in alternative to [`crate::reader::decode`] for files that
//! carry extra chunks (`LIST`, `fact`, ...) or put them in another order.
//! Decode never uses it.

use crate::error::{Result, WaveError};
use crate::{RIFF_MAGIC, WAVE_MAGIC};

const PREAMBLE_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

/// One sub-chunk borrowed from the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub id: [u8; 4],
    /// Offset of the chunk's 8-byte id/size header from the start of the file.
    pub offset: usize,
    pub data: &'a [u8],
}

impl Chunk<'_> {
    pub fn is(&self, id: &[u8; 4]) -> bool {
        &self.id == id
    }
}

/// Iterator returned by [`scan`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    bytes: &'a [u8],
    offset: usize,
    done: bool,
}

/// Checks the `RIFF`/`WAVE` preamble and iterates the chunks after it.
pub fn scan(bytes: &[u8]) -> Result<Chunks<'_>> {
    if bytes.len() < PREAMBLE_LEN {
        return Err(WaveError::TruncatedHeader { available: bytes.len() });
    }
    let chunk_id = fourcc(&bytes[0..4]);
    let format = fourcc(&bytes[8..12]);
    if chunk_id != RIFF_MAGIC || format != WAVE_MAGIC {
        return Err(WaveError::InvalidFormat { chunk_id, format });
    }

    Ok(Chunks {
        bytes,
        offset: PREAMBLE_LEN,
        done: false,
    })
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let rest = &self.bytes[self.offset..];
        if rest.len() < CHUNK_HEADER_LEN {
            self.done = true;
            return None;
        }

        let id = fourcc(&rest[0..4]);
        let declared = u32::from_le_bytes([rest[4], rest[5], rest[6], rest[7]]);
        let body = &rest[CHUNK_HEADER_LEN..];
        let len = declared as usize;

        if body.len() < len {
            self.done = true;
            return Some(Err(WaveError::TruncatedChunk {
                id,
                offset: self.offset,
                declared,
                available: body.len(),
            }));
        }

        let chunk = Chunk {
            id,
            offset: self.offset,
            data: &body[..len],
        };
        // Odd-sized chunks are followed by a pad byte, which may be missing at EOF.
        let padded = len + (len & 1);
        self.offset = (self.offset + CHUNK_HEADER_LEN + padded).min(self.bytes.len());
        Some(Ok(chunk))
    }
}

fn fourcc(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WaveHeader, DATA_ID, FMT_ID};
    use zerocopy::AsBytes;

    fn chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        if data.len() % 2 == 1 {
            out.push(0);
        }
        out
    }

    fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
        let body: Vec<u8> = chunks.concat();
        let mut out = b"RIFF".to_vec();
        out.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(&body);
        out
    }

    #[test]
    fn canonical_file_has_fmt_then_data() {
        let mut bytes = WaveHeader::pcm(1, 8_000, 8, 4).as_bytes().to_vec();
        bytes.extend_from_slice(&[1, 2, 3, 4]);

        let chunks: Vec<_> = scan(&bytes).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].is(&FMT_ID));
        assert_eq!(chunks[0].offset, 12);
        assert_eq!(chunks[0].data.len(), 16);
        assert!(chunks[1].is(&DATA_ID));
        assert_eq!(chunks[1].offset, 36);
        assert_eq!(chunks[1].data, &[1, 2, 3, 4]);
    }

    #[test]
    fn skips_pad_byte_after_odd_chunk() {
        let bytes = riff(&[chunk(b"LIST", b"abc"), chunk(b"data", &[7, 7])]);

        let ids: Vec<_> = scan(&bytes)
            .unwrap()
            .map(|c| c.unwrap())
            .map(|c| (c.id, c.offset, c.data.len()))
            .collect();
        assert_eq!(ids, vec![(*b"LIST", 12, 3), (*b"data", 24, 2)]);
    }

    #[test]
    fn missing_final_pad_is_tolerated() {
        let mut bytes = riff(&[chunk(b"data", &[1, 2, 3])]);
        bytes.pop();

        let chunks: Vec<_> = scan(&bytes).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].data, &[1, 2, 3]);
    }

    #[test]
    fn overlong_chunk_yields_one_error() {
        let mut bytes = riff(&[chunk(b"fmt ", &[0; 16])]);
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(&[0; 10]);

        let mut iter = scan(&bytes).unwrap();
        assert!(iter.next().unwrap().is_ok());
        let err = iter.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            WaveError::TruncatedChunk { offset: 36, declared: 100, available: 10, .. }
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn rejects_wrong_form_type() {
        let mut bytes = riff(&[]);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert!(matches!(scan(&bytes), Err(WaveError::InvalidFormat { .. })));
        assert!(matches!(
            scan(b"RIFF"),
            Err(WaveError::TruncatedHeader { available: 4 })
        ));
    }
}
