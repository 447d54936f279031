use crate::error::{Result, WaveError};
use crate::{WaveHeader, WaveRecord, HEADER_LEN};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::debug;
use zerocopy::FromBytes;

// Up-front payload reservation; larger payloads grow as bytes actually arrive.
const RESERVE_LIMIT: usize = 64 * 1024;

/// Reads one container from `source`: the 44-byte header, then exactly
/// `subchunk2Size` payload bytes.
///
/// Nothing past the payload is consumed. On any error no record is produced
/// and the source is left wherever the failing read stopped.
pub fn decode<R: Read>(mut source: R) -> Result<WaveRecord> {
    let mut raw = Vec::with_capacity(HEADER_LEN);
    source.by_ref().take(HEADER_LEN as u64).read_to_end(&mut raw)?;

    let header = WaveHeader::read_from(&raw[..])
        .ok_or(WaveError::TruncatedHeader { available: raw.len() })?;

    if !header.has_valid_magic() {
        return Err(WaveError::InvalidFormat {
            chunk_id: header.chunk_id,
            format: header.format,
        });
    }
    debug!(%header, data_len = header.data_len(), "decoded header");

    let declared = header.data_len();
    let len = declared as usize;
    let mut payload = Vec::new();
    payload
        .try_reserve_exact(len.min(RESERVE_LIMIT))
        .map_err(|_| WaveError::Allocation { requested: len })?;
    source
        .take(u64::from(declared))
        .read_to_end(&mut payload)
        .map_err(|e| match e.kind() {
            ErrorKind::OutOfMemory => WaveError::Allocation { requested: len },
            _ => WaveError::Io(e),
        })?;

    if payload.len() < len {
        return Err(WaveError::TruncatedPayload {
            declared,
            available: payload.len(),
        });
    }

    Ok(WaveRecord::from_parts(header, payload))
}

impl WaveRecord {
    /// Decodes the container stored at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| WaveError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let file_len = file.metadata()?.len();

        let record = decode(BufReader::new(file))?;

        let consumed = (HEADER_LEN + record.payload().len()) as u64;
        if file_len > consumed {
            debug!(
                path = %path.display(),
                trailing = file_len - consumed,
                "ignoring bytes after the data chunk"
            );
        }
        Ok(record)
    }
}
