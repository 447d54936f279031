use crate::error::{Result, WaveError};
use crate::WaveRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;
use zerocopy::AsBytes;

/// How [`encode_with`] treats the header's size fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizePolicy {
    /// Write the header exactly as held, even if it disagrees with the payload.
    #[default]
    PassThrough,
    /// Write `subchunk2Size` and `chunkSize` computed from the payload length.
    Recompute,
    /// Refuse to write a record whose `subchunk2Size` disagrees with the payload.
    Strict,
}

/// Writes the header verbatim followed by the whole payload.
///
/// Size fields are not checked; see [`SizePolicy::PassThrough`].
pub fn encode<W: Write>(record: &WaveRecord, sink: W) -> Result<()> {
    encode_with(record, sink, SizePolicy::PassThrough)
}

pub fn encode_with<W: Write>(record: &WaveRecord, mut sink: W, policy: SizePolicy) -> Result<()> {
    let header = match policy {
        SizePolicy::PassThrough => *record.header(),
        SizePolicy::Recompute => record.synced_header()?,
        SizePolicy::Strict => {
            if !record.is_consistent() {
                return Err(WaveError::LengthMismatch {
                    declared: record.header().data_len(),
                    actual: record.payload().len(),
                });
            }
            *record.header()
        }
    };

    sink.write_all(header.as_bytes())?;
    sink.write_all(record.payload())?;
    Ok(())
}

impl WaveRecord {
    /// Encodes the record to `path`, creating or truncating the file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_with(path, SizePolicy::PassThrough)
    }

    pub fn save_with<P: AsRef<Path>>(&self, path: P, policy: SizePolicy) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| WaveError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut out = BufWriter::new(file);
        encode_with(self, &mut out, policy)?;
        out.flush()?;

        debug!(path = %path.display(), ?policy, bytes = self.payload().len(), "wrote container");
        Ok(())
    }
}
