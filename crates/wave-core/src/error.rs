use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WaveError>;

#[derive(Error, Debug)]
pub enum WaveError {
    #[error("Cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "Invalid container: expected RIFF/WAVE, found {}/{}",
        .chunk_id.escape_ascii(),
        .format.escape_ascii()
    )]
    InvalidFormat { chunk_id: [u8; 4], format: [u8; 4] },
    #[error("Truncated header: only {available} bytes available")]
    TruncatedHeader { available: usize },
    #[error("Truncated payload: header declares {declared} bytes, only {available} available")]
    TruncatedPayload { declared: u32, available: usize },
    #[error("Cannot allocate {requested} bytes for the payload")]
    Allocation { requested: usize },
    #[error("Size mismatch: header declares {declared} payload bytes, record holds {actual}")]
    LengthMismatch { declared: u32, actual: usize },
    #[error("Payload of {len} bytes does not fit a 32-bit size field")]
    PayloadTooLarge { len: usize },
    #[error(
        "Truncated chunk '{}' at offset {offset}: declares {declared} bytes, only {available} available",
        .id.escape_ascii()
    )]
    TruncatedChunk {
        id: [u8; 4],
        offset: usize,
        declared: u32,
        available: usize,
    },
}
