use evplane_kernel::KernelError;
use std::convert::Infallible;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Invalid magic bytes in header")]
    InvalidMagic,
    #[error("Unsupported stream version {0}")]
    UnsupportedVersion(u32),
    #[error("Stream kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("Checksum mismatch in frame {seq}: expected {expected}, found {found}")]
    ChecksumMismatch {
        seq: u64,
        expected: u64,
        found: u64,
    },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
    #[error("Encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
}

impl From<Infallible> for PersistenceError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
