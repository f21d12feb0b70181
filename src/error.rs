//! Error types.

use crate::types::key::EventKey;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum KernelError {
    /// Two event-plane records share a composite key under the strict policy.
    #[error("duplicate event-plane key {key}: positions {first} and {second}")]
    DuplicateKey { key: EventKey, first: u64, second: u64 },
    /// The index points at a record the event-plane source does not hold.
    #[error("event-plane position {position} not present in source of {len} records")]
    PositionOutOfRange { position: u64, len: usize },
    /// Threshold set that cannot classify anything sensibly.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type KernelResult<T> = core::result::Result<T, KernelError>;

impl From<core::convert::Infallible> for KernelError {
    fn from(never: core::convert::Infallible) -> Self {
        match never {}
    }
}
