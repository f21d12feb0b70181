// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! evplane-kernel: event-plane Q-vectors from VELO tracks and key-indexed
//! matching of decay candidates against them.

pub mod config;
pub mod error;
pub mod types;
pub mod event;
pub mod gate;
pub mod region;
pub mod harmonics;
pub mod record;
pub mod sink;
pub mod builder;
pub mod index;
pub mod matcher;
pub mod angles;

#[cfg(test)]
pub mod tests;

pub use builder::{BuildOutcome, BuildStats, EventPlaneBuilder};
pub use error::{KernelError, KernelResult};
pub use index::{DuplicatePolicy, EventPlaneIndex};
pub use matcher::{CandidateMatcher, MatchOutcome, MatchStats};
pub use types::key::EventKey;
