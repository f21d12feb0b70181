// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants and selection thresholds.
//!
//! Every threshold struct deserializes with `#[serde(default)]`, so a config
//! file only has to name the values it overrides.

use serde::{Deserialize, Serialize};

/// Number of harmonic orders accumulated (n = 1, 2).
pub const HARMONICS: usize = 2;

/// Forward Q-vector slots: three eta bins plus the inclusive union.
pub const FORWARD_SLOTS: usize = 4;

/// Slot of the inclusive forward union inside the forward arrays.
pub const FORWARD_INCLUSIVE_SLOT: usize = 3;

/// Candidates between two progress log lines.
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Event-level admissibility cuts, shared by the event-plane and candidate paths.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventCuts {
    pub required_pvs: i32,
    pub min_back_tracks: i32,
    pub pv_z_min: f32,
    pub pv_z_max: f32,
    pub min_velo_tracks: i32,
}

impl Default for EventCuts {
    fn default() -> Self {
        Self {
            required_pvs: 1,
            min_back_tracks: 10,
            pv_z_min: -100.0,
            pv_z_max: 100.0,
            min_velo_tracks: 15,
        }
    }
}

/// Per-track quality cut.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackCuts {
    /// Tracks with an IP chi2 above this value are dropped from every sum.
    pub max_ip_chi2: f32,
}

impl Default for TrackCuts {
    fn default() -> Self {
        Self { max_ip_chi2: 1.5 }
    }
}

/// Pseudorapidity region edges. Forward bins are `(lower, upper]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionBounds {
    /// Backward region is `eta < backward_max`.
    pub backward_max: f32,
    /// Ascending edges of the three forward bins; the union spans first..last.
    pub forward_edges: [f32; 4],
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self {
            backward_max: -0.5,
            forward_edges: [0.5, 2.5, 4.0, 6.0],
        }
    }
}

/// How the plain forward and backward tallies are counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TallyMode {
    /// Counters follow region membership: forward = inclusive union, backward = backward region.
    #[default]
    Region,
    /// Reference tally: forward counts every non-backward-flagged track and again every
    /// track in the inclusive union; backward counts backward-flagged tracks.
    Legacy,
}

/// Minimum per-region multiplicity an event needs after the track loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplicityGate {
    pub min_tracks: u32,
    pub tally: TallyMode,
}

impl Default for MultiplicityGate {
    fn default() -> Self {
        Self {
            min_tracks: 5,
            tally: TallyMode::Region,
        }
    }
}

/// Decay-candidate cuts (Lambda -> p pi). Event-level cuts come from [`EventCuts`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateCuts {
    pub min_fd_chi2: f32,
    pub min_dira: f32,
    pub min_proton_ip_chi2: f64,
    pub min_pion_ip_chi2: f64,
    pub min_proton_pt: f32,
    pub min_pion_pt: f32,
    pub max_proton_ghost_prob: f64,
    pub max_pion_ghost_prob: f64,
}

impl Default for CandidateCuts {
    fn default() -> Self {
        Self {
            min_fd_chi2: 130.0,
            min_dira: 0.9999,
            min_proton_ip_chi2: 25.0,
            min_pion_ip_chi2: 25.0,
            min_proton_pt: 500.0,
            min_pion_pt: 200.0,
            max_proton_ghost_prob: 0.1,
            max_pion_ghost_prob: 0.1,
        }
    }
}

/// Everything the event-plane builder needs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub event: EventCuts,
    pub track: TrackCuts,
    pub regions: RegionBounds,
    pub multiplicity: MultiplicityGate,
}
