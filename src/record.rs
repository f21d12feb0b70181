// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Persisted record definitions.

use crate::event::EventScalars;
use crate::harmonics::{QVectorSet, RegionCounts};
use crate::types::key::EventKey;
use serde::{Deserialize, Serialize};

/// Event-wide multiplicities copied through from the input event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalMultiplicity {
    pub n_back_tracks: i32,
    pub n_velo_clusters: i32,
    pub n_velo_tracks: i32,
    pub n_ecal_clusters: i32,
    pub ecal_e_tot: i32,
    pub n_long_tracks: i32,
    pub n_vp_clusters: i32,
}

/// Q-vectors of one event that passed both event and multiplicity gates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventPlaneRecord {
    pub key: EventKey,
    pub gps_time: u64,
    pub pv: [f32; 3],
    pub multiplicity: GlobalMultiplicity,
    pub q: QVectorSet,
    pub q_eta: QVectorSet,
    /// Contributing tracks: `[bin 1, bin 2, bin 3, backward]`.
    pub region_multiplicity: [u32; 4],
}

impl EventPlaneRecord {
    pub fn region_multiplicity(counts: &RegionCounts) -> [u32; 4] {
        [
            counts.forward_bins[0],
            counts.forward_bins[1],
            counts.forward_bins[2],
            counts.backward,
        ]
    }
}

/// Event-plane angles keyed by event, the form candidates are matched against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPlaneAngles {
    pub key: EventKey,
    pub psi1_full: f64,
    pub psi2_full: f64,
    /// `[psi1, psi2]` from the backward side.
    pub psi_back: [f64; 2],
    /// `[psi1, psi2]` from the inclusive forward side.
    pub psi_for: [f64; 2],
    pub r1: f64,
    pub r2: f64,
}

/// Reconstructed Lambda (composite) candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    pub id: i32,
    pub eta: f32,
    pub phi: f32,
    pub mass: f64,
    pub pt: f32,
    pub px: f32,
    pub py: f32,
    pub pz: f32,
    pub ip_chi2: f32,
    pub fd_chi2: f32,
    pub pv_x: f32,
    pub pv_y: f32,
    pub pv_z: f32,
    pub dira: f32,
}

/// Proton or pion daughter of a Lambda.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Daughter {
    pub id: i32,
    pub eta: f32,
    pub phi: f32,
    pub mass: f64,
    pub pt: f32,
    pub px: f32,
    pub py: f32,
    pub pz: f32,
    pub ip_chi2: f64,
    pub ghost_prob: f64,
}

/// One decay candidate with the event quantities it was reconstructed in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub key: EventKey,
    pub n_back_tracks: i32,
    pub n_velo_tracks: i32,
    pub n_pvs: i32,
    pub n_ecal_clusters: i32,
    pub pv_x: Vec<f32>,
    pub pv_y: Vec<f32>,
    pub pv_z: Vec<f32>,
    pub lambda: Lambda,
    pub proton: Daughter,
    pub pion: Daughter,
}

impl CandidateRecord {
    pub fn scalars(&self) -> EventScalars {
        EventScalars {
            n_pvs: self.n_pvs,
            n_back_tracks: self.n_back_tracks,
            pv_z: self.pv_z.first().copied(),
            n_velo_tracks: self.n_velo_tracks,
        }
    }
}

/// Event block of a matched output record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchedEvent {
    pub key: EventKey,
    pub psi1_full: f64,
    pub psi2_full: f64,
    pub psi1_back: f64,
    pub psi2_back: f64,
    pub psi1_for: f64,
    pub psi2_for: f64,
    pub r1: f64,
    pub r2: f64,
    pub pv_x: f32,
    pub pv_y: f32,
    pub pv_z: f32,
    pub n_back_tracks: i32,
    pub n_velo_tracks: i32,
    pub n_ecal_clusters: i32,
}

/// A candidate that passed every cut, joined with its event plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchedRecord {
    pub event: MatchedEvent,
    pub lambda: Lambda,
    pub proton: Daughter,
    pub pion: Daughter,
}

impl MatchedRecord {
    pub fn merge(candidate: &CandidateRecord, ep: &EventPlaneAngles) -> Self {
        let first = |v: &[f32]| v.first().copied().unwrap_or_default();
        Self {
            event: MatchedEvent {
                key: candidate.key,
                psi1_full: ep.psi1_full,
                psi2_full: ep.psi2_full,
                psi1_back: ep.psi_back[0],
                psi2_back: ep.psi_back[1],
                psi1_for: ep.psi_for[0],
                psi2_for: ep.psi_for[1],
                r1: ep.r1,
                r2: ep.r2,
                pv_x: first(&candidate.pv_x),
                pv_y: first(&candidate.pv_y),
                pv_z: first(&candidate.pv_z),
                n_back_tracks: candidate.n_back_tracks,
                n_velo_tracks: candidate.n_velo_tracks,
                n_ecal_clusters: candidate.n_ecal_clusters,
            },
            lambda: candidate.lambda,
            proton: candidate.proton,
            pion: candidate.pion,
        }
    }
}
