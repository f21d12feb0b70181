// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Raw detector events and the tracks built from them.
//!
//! A [`RawEvent`] is one entry of an input event stream: event scalars plus
//! per-track columns of equal length. Tracks are materialized on demand,
//! flipped once if they are backward, and dropped at the end of the event.
//!
//! # Invariants
//! - Track columns are dynamically sized; there is no per-event track bound
//! - Columns of unequal length are truncated to the shortest one
//! - Only the first primary vertex is used for position cuts and output

use crate::types::key::EventKey;
use core::f64::consts::PI;
use serde::{Deserialize, Serialize};

/// Per-track columns of one event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackColumns {
    pub ip_chi2: Vec<f32>,
    pub eta: Vec<f32>,
    pub phi: Vec<f32>,
    pub is_backward: Vec<bool>,
    pub n_vp_hits: Vec<f32>,
}

impl TrackColumns {
    pub fn len(&self) -> usize {
        self.ip_chi2
            .len()
            .min(self.eta.len())
            .min(self.phi.len())
            .min(self.is_backward.len())
            .min(self.n_vp_hits.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, track: &Track) {
        self.ip_chi2.push(track.ip_chi2 as f32);
        self.eta.push(track.eta as f32);
        self.phi.push(track.phi as f32);
        self.is_backward.push(track.is_backward);
        self.n_vp_hits.push(track.n_vp_hits as f32);
    }
}

/// One input event as read from an event stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub gps_time: u64,
    pub event_number: u64,
    pub run_number: u32,
    pub pv_x: Vec<f32>,
    pub pv_y: Vec<f32>,
    pub pv_z: Vec<f32>,
    pub tracks: TrackColumns,
    pub n_back_tracks: i32,
    pub n_pvs: i32,
    pub n_velo_clusters: i32,
    pub n_velo_tracks: i32,
    pub n_ecal_clusters: i32,
    pub ecal_e_tot: i32,
    pub n_long_tracks: i32,
    pub n_vp_clusters: i32,
}

/// The event-level quantities every selection looks at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventScalars {
    pub n_pvs: i32,
    pub n_back_tracks: i32,
    /// Longitudinal position of the first PV, `None` when no PV was stored.
    pub pv_z: Option<f32>,
    pub n_velo_tracks: i32,
}

impl RawEvent {
    pub fn key(&self) -> EventKey {
        EventKey::new(self.run_number, self.event_number)
    }

    pub fn scalars(&self) -> EventScalars {
        EventScalars {
            n_pvs: self.n_pvs,
            n_back_tracks: self.n_back_tracks,
            pv_z: self.pv_z.first().copied(),
            n_velo_tracks: self.n_velo_tracks,
        }
    }

    /// Position of the first primary vertex; missing coordinates read as zero.
    pub fn primary_vertex(&self) -> [f32; 3] {
        [
            self.pv_x.first().copied().unwrap_or_default(),
            self.pv_y.first().copied().unwrap_or_default(),
            self.pv_z.first().copied().unwrap_or_default(),
        ]
    }

    pub fn tracks(&self) -> impl Iterator<Item = Track> + '_ {
        let cols = &self.tracks;
        (0..cols.len()).map(move |i| Track {
            eta: f64::from(cols.eta[i]),
            phi: f64::from(cols.phi[i]),
            ip_chi2: f64::from(cols.ip_chi2[i]),
            is_backward: cols.is_backward[i],
            n_vp_hits: f64::from(cols.n_vp_hits[i]),
        })
    }
}

/// One reconstructed VELO track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    pub eta: f64,
    pub phi: f64,
    pub ip_chi2: f64,
    pub is_backward: bool,
    pub n_vp_hits: f64,
}

impl Track {
    pub fn new(eta: f64, phi: f64, ip_chi2: f64, is_backward: bool) -> Self {
        Self {
            eta,
            phi,
            ip_chi2,
            is_backward,
            n_vp_hits: 0.0,
        }
    }

    /// Moves a backward track into the common frame: eta is negated and phi
    /// rotated by pi. Phi is not wrapped back into [0, 2pi).
    pub fn orient(&mut self) {
        if self.is_backward {
            self.eta = -self.eta;
            self.phi += PI;
        }
    }
}
