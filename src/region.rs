// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Track quality selection and pseudorapidity region membership.
//!
//! The three forward bins are disjoint, but the inclusive forward union is
//! evaluated on its own: a track in bin 1 is also a member of the union.

use crate::config::{RegionBounds, TrackCuts, FORWARD_INCLUSIVE_SLOT};
use crate::error::{KernelError, KernelResult};
use crate::event::Track;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Region {
    Backward = 0,
    Forward1 = 1,
    Forward2 = 2,
    Forward3 = 3,
    ForwardInclusive = 4,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Backward,
        Region::Forward1,
        Region::Forward2,
        Region::Forward3,
        Region::ForwardInclusive,
    ];

    /// Index into the forward Q-vector arrays, `None` for the backward region.
    pub fn forward_slot(self) -> Option<usize> {
        match self {
            Region::Backward => None,
            Region::Forward1 => Some(0),
            Region::Forward2 => Some(1),
            Region::Forward3 => Some(2),
            Region::ForwardInclusive => Some(FORWARD_INCLUSIVE_SLOT),
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of regions one track belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionSet(u8);

impl RegionSet {
    pub fn insert(&mut self, region: Region) {
        self.0 |= region.bit();
    }

    pub fn contains(&self, region: Region) -> bool {
        self.0 & region.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Region> {
        Region::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

#[derive(Clone, Debug)]
pub struct RegionClassifier {
    max_ip_chi2: f64,
    backward_max: f64,
    edges: [f64; 4],
}

impl RegionClassifier {
    pub fn new(track: &TrackCuts, bounds: &RegionBounds) -> KernelResult<Self> {
        let edges = bounds.forward_edges.map(f64::from);
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(KernelError::InvalidConfig(format!(
                "forward edges must be strictly ascending, got {:?}",
                bounds.forward_edges
            )));
        }
        if bounds.backward_max > bounds.forward_edges[0] {
            return Err(KernelError::InvalidConfig(format!(
                "backward edge {} overlaps forward edge {}",
                bounds.backward_max, bounds.forward_edges[0]
            )));
        }
        Ok(Self {
            max_ip_chi2: f64::from(track.max_ip_chi2),
            backward_max: f64::from(bounds.backward_max),
            edges,
        })
    }

    /// Basic quality cut, applied before any flip or counting.
    pub fn accepts(&self, track: &Track) -> bool {
        track.ip_chi2 <= self.max_ip_chi2
    }

    /// Regions of an already oriented pseudorapidity.
    pub fn classify(&self, eta: f64) -> RegionSet {
        let mut set = RegionSet::default();
        let e = &self.edges;

        if eta < self.backward_max {
            set.insert(Region::Backward);
        }
        if eta > e[0] && eta <= e[1] {
            set.insert(Region::Forward1);
        } else if eta > e[1] && eta <= e[2] {
            set.insert(Region::Forward2);
        } else if eta > e[2] && eta <= e[3] {
            set.insert(Region::Forward3);
        }
        if eta > e[0] && eta <= e[3] {
            set.insert(Region::ForwardInclusive);
        }
        set
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        let bounds = RegionBounds::default();
        Self {
            max_ip_chi2: f64::from(TrackCuts::default().max_ip_chi2),
            backward_max: f64::from(bounds.backward_max),
            edges: bounds.forward_edges.map(f64::from),
        }
    }
}
