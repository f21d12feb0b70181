// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-region Q-vector accumulation for harmonic orders 1 and 2.

use crate::config::{FORWARD_SLOTS, HARMONICS};
use crate::region::Region;
use serde::{Deserialize, Serialize};

/// One (cos-sum, sin-sum) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QVector {
    pub x: f64,
    pub y: f64,
}

impl QVector {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Adds `w * (cos(n phi), sin(n phi))`.
    pub fn add(&mut self, n: u32, phi: f64, w: f64) {
        let (s, c) = (f64::from(n) * phi).sin_cos();
        self.x += w * c;
        self.y += w * s;
    }

    /// Event-plane angle of harmonic `n`, in (-pi/n, pi/n].
    pub fn psi(&self, n: u32) -> f64 {
        self.y.atan2(self.x) / f64::from(n)
    }

    pub fn sum(&self, other: &QVector) -> QVector {
        QVector::new(self.x + other.x, self.y + other.y)
    }
}

/// Q-vectors of all regions, indexed `[harmonic - 1]` and `[harmonic - 1][slot]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QVectorSet {
    pub backward: [QVector; HARMONICS],
    pub forward: [[QVector; FORWARD_SLOTS]; HARMONICS],
}

impl QVectorSet {
    /// `None` unless `n` is in `1..=HARMONICS`.
    pub fn get(&self, region: Region, n: u32) -> Option<QVector> {
        let h = (n as usize).checked_sub(1).filter(|&h| h < HARMONICS)?;
        Some(match region.forward_slot() {
            None => self.backward[h],
            Some(slot) => self.forward[h][slot],
        })
    }

    /// `n` must be in `1..=HARMONICS`.
    fn slot_mut(&mut self, region: Region, n: u32) -> &mut QVector {
        debug_assert!((1..=HARMONICS as u32).contains(&n), "harmonic {n} out of range");
        let h = n as usize - 1;
        match region.forward_slot() {
            None => &mut self.backward[h],
            Some(slot) => &mut self.forward[h][slot],
        }
    }
}

/// Tracks that contributed to each region's sums.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionCounts {
    pub backward: u32,
    pub forward_bins: [u32; 3],
    pub forward_inclusive: u32,
}

impl RegionCounts {
    pub fn get(&self, region: Region) -> u32 {
        match region {
            Region::Backward => self.backward,
            Region::Forward1 => self.forward_bins[0],
            Region::Forward2 => self.forward_bins[1],
            Region::Forward3 => self.forward_bins[2],
            Region::ForwardInclusive => self.forward_inclusive,
        }
    }

    fn bump(&mut self, region: Region) {
        match region {
            Region::Backward => self.backward += 1,
            Region::Forward1 => self.forward_bins[0] += 1,
            Region::Forward2 => self.forward_bins[1] += 1,
            Region::Forward3 => self.forward_bins[2] += 1,
            Region::ForwardInclusive => self.forward_inclusive += 1,
        }
    }
}

/// Running sums for the event currently in the track loop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HarmonicSums {
    pub unweighted: QVectorSet,
    /// Weight = oriented eta. Only harmonic 1 is filled.
    pub eta_weighted: QVectorSet,
    pub counts: RegionCounts,
}

impl HarmonicSums {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Adds one oriented track to `region`.
    pub fn accumulate(&mut self, region: Region, eta: f64, phi: f64) {
        for n in 1..=HARMONICS as u32 {
            self.unweighted.slot_mut(region, n).add(n, phi, 1.0);
        }
        self.eta_weighted.slot_mut(region, 1).add(1, phi, eta);
        self.counts.bump(region);
    }
}
