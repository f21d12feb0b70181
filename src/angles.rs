// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event-plane angles from stored Q-vectors.
//!
//! Side angles use the backward slot and the inclusive forward slot; the full
//! angle uses their vector sum. Resolutions are carried through unchanged.

use crate::config::FORWARD_INCLUSIVE_SLOT;
use crate::harmonics::{QVector, QVectorSet};
use crate::record::{EventPlaneAngles, EventPlaneRecord};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleSettings {
    pub r1: f64,
    pub r2: f64,
    /// Use the eta-weighted sums for the first harmonic.
    pub eta_weighted_first: bool,
}

fn side_vectors(set: &QVectorSet, h: usize) -> (QVector, QVector) {
    (set.backward[h], set.forward[h][FORWARD_INCLUSIVE_SLOT])
}

pub fn event_plane_angles(record: &EventPlaneRecord, settings: &AngleSettings) -> EventPlaneAngles {
    let first = if settings.eta_weighted_first { &record.q_eta } else { &record.q };
    let (back1, for1) = side_vectors(first, 0);
    let (back2, for2) = side_vectors(&record.q, 1);

    EventPlaneAngles {
        key: record.key,
        psi1_full: back1.sum(&for1).psi(1),
        psi2_full: back2.sum(&for2).psi(2),
        psi_back: [back1.psi(1), back2.psi(2)],
        psi_for: [for1.psi(1), for2.psi(2)],
        r1: settings.r1,
        r2: settings.r2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GlobalMultiplicity;
    use crate::types::key::EventKey;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn record_with(q: QVectorSet, q_eta: QVectorSet) -> EventPlaneRecord {
        EventPlaneRecord {
            key: EventKey::new(7, 11),
            gps_time: 0,
            pv: [0.0; 3],
            multiplicity: GlobalMultiplicity::default(),
            q,
            q_eta,
            region_multiplicity: [5; 4],
        }
    }

    #[test]
    fn test_side_and_full_angles() {
        let mut q = QVectorSet::default();
        q.backward[0] = QVector::new(0.0, 2.0);
        q.forward[0][FORWARD_INCLUSIVE_SLOT] = QVector::new(2.0, 0.0);
        q.backward[1] = QVector::new(0.0, 1.0);
        q.forward[1][FORWARD_INCLUSIVE_SLOT] = QVector::new(0.0, 3.0);
        // Bin slots must not leak into the side angles.
        q.forward[0][0] = QVector::new(-100.0, -100.0);

        let settings = AngleSettings { r1: 0.3, r2: 0.6, eta_weighted_first: false };
        let a = event_plane_angles(&record_with(q, QVectorSet::default()), &settings);

        assert_eq!(a.key, EventKey::new(7, 11));
        assert!((a.psi_back[0] - FRAC_PI_2).abs() < 1e-12);
        assert!(a.psi_for[0].abs() < 1e-12);
        assert!((a.psi1_full - FRAC_PI_4).abs() < 1e-12);
        assert!((a.psi2_full - FRAC_PI_4).abs() < 1e-12);
        assert_eq!((a.r1, a.r2), (0.3, 0.6));
    }

    #[test]
    fn test_eta_weighted_first_harmonic() {
        let mut q_eta = QVectorSet::default();
        q_eta.backward[0] = QVector::new(-1.0, 0.0);
        q_eta.forward[0][FORWARD_INCLUSIVE_SLOT] = QVector::new(-1.0, 0.0);

        let settings = AngleSettings { eta_weighted_first: true, ..Default::default() };
        let a = event_plane_angles(&record_with(QVectorSet::default(), q_eta), &settings);
        assert!((a.psi1_full - core::f64::consts::PI).abs() < 1e-12);
    }
}
