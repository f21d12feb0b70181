// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::harmonics::{HarmonicSums, QVector};
use crate::region::Region;
use core::f64::consts::{FRAC_PI_2, PI};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn test_backward_unit_weight_sums() {
    let mut sums = HarmonicSums::new();
    for phi in [0.0, FRAC_PI_2, PI] {
        sums.accumulate(Region::Backward, -1.0, phi);
    }

    let q1 = sums.unweighted.get(Region::Backward, 1).unwrap();
    assert!(close(q1.x, 0.0));
    assert!(close(q1.y, 1.0));

    // cos(0) + cos(pi) + cos(2pi), sin terms vanish
    let q2 = sums.unweighted.get(Region::Backward, 2).unwrap();
    assert!(close(q2.x, 1.0));
    assert!(close(q2.y, 0.0));

    assert_eq!(sums.counts.backward, 3);
}

#[test]
fn test_eta_weight_first_harmonic_only() {
    let mut sums = HarmonicSums::new();
    sums.accumulate(Region::Forward2, 3.0, 0.0);
    sums.accumulate(Region::Forward2, 2.6, FRAC_PI_2);

    let w1 = sums.eta_weighted.get(Region::Forward2, 1).unwrap();
    assert!(close(w1.x, 3.0));
    assert!(close(w1.y, 2.6));
    assert_eq!(sums.eta_weighted.get(Region::Forward2, 2).unwrap(), QVector::default());

    // Negative eta weights flip the vector.
    sums.accumulate(Region::Backward, -2.0, 0.0);
    assert!(close(sums.eta_weighted.get(Region::Backward, 1).unwrap().x, -2.0));
}

#[test]
fn test_regions_are_independent_slots() {
    let mut sums = HarmonicSums::new();
    sums.accumulate(Region::Forward1, 1.0, 0.0);
    sums.accumulate(Region::ForwardInclusive, 1.0, 0.0);

    assert!(close(sums.unweighted.get(Region::Forward1, 1).unwrap().x, 1.0));
    assert!(close(sums.unweighted.get(Region::ForwardInclusive, 1).unwrap().x, 1.0));
    assert_eq!(sums.unweighted.get(Region::Forward3, 1).unwrap(), QVector::default());
    assert_eq!(sums.counts.get(Region::Forward1), 1);
    assert_eq!(sums.counts.get(Region::ForwardInclusive), 1);
}

#[test]
fn test_get_rejects_harmonics_out_of_range() {
    let mut sums = HarmonicSums::new();
    sums.accumulate(Region::Backward, -1.0, 0.0);

    assert!(sums.unweighted.get(Region::Backward, 0).is_none());
    assert!(sums.unweighted.get(Region::ForwardInclusive, 3).is_none());
    assert!(sums.unweighted.get(Region::Backward, 2).is_some());
}

#[test]
fn test_reset_clears_everything() {
    let mut sums = HarmonicSums::new();
    sums.accumulate(Region::Forward3, 5.0, 1.0);
    sums.reset();
    assert_eq!(sums, HarmonicSums::default());
}
