// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::EventCuts;
use crate::event::EventScalars;
use crate::gate::{EventCutFailures, EventGate};

fn scalars() -> EventScalars {
    EventScalars {
        n_pvs: 1,
        n_back_tracks: 10,
        pv_z: Some(0.0),
        n_velo_tracks: 15,
    }
}

#[test]
fn test_thresholds_are_inclusive() {
    let gate = EventGate::default();
    assert!(gate.passes(&scalars()));

    let mut s = scalars();
    s.pv_z = Some(100.0);
    assert!(gate.passes(&s));
    s.pv_z = Some(-100.0);
    assert!(gate.passes(&s));
}

#[test]
fn test_each_cut_rejects() {
    let gate = EventGate::default();

    let mut s = scalars();
    s.n_pvs = 2;
    assert_eq!(gate.evaluate(&s), EventCutFailures { n_pvs: true, ..Default::default() });

    let mut s = scalars();
    s.n_back_tracks = 9;
    assert_eq!(gate.evaluate(&s), EventCutFailures { n_back_tracks: true, ..Default::default() });

    let mut s = scalars();
    s.pv_z = Some(100.5);
    assert_eq!(gate.evaluate(&s), EventCutFailures { pv_z: true, ..Default::default() });

    let mut s = scalars();
    s.n_velo_tracks = 14;
    assert_eq!(gate.evaluate(&s), EventCutFailures { n_velo_tracks: true, ..Default::default() });
}

#[test]
fn test_all_failures_reported_together() {
    let gate = EventGate::new(EventCuts::default());
    let s = EventScalars {
        n_pvs: 0,
        n_back_tracks: 0,
        pv_z: None,
        n_velo_tracks: 0,
    };
    let f = gate.evaluate(&s);
    assert!(f.n_pvs && f.n_back_tracks && f.pv_z && f.n_velo_tracks);
    assert!(!f.passed());
}
