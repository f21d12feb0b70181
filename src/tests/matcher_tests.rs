// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::config::{CandidateCuts, EventCuts};
use crate::error::KernelError;
use crate::index::{DuplicatePolicy, EventPlaneIndex};
use crate::matcher::{CandidateMatcher, Cut, MatchOutcome};
use crate::record::{CandidateRecord, EventPlaneAngles, MatchedRecord};
use crate::tests::support::good_candidate;
use crate::types::key::EventKey;
use std::vec::Vec;

fn angles(run: u32, event: u64, psi: f64) -> EventPlaneAngles {
    EventPlaneAngles {
        key: EventKey::new(run, event),
        psi1_full: psi,
        psi2_full: psi / 2.0,
        psi_back: [psi + 0.1, psi / 2.0 + 0.1],
        psi_for: [psi - 0.1, psi / 2.0 - 0.1],
        r1: 0.4,
        r2: 0.7,
    }
}

fn source() -> Vec<EventPlaneAngles> {
    vec![angles(274156, 40, 0.5), angles(274156, 41, 1.0), angles(274156, 42, 1.5)]
}

fn index_of(src: &[EventPlaneAngles]) -> EventPlaneIndex {
    EventPlaneIndex::build(src.iter().map(|a| a.key), DuplicatePolicy::LastWins).unwrap()
}

#[test]
fn test_pt_failure_skips_lookup() {
    let src = source();
    let index = index_of(&src);
    let mut m = CandidateMatcher::new(EventCuts::default(), CandidateCuts::default(), &index, &src);

    let mut cand = good_candidate(274156, 42);
    cand.proton.pt = 499.0;

    match m.process(&cand).unwrap() {
        MatchOutcome::FailedCuts(mask) => {
            assert_eq!(mask.iter().collect::<Vec<_>>(), vec![Cut::ProtonPt]);
        }
        other => panic!("expected cut failure, got {other:?}"),
    }
    let s = m.stats();
    assert_eq!(s.cut_flow.get(Cut::ProtonPt), 1);
    assert_eq!(s.failed_cuts, 1);
    assert_eq!(s.unmatched, 0);
    assert_eq!(s.saved, 0);
}

#[test]
fn test_every_failed_cut_is_counted() {
    let src = source();
    let index = index_of(&src);
    let mut m = CandidateMatcher::new(EventCuts::default(), CandidateCuts::default(), &index, &src);

    let mut cand = good_candidate(274156, 40);
    cand.n_back_tracks = 3;
    cand.n_velo_tracks = 3;
    cand.n_pvs = 2;
    cand.pv_z = vec![-250.0];
    cand.lambda.fd_chi2 = 10.0;
    cand.lambda.dira = 0.99;
    cand.proton.ip_chi2 = 1.0;
    cand.pion.ip_chi2 = 1.0;
    cand.proton.pt = 100.0;
    cand.pion.pt = 100.0;
    cand.proton.ghost_prob = 0.5;
    cand.pion.ghost_prob = 0.5;

    let outcome = m.process(&cand).unwrap();
    assert!(matches!(outcome, MatchOutcome::FailedCuts(mask) if mask.iter().count() == Cut::COUNT));
    for cut in Cut::ALL {
        assert_eq!(m.stats().cut_flow.get(cut), 1, "{cut:?}");
    }
    assert_eq!(m.stats().failed_cuts, 1);
}

#[test]
fn test_cut_boundaries() {
    let src = source();
    let index = index_of(&src);
    let m = CandidateMatcher::new(EventCuts::default(), CandidateCuts::default(), &index, &src);

    let mut cand = good_candidate(1, 1);
    cand.lambda.fd_chi2 = 130.0;
    cand.proton.ip_chi2 = 25.0;
    cand.proton.pt = 500.0;
    cand.pion.pt = 200.0;
    cand.proton.ghost_prob = 0.1;
    cand.pv_z = vec![100.0];
    assert!(m.evaluate(&cand).is_empty());

    cand.pion.ghost_prob = 0.11;
    assert!(m.evaluate(&cand).contains(Cut::PionGhostProb));
}

#[test]
fn test_match_merges_event_plane_fields() {
    let src = source();
    let index = index_of(&src);
    let mut m = CandidateMatcher::new(EventCuts::default(), CandidateCuts::default(), &index, &src);

    let cand = good_candidate(274156, 41);
    let record = match m.process(&cand).unwrap() {
        MatchOutcome::Matched(r) => r,
        other => panic!("expected match, got {other:?}"),
    };

    assert_eq!(record.event.key, cand.key);
    assert_eq!(record.event.psi1_full, 1.0);
    assert_eq!(record.event.psi2_full, 0.5);
    assert!((record.event.psi1_back - 1.1).abs() < 1e-12);
    assert!((record.event.psi1_for - 0.9).abs() < 1e-12);
    assert_eq!((record.event.r1, record.event.r2), (0.4, 0.7));
    assert_eq!(record.event.pv_z, 12.5);
    assert_eq!(record.event.n_velo_tracks, 120);
    assert_eq!(record.lambda, cand.lambda);
    assert_eq!(record.proton, cand.proton);
    assert_eq!(record.pion, cand.pion);
    assert_eq!(m.stats().saved, 1);
}

#[test]
fn test_run_keeps_totals_balanced() {
    let src = source();
    let index = index_of(&src);
    let mut m = CandidateMatcher::new(EventCuts::default(), CandidateCuts::default(), &index, &src);

    let mut bad = good_candidate(274157, 40);
    bad.pion.pt = 50.0;
    let cands: Vec<Result<CandidateRecord, KernelError>> = vec![
        Ok(good_candidate(274156, 40)),
        Ok(good_candidate(274156, 99)),
        Ok(bad),
        Ok(good_candidate(274156, 42)),
        Ok(good_candidate(274156, 42)),
    ];

    let mut out: Vec<MatchedRecord> = Vec::new();
    m.run(cands, &mut out).unwrap();

    let s = m.into_stats();
    assert_eq!((s.total, s.failed_cuts, s.unmatched, s.saved), (5, 1, 1, 3));
    assert!(s.is_balanced());
    assert_eq!(out.len(), 3);
    assert_eq!(s.runs.iter().copied().collect::<Vec<_>>(), vec![274156, 274157]);
}

#[test]
fn test_dangling_position_is_an_error() {
    let src = source();
    let index = EventPlaneIndex::build([EventKey::new(9, 9)].into_iter().cycle().take(5), DuplicatePolicy::LastWins).unwrap();
    let mut m = CandidateMatcher::new(EventCuts::default(), CandidateCuts::default(), &index, &src);

    let err = m.process(&good_candidate(9, 9)).unwrap_err();
    assert_eq!(err, KernelError::PositionOutOfRange { position: 4, len: 3 });
}

#[test]
fn test_sink_errors_propagate() {
    struct Full;
    impl crate::sink::RecordSink<MatchedRecord> for Full {
        type Error = KernelError;
        fn append(&mut self, _: MatchedRecord) -> Result<(), KernelError> {
            Err(KernelError::InvalidConfig("sink full".into()))
        }
    }

    let src = source();
    let index = index_of(&src);
    let mut m = CandidateMatcher::new(EventCuts::default(), CandidateCuts::default(), &index, &src);
    let cands = vec![Ok::<_, KernelError>(good_candidate(274156, 40))];
    assert!(m.run(cands, &mut Full).is_err());
    assert_eq!(m.stats().saved, 1);
}
