// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event stream -> Q-vectors -> angles -> index -> matched candidates.

use crate::angles::{event_plane_angles, AngleSettings};
use crate::builder::EventPlaneBuilder;
use crate::config::{BuilderConfig, CandidateCuts, EventCuts};
use crate::event::RawEvent;
use crate::index::{DuplicatePolicy, EventPlaneIndex};
use crate::matcher::{CandidateMatcher, Cut};
use crate::record::{EventPlaneAngles, EventPlaneRecord, MatchedRecord};
use crate::tests::support::{event_with_counts, good_candidate};
use core::convert::Infallible;
use std::vec::Vec;

#[test]
fn test_full_chain() {
    let events: Vec<Result<RawEvent, Infallible>> = (0..20u64)
        .map(|e| {
            // Every fourth event lacks tracks in bin 3.
            let bin3 = if e % 4 == 0 { 2 } else { 6 };
            Ok(event_with_counts(274156, e, [6, 6, bin3, 6]))
        })
        .collect();

    let mut records: Vec<EventPlaneRecord> = Vec::new();
    let stats = EventPlaneBuilder::new(&BuilderConfig::default())
        .unwrap()
        .run(events, &mut records)
        .unwrap();
    assert_eq!(stats.emitted, 15);
    assert_eq!(stats.failed_multiplicity, 5);

    let settings = AngleSettings { r1: 0.5, r2: 0.8, eta_weighted_first: false };
    let angles: Vec<EventPlaneAngles> = records.iter().map(|r| event_plane_angles(r, &settings)).collect();
    let index = EventPlaneIndex::build(angles.iter().map(|a| a.key), DuplicatePolicy::Reject).unwrap();
    assert_eq!(index.len(), 15);

    let mut low_pt = good_candidate(274156, 1);
    low_pt.proton.pt = 450.0;
    let candidates = vec![
        Ok::<_, crate::error::KernelError>(good_candidate(274156, 1)),
        Ok(good_candidate(274156, 4)), // event 4 was discarded upstream
        Ok(good_candidate(274156, 5)),
        Ok(low_pt),
    ];

    let mut matched: Vec<MatchedRecord> = Vec::new();
    let mut m = CandidateMatcher::new(EventCuts::default(), CandidateCuts::default(), &index, &angles);
    m.run(candidates, &mut matched).unwrap();

    let s = m.stats();
    assert_eq!((s.total, s.failed_cuts, s.unmatched, s.saved), (4, 1, 1, 2));
    assert_eq!(s.cut_flow.get(Cut::ProtonPt), 1);
    assert_eq!(matched.iter().map(|r| r.event.key.event).collect::<Vec<_>>(), vec![1, 5]);

    let ep = &angles[index.lookup(274156, 5).unwrap() as usize];
    assert_eq!(matched[1].event.psi2_full, ep.psi2_full);
    assert_eq!(matched[1].event.r2, 0.8);
}
