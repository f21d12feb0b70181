//! Synthetic inputs for end-to-end tests of the command-line tools.
//!
//! Scenario (run 274156 unless noted):
//! - `00274156_00000001_1.tuple_pbpb2024.evs`: event 1 passes, event 2 has
//!   only four tracks in forward bin 2, event 3 has two PVs
//! - `00274156_00000002_1.tuple_pbpb2024.evs`: events 4 and 5 pass
//! - a non-matching file and a matching-named subdirectory, both ignored
//! - `candidates.evs`: five candidates, two of which end up matched

use crate::error::Result;
use crate::stream;
use evplane_kernel::event::{RawEvent, Track};
use evplane_kernel::record::{CandidateRecord, Daughter, Lambda};
use evplane_kernel::types::key::EventKey;

use std::fs;
use std::path::{Path, PathBuf};

pub const RUN: u32 = 274156;

pub struct TestPaths {
    pub input_dir: PathBuf,
    pub event_files: Vec<PathBuf>,
    pub candidates: PathBuf,
}

/// Expected totals of the scenario under default settings.
pub struct Expected;

impl Expected {
    pub const EVENTS: u64 = 5;
    pub const EMITTED: u64 = 3;
    pub const FAILED_EVENT_GATE: u64 = 1;
    pub const FAILED_MULTIPLICITY: u64 = 1;
    pub const CANDIDATES: u64 = 5;
    pub const FAILED_CUTS: u64 = 1;
    pub const UNMATCHED: u64 = 2;
    pub const SAVED: u64 = 2;
}

/// An event passing every default event cut, with `counts[0..3]` tracks in
/// forward bins 1..3 and `counts[3]` backward-flagged tracks.
pub fn event(run: u32, event: u64, counts: [usize; 4]) -> RawEvent {
    let mut ev = RawEvent {
        gps_time: 1_714_000_000 + event,
        event_number: event,
        run_number: run,
        pv_x: vec![0.05],
        pv_y: vec![-0.1],
        pv_z: vec![20.0],
        n_back_tracks: 35,
        n_pvs: 1,
        n_velo_clusters: 800,
        n_velo_tracks: 100,
        n_ecal_clusters: 25,
        ecal_e_tot: 4000,
        n_long_tracks: 50,
        n_vp_clusters: 1200,
        ..Default::default()
    };
    let etas = [(1.5, false), (3.0, false), (5.0, false), (2.0, true)];
    for ((eta, back), n) in etas.into_iter().zip(counts) {
        for i in 0..n {
            let phi = 0.4 * i as f64 + eta;
            ev.tracks.push(&Track::new(eta, phi, 0.8, back));
        }
    }
    ev
}

/// A candidate passing every default cut.
pub fn candidate(run: u32, event: u64) -> CandidateRecord {
    CandidateRecord {
        key: EventKey::new(run, event),
        n_back_tracks: 35,
        n_velo_tracks: 100,
        n_pvs: 1,
        n_ecal_clusters: 25,
        pv_x: vec![0.05],
        pv_y: vec![-0.1],
        pv_z: vec![20.0],
        lambda: Lambda {
            id: 3122,
            mass: 1115.6,
            pt: 1500.0,
            fd_chi2: 300.0,
            dira: 0.99999,
            ..Default::default()
        },
        proton: Daughter {
            id: 2212,
            mass: 938.27,
            pt: 1100.0,
            ip_chi2: 50.0,
            ghost_prob: 0.02,
            ..Default::default()
        },
        pion: Daughter {
            id: -211,
            mass: 139.57,
            pt: 400.0,
            ip_chi2: 70.0,
            ghost_prob: 0.03,
            ..Default::default()
        },
    }
}

pub fn generate_test_scenario(dir: &Path) -> Result<TestPaths> {
    let input_dir = dir.join("events");
    fs::create_dir_all(&input_dir)?;

    let mut two_pvs = event(RUN, 3, [6, 6, 6, 6]);
    two_pvs.n_pvs = 2;
    let first = input_dir.join("00274156_00000001_1.tuple_pbpb2024.evs");
    stream::write_all(
        &first,
        &[event(RUN, 1, [6, 6, 6, 6]), event(RUN, 2, [6, 4, 6, 6]), two_pvs],
    )?;

    let second = input_dir.join("00274156_00000002_1.tuple_pbpb2024.evs");
    stream::write_all(&second, &[event(RUN, 4, [7, 5, 8, 9]), event(RUN, 5, [5, 5, 5, 5])])?;

    stream::write_all(&input_dir.join("unrelated.evs"), &[event(RUN, 99, [9, 9, 9, 9])])?;
    fs::create_dir_all(input_dir.join("00274156_00000003_1.tuple_pbpb2024.evs"))?;

    let mut low_pt = candidate(RUN, 4);
    low_pt.proton.pt = 100.0;
    let candidates = dir.join("candidates.evs");
    stream::write_all(
        &candidates,
        &[
            candidate(RUN, 1),
            low_pt,
            candidate(RUN, 2),
            candidate(RUN + 1, 5),
            candidate(RUN, 5),
        ],
    )?;

    Ok(TestPaths {
        input_dir,
        event_files: vec![first, second],
        candidates,
    })
}
