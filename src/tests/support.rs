// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Synthetic events and candidates shared by the kernel tests.

use crate::event::{RawEvent, Track};
use crate::record::{CandidateRecord, Daughter, Lambda};
use crate::types::key::EventKey;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Event scalars that pass every default event cut.
pub fn admissible_event(run: u32, event: u64) -> RawEvent {
    RawEvent {
        gps_time: 1_700_000_000,
        event_number: event,
        run_number: run,
        pv_x: vec![0.1],
        pv_y: vec![-0.2],
        pv_z: vec![12.5],
        n_back_tracks: 40,
        n_pvs: 1,
        n_velo_clusters: 900,
        n_velo_tracks: 120,
        n_ecal_clusters: 30,
        ecal_e_tot: 5000,
        n_long_tracks: 60,
        n_vp_clusters: 1500,
        ..Default::default()
    }
}

pub fn push_tracks(event: &mut RawEvent, n: usize, eta: f64, is_backward: bool) {
    for i in 0..n {
        event.tracks.push(&Track::new(eta, 0.3 * i as f64, 0.5, is_backward));
    }
}

/// Event with `counts[0..3]` tracks in forward bins 1..3 and `counts[3]`
/// backward-flagged tracks landing in the backward region.
pub fn event_with_counts(run: u32, event: u64, counts: [usize; 4]) -> RawEvent {
    let mut ev = admissible_event(run, event);
    push_tracks(&mut ev, counts[0], 1.5, false);
    push_tracks(&mut ev, counts[1], 3.0, false);
    push_tracks(&mut ev, counts[2], 5.0, false);
    push_tracks(&mut ev, counts[3], 2.0, true);
    ev
}

/// Candidate that passes every default cut.
pub fn good_candidate(run: u32, event: u64) -> CandidateRecord {
    CandidateRecord {
        key: EventKey::new(run, event),
        n_back_tracks: 40,
        n_velo_tracks: 120,
        n_pvs: 1,
        n_ecal_clusters: 30,
        pv_x: vec![0.1],
        pv_y: vec![-0.2],
        pv_z: vec![12.5],
        lambda: Lambda {
            id: 3122,
            mass: 1115.7,
            pt: 1200.0,
            fd_chi2: 400.0,
            dira: 0.99995,
            ..Default::default()
        },
        proton: Daughter {
            id: 2212,
            mass: 938.3,
            pt: 900.0,
            ip_chi2: 60.0,
            ghost_prob: 0.01,
            ..Default::default()
        },
        pion: Daughter {
            id: -211,
            mass: 139.6,
            pt: 300.0,
            ip_chi2: 80.0,
            ghost_prob: 0.02,
            ..Default::default()
        },
    }
}

/// Counts WARN events seen while it is the thread's subscriber.
#[derive(Clone, Default)]
pub struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Runs `f` with this counter installed for the current thread.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
