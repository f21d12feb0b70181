// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event-plane construction.
//!
//! Each event moves through: event gate -> track loop (quality cut, flip,
//! classify, accumulate) -> multiplicity gate -> emit or discard.
//! Discarded events are counted, never reported as errors.

use crate::config::{BuilderConfig, MultiplicityGate, TallyMode};
use crate::error::KernelResult;
use crate::event::RawEvent;
use crate::gate::{EventCutFailures, EventGate};
use crate::harmonics::HarmonicSums;
use crate::record::{EventPlaneRecord, GlobalMultiplicity};
use crate::region::{Region, RegionClassifier};
use crate::sink::RecordSink;

/// Regions that ended the track loop below the minimum multiplicity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MultiplicityShortfall {
    pub forward: bool,
    pub backward: bool,
    pub forward_bins: [bool; 3],
}

impl MultiplicityShortfall {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.forward_bins.iter().any(|b| *b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    EventGate(EventCutFailures),
    Multiplicity(MultiplicityShortfall),
}

#[derive(Clone, Debug, PartialEq)]
pub enum BuildOutcome {
    Emitted(EventPlaneRecord),
    Discarded(Rejection),
}

/// Per-cut tallies of the event gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventCutCounts {
    pub n_pvs: u64,
    pub n_back_tracks: u64,
    pub pv_z: u64,
    pub n_velo_tracks: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub events: u64,
    pub failed_event_gate: u64,
    pub event_cuts: EventCutCounts,
    pub failed_multiplicity: u64,
    pub emitted: u64,
}

impl BuildStats {
    pub fn record(&mut self, outcome: &BuildOutcome) {
        self.events += 1;
        match outcome {
            BuildOutcome::Emitted(_) => self.emitted += 1,
            BuildOutcome::Discarded(Rejection::Multiplicity(_)) => self.failed_multiplicity += 1,
            BuildOutcome::Discarded(Rejection::EventGate(f)) => {
                self.failed_event_gate += 1;
                self.event_cuts.n_pvs += u64::from(f.n_pvs);
                self.event_cuts.n_back_tracks += u64::from(f.n_back_tracks);
                self.event_cuts.pv_z += u64::from(f.pv_z);
                self.event_cuts.n_velo_tracks += u64::from(f.n_velo_tracks);
            }
        }
    }

    pub fn merge(&mut self, other: &BuildStats) {
        self.events += other.events;
        self.failed_event_gate += other.failed_event_gate;
        self.event_cuts.n_pvs += other.event_cuts.n_pvs;
        self.event_cuts.n_back_tracks += other.event_cuts.n_back_tracks;
        self.event_cuts.pv_z += other.event_cuts.pv_z;
        self.event_cuts.n_velo_tracks += other.event_cuts.n_velo_tracks;
        self.failed_multiplicity += other.failed_multiplicity;
        self.emitted += other.emitted;
    }
}

#[derive(Clone, Debug)]
pub struct EventPlaneBuilder {
    gate: EventGate,
    classifier: RegionClassifier,
    multiplicity: MultiplicityGate,
    sums: HarmonicSums,
}

impl EventPlaneBuilder {
    pub fn new(cfg: &BuilderConfig) -> KernelResult<Self> {
        Ok(Self {
            gate: EventGate::new(cfg.event.clone()),
            classifier: RegionClassifier::new(&cfg.track, &cfg.regions)?,
            multiplicity: cfg.multiplicity.clone(),
            sums: HarmonicSums::new(),
        })
    }

    /// Sums of the most recently processed event that reached the track loop.
    pub fn sums(&self) -> &HarmonicSums {
        &self.sums
    }

    pub fn process(&mut self, event: &RawEvent) -> BuildOutcome {
        let failures = self.gate.evaluate(&event.scalars());
        if !failures.passed() {
            return BuildOutcome::Discarded(Rejection::EventGate(failures));
        }

        self.sums.reset();
        let mut flagged_forward = 0u32;
        let mut flagged_backward = 0u32;

        for mut track in event.tracks() {
            if !self.classifier.accepts(&track) {
                continue;
            }
            track.orient();
            if track.is_backward {
                flagged_backward += 1;
            } else {
                flagged_forward += 1;
            }
            for region in self.classifier.classify(track.eta).iter() {
                self.sums.accumulate(region, track.eta, track.phi);
            }
        }

        let counts = &self.sums.counts;
        let mut region_multiplicity = EventPlaneRecord::region_multiplicity(counts);
        let (forward, backward) = match self.multiplicity.tally {
            TallyMode::Region => (counts.forward_inclusive, counts.backward),
            TallyMode::Legacy => {
                // Stored backward multiplicity is the flagged-track tally too.
                region_multiplicity[3] = flagged_backward;
                (flagged_forward + counts.forward_inclusive, flagged_backward)
            }
        };
        let min = self.multiplicity.min_tracks;
        let shortfall = MultiplicityShortfall {
            forward: forward < min,
            backward: backward < min,
            forward_bins: [Region::Forward1, Region::Forward2, Region::Forward3].map(|r| counts.get(r) < min),
        };
        if shortfall.any() {
            return BuildOutcome::Discarded(Rejection::Multiplicity(shortfall));
        }

        BuildOutcome::Emitted(EventPlaneRecord {
            key: event.key(),
            gps_time: event.gps_time,
            pv: event.primary_vertex(),
            multiplicity: GlobalMultiplicity {
                n_back_tracks: event.n_back_tracks,
                n_velo_clusters: event.n_velo_clusters,
                n_velo_tracks: event.n_velo_tracks,
                n_ecal_clusters: event.n_ecal_clusters,
                ecal_e_tot: event.ecal_e_tot,
                n_long_tracks: event.n_long_tracks,
                n_vp_clusters: event.n_vp_clusters,
            },
            q: self.sums.unweighted,
            q_eta: self.sums.eta_weighted,
            region_multiplicity,
        })
    }

    /// Processes a whole event stream, appending surviving records to `sink`.
    /// Stops at the first read or write error.
    pub fn run<I, E, S>(&mut self, events: I, sink: &mut S) -> Result<BuildStats, E>
    where
        I: IntoIterator<Item = Result<RawEvent, E>>,
        S: RecordSink<EventPlaneRecord>,
        E: From<S::Error>,
    {
        let mut stats = BuildStats::default();
        for event in events {
            let outcome = self.process(&event?);
            stats.record(&outcome);
            if let BuildOutcome::Emitted(record) = outcome {
                sink.append(record)?;
            }
        }
        tracing::debug!(
            events = stats.events,
            emitted = stats.emitted,
            failed_event_gate = stats.failed_event_gate,
            failed_multiplicity = stats.failed_multiplicity,
            "event stream processed"
        );
        Ok(stats)
    }
}
