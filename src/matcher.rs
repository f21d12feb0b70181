// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Candidate selection and event-plane matching.
//!
//! Every candidate is checked against all twelve cuts so the cut-flow
//! counters stay independent. Only candidates with no failed cut are looked
//! up in the index. After any number of candidates:
//! `total == failed_cuts + unmatched + saved`.

use crate::config::{CandidateCuts, EventCuts, PROGRESS_INTERVAL};
use crate::error::{KernelError, KernelResult};
use crate::gate::EventGate;
use crate::index::EventPlaneIndex;
use crate::record::{CandidateRecord, EventPlaneAngles, MatchedRecord};
use crate::sink::RecordSink;
use crate::types::key::EventKey;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cut {
    BackTracks = 0,
    VeloTracks,
    PvCount,
    PvZ,
    LambdaFdChi2,
    LambdaDira,
    ProtonIpChi2,
    PionIpChi2,
    ProtonPt,
    PionPt,
    ProtonGhostProb,
    PionGhostProb,
}

impl Cut {
    pub const COUNT: usize = 12;

    pub const ALL: [Cut; Cut::COUNT] = [
        Cut::BackTracks,
        Cut::VeloTracks,
        Cut::PvCount,
        Cut::PvZ,
        Cut::LambdaFdChi2,
        Cut::LambdaDira,
        Cut::ProtonIpChi2,
        Cut::PionIpChi2,
        Cut::ProtonPt,
        Cut::PionPt,
        Cut::ProtonGhostProb,
        Cut::PionGhostProb,
    ];

    /// Rejection condition as it reads in a cut-flow table.
    pub fn describe(self, event: &EventCuts, cand: &CandidateCuts) -> String {
        match self {
            Cut::BackTracks => format!("nBackTracks < {}", event.min_back_tracks),
            Cut::VeloTracks => format!("nVeloTracks < {}", event.min_velo_tracks),
            Cut::PvCount => format!("nPVs != {}", event.required_pvs),
            Cut::PvZ => format!("PVZ outside [{}, {}]", event.pv_z_min, event.pv_z_max),
            Cut::LambdaFdChi2 => format!("L0_BPVFDCHI2 < {}", cand.min_fd_chi2),
            Cut::LambdaDira => format!("L0_BPVDIRA < {}", cand.min_dira),
            Cut::ProtonIpChi2 => format!("p_BPVIPCHI2 < {}", cand.min_proton_ip_chi2),
            Cut::PionIpChi2 => format!("pi_BPVIPCHI2 < {}", cand.min_pion_ip_chi2),
            Cut::ProtonPt => format!("p_PT < {}", cand.min_proton_pt),
            Cut::PionPt => format!("pi_PT < {}", cand.min_pion_pt),
            Cut::ProtonGhostProb => format!("p_GHOSTPROB > {}", cand.max_proton_ghost_prob),
            Cut::PionGhostProb => format!("pi_GHOSTPROB > {}", cand.max_pion_ghost_prob),
        }
    }
}

/// Set of cuts one candidate failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CutMask(u16);

impl CutMask {
    pub fn set(&mut self, cut: Cut, failed: bool) {
        if failed {
            self.0 |= 1 << cut as u8;
        }
    }

    pub fn contains(&self, cut: Cut) -> bool {
        self.0 & (1 << cut as u8) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Cut> {
        Cut::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

/// Failure count per cut.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CutFlow([u64; Cut::COUNT]);

impl CutFlow {
    pub fn record(&mut self, mask: CutMask) {
        for cut in mask.iter() {
            self.0[cut as usize] += 1;
        }
    }

    pub fn get(&self, cut: Cut) -> u64 {
        self.0[cut as usize]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub total: u64,
    pub failed_cuts: u64,
    pub unmatched: u64,
    pub saved: u64,
    pub cut_flow: CutFlow,
    /// Run numbers of every candidate seen, selected or not.
    pub runs: BTreeSet<u32>,
}

impl MatchStats {
    pub fn is_balanced(&self) -> bool {
        self.total == self.failed_cuts + self.unmatched + self.saved
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatchOutcome {
    FailedCuts(CutMask),
    Unmatched(EventKey),
    Matched(MatchedRecord),
}

/// Random access to event-plane records by index position.
pub trait EventPlaneSource {
    fn fetch(&self, position: u64) -> Option<&EventPlaneAngles>;

    fn len(&self) -> usize;
}

impl EventPlaneSource for [EventPlaneAngles] {
    fn fetch(&self, position: u64) -> Option<&EventPlaneAngles> {
        usize::try_from(position).ok().and_then(|i| self.get(i))
    }

    fn len(&self) -> usize {
        <[EventPlaneAngles]>::len(self)
    }
}

impl EventPlaneSource for Vec<EventPlaneAngles> {
    fn fetch(&self, position: u64) -> Option<&EventPlaneAngles> {
        self.as_slice().fetch(position)
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

pub struct CandidateMatcher<'a, S: EventPlaneSource + ?Sized> {
    gate: EventGate,
    cuts: CandidateCuts,
    index: &'a EventPlaneIndex,
    source: &'a S,
    stats: MatchStats,
}

impl<'a, S: EventPlaneSource + ?Sized> CandidateMatcher<'a, S> {
    pub fn new(event: EventCuts, cuts: CandidateCuts, index: &'a EventPlaneIndex, source: &'a S) -> Self {
        Self {
            gate: EventGate::new(event),
            cuts,
            index,
            source,
            stats: MatchStats::default(),
        }
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn into_stats(self) -> MatchStats {
        self.stats
    }

    pub fn evaluate(&self, cand: &CandidateRecord) -> CutMask {
        let ev = self.gate.evaluate(&cand.scalars());
        let c = &self.cuts;
        let mut mask = CutMask::default();
        mask.set(Cut::BackTracks, ev.n_back_tracks);
        mask.set(Cut::VeloTracks, ev.n_velo_tracks);
        mask.set(Cut::PvCount, ev.n_pvs);
        mask.set(Cut::PvZ, ev.pv_z);
        mask.set(Cut::LambdaFdChi2, cand.lambda.fd_chi2 < c.min_fd_chi2);
        mask.set(Cut::LambdaDira, cand.lambda.dira < c.min_dira);
        mask.set(Cut::ProtonIpChi2, cand.proton.ip_chi2 < c.min_proton_ip_chi2);
        mask.set(Cut::PionIpChi2, cand.pion.ip_chi2 < c.min_pion_ip_chi2);
        mask.set(Cut::ProtonPt, cand.proton.pt < c.min_proton_pt);
        mask.set(Cut::PionPt, cand.pion.pt < c.min_pion_pt);
        mask.set(Cut::ProtonGhostProb, cand.proton.ghost_prob > c.max_proton_ghost_prob);
        mask.set(Cut::PionGhostProb, cand.pion.ghost_prob > c.max_pion_ghost_prob);
        mask
    }

    pub fn process(&mut self, cand: &CandidateRecord) -> KernelResult<MatchOutcome> {
        self.stats.total += 1;
        self.stats.runs.insert(cand.key.run);

        let mask = self.evaluate(cand);
        if !mask.is_empty() {
            self.stats.cut_flow.record(mask);
            self.stats.failed_cuts += 1;
            return Ok(MatchOutcome::FailedCuts(mask));
        }

        let Some(position) = self.index.lookup_key(cand.key) else {
            tracing::debug!(
                run = cand.key.run,
                event = cand.key.event,
                n_back_tracks = cand.n_back_tracks,
                n_velo_tracks = cand.n_velo_tracks,
                "no event-plane match"
            );
            self.stats.unmatched += 1;
            return Ok(MatchOutcome::Unmatched(cand.key));
        };

        let ep = self.source.fetch(position).ok_or(KernelError::PositionOutOfRange {
            position,
            len: self.source.len(),
        })?;
        self.stats.saved += 1;
        Ok(MatchOutcome::Matched(MatchedRecord::merge(cand, ep)))
    }

    /// Matches a whole candidate stream, appending joined records to `sink`.
    pub fn run<I, E, K>(&mut self, candidates: I, sink: &mut K) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<CandidateRecord, E>>,
        K: RecordSink<MatchedRecord>,
        E: From<K::Error> + From<KernelError>,
    {
        for cand in candidates {
            let cand = cand?;
            if self.stats.total % PROGRESS_INTERVAL == 0 {
                tracing::info!(processed = self.stats.total, saved = self.stats.saved, "matching candidates");
            }
            if let MatchOutcome::Matched(record) = self.process(&cand)? {
                sink.append(record)?;
            }
        }
        Ok(())
    }
}
