// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event-level admissibility cuts.

use crate::config::EventCuts;
use crate::event::EventScalars;

/// Which event cuts an event failed. Every cut is evaluated, so an event
/// failing several of them shows all of them here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventCutFailures {
    pub n_pvs: bool,
    pub n_back_tracks: bool,
    pub pv_z: bool,
    pub n_velo_tracks: bool,
}

impl EventCutFailures {
    pub fn passed(&self) -> bool {
        !(self.n_pvs || self.n_back_tracks || self.pv_z || self.n_velo_tracks)
    }
}

#[derive(Clone, Debug, Default)]
pub struct EventGate {
    cuts: EventCuts,
}

impl EventGate {
    pub fn new(cuts: EventCuts) -> Self {
        Self { cuts }
    }

    pub fn evaluate(&self, ev: &EventScalars) -> EventCutFailures {
        let c = &self.cuts;
        EventCutFailures {
            n_pvs: ev.n_pvs != c.required_pvs,
            n_back_tracks: ev.n_back_tracks < c.min_back_tracks,
            // A missing vertex cannot sit inside the fiducial window.
            pv_z: ev.pv_z.map_or(true, |z| z < c.pv_z_min || z > c.pv_z_max),
            n_velo_tracks: ev.n_velo_tracks < c.min_velo_tracks,
        }
    }

    pub fn passes(&self, ev: &EventScalars) -> bool {
        self.evaluate(ev).passed()
    }
}
