//! Disease progression and hospital admission.
//!
//! Infected agents become confirmed once their latency elapses, and confirmed agents are
//! admitted to the hospital while beds are free. Both checks read the dwell times as they were
//! at the start of the round. For an agent confirmed in this round that is the time it spent
//! infected, so it is admitted in the same round whenever that time is at least the hospital
//! response time.

use log::debug;

use crate::define_rng;
use crate::population::{DiseaseState, Population};

define_rng!(ProgressionRng);

impl Population {
    pub(crate) fn change_state(&mut self) {
        let round = self.round;
        let dwell: Vec<usize> = self
            .state_entered_at
            .iter()
            .map(|&entered| round - entered)
            .collect();

        self.confirm_infected(&dwell);
        self.admit_confirmed(&dwell);
    }

    /// An infected agent draws its own threshold `d` in `[latency_lower_bound, latency_period)`
    /// each round and is confirmed when its dwell time equals `d` or exceeds `latency_period`.
    /// The exact match means an agent can overshoot its threshold and wait for the overrun.
    fn confirm_infected(&mut self, dwell: &[usize]) {
        let lower = self.parameters.latency_lower_bound;
        let period = self.parameters.latency_period;

        for agent in self.agents_in(DiseaseState::Infected) {
            let threshold: usize = self.rng.sample_range(ProgressionRng, lower..period);
            let dt = dwell[agent];
            if dt == threshold || dt > period {
                self.set_state(agent, DiseaseState::Confirmed);
            }
        }
    }

    /// Admits eligible confirmed agents in index order until the hospital is full. Agents that
    /// do not get a bed stay confirmed and are considered again next round.
    fn admit_confirmed(&mut self, dwell: &[usize]) {
        let capacity = self.hospital.capacity();
        let occupied = self.count(DiseaseState::Isolated);
        if occupied >= capacity {
            return;
        }
        let empty = capacity - occupied;

        let response_time = self.parameters.hospital_response_time;
        let eligible: Vec<usize> = self
            .agents_in(DiseaseState::Confirmed)
            .into_iter()
            .filter(|&agent| dwell[agent] >= response_time)
            .collect();
        if eligible.len() > empty {
            debug!(
                "round {}: {} confirmed agents eligible for {} free beds",
                self.round,
                eligible.len(),
                empty
            );
        }

        for agent in eligible.into_iter().take(empty) {
            self.set_state(agent, DiseaseState::Isolated);
        }
    }
}
