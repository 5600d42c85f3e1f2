//! The population of agents and the per-round state-transition engine.
//!
//! A [`Population`] owns every agent's position, disease state and the round at which that
//! state began. [`Population::update`] advances the simulation by exactly one round, in a
//! fixed order:
//!
//! 1. disease progression and hospital admission (`progression`)
//! 2. transmission to healthy neighbours (`transmission`)
//! 3. movement of agents that are free to move (`movement`)
//! 4. the round counter is incremented
//!
//! Each step sees the state as mutated by the step before it. The read accessors never mutate
//! anything, so calling them repeatedly between two updates yields identical results.

mod movement;
mod progression;
mod transmission;

use std::fmt::{self, Display};

use log::{debug, info, trace};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::define_rng;
use crate::error::SimError;
use crate::hospital::Hospital;
use crate::parameters::Parameters;
use crate::random::{sample_multiple_from_known_length, RandomStreams};

define_rng!(PlacementRng);
define_rng!(SeedingRng);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The disease state of an agent. Agents only ever move forward through these states.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DiseaseState {
    Healthy = 0,
    Infected = 1,
    Confirmed = 2,
    Isolated = 3,
}

impl DiseaseState {
    pub const ALL: [DiseaseState; 4] = [
        DiseaseState::Healthy,
        DiseaseState::Infected,
        DiseaseState::Confirmed,
        DiseaseState::Isolated,
    ];
}

/// Number of agents in each state at a given round.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateCounts {
    pub round: usize,
    pub healthy: usize,
    pub infected: usize,
    pub confirmed: usize,
    pub isolated: usize,
}

impl StateCounts {
    #[must_use]
    pub fn get(&self, state: DiseaseState) -> usize {
        match state {
            DiseaseState::Healthy => self.healthy,
            DiseaseState::Infected => self.infected,
            DiseaseState::Confirmed => self.confirmed,
            DiseaseState::Isolated => self.isolated,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.healthy + self.infected + self.confirmed + self.isolated
    }
}

impl Display for StateCounts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Round: {}, Healthy: {}, Infected: {}, Confirmed: {}, Isolated: {}",
            self.round, self.healthy, self.infected, self.confirmed, self.isolated
        )
    }
}

pub struct Population {
    parameters: Parameters,
    hospital: Hospital,
    displacement: Normal<f64>,
    positions: Vec<Position>,
    states: Vec<DiseaseState>,
    state_entered_at: Vec<usize>,
    round: usize,
    rng: RandomStreams,
}

impl Population {
    /// Places `parameters.population` agents around the origin and infects
    /// `parameters.initial_infected` distinct agents at round 0.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` if the parameters fail validation.
    pub fn new(parameters: Parameters, seed: u64) -> Result<Self, SimError> {
        parameters.validate()?;
        info!(
            "initializing population of {} agents ({} infected, {} hospital beds) with seed {}",
            parameters.population,
            parameters.initial_infected,
            parameters.hospital_capacity(),
            seed
        );

        let hospital = Hospital::new(parameters.hospital_width, parameters.hospital_height);
        let placement = Normal::new(0.0, parameters.initial_spread)?;
        let displacement = Normal::new(0.0, parameters.movement_width)?;

        let mut rng = RandomStreams::new(seed);
        let positions: Vec<Position> = rng.sample(PlacementRng, |rng| {
            (0..parameters.population)
                .map(|_| Position {
                    x: placement.sample(rng),
                    y: placement.sample(rng),
                })
                .collect()
        });

        let count = parameters.population;
        let mut population = Population {
            parameters,
            hospital,
            displacement,
            positions,
            states: vec![DiseaseState::Healthy; count],
            state_entered_at: vec![0; count],
            round: 0,
            rng,
        };
        population.reset();
        Ok(population)
    }

    /// Restarts the run from round 0: every agent becomes healthy and a fresh set of
    /// `initial_infected` agents is infected. Positions are kept.
    pub fn reset(&mut self) {
        debug!("resetting population");
        self.round = 0;
        self.states.fill(DiseaseState::Healthy);
        self.state_entered_at.fill(0);

        let requested = self.parameters.initial_infected;
        let count = self.states.len();
        let chosen = self.rng.sample(SeedingRng, |rng| {
            sample_multiple_from_known_length(rng, 0..count, requested)
        });
        for agent in chosen {
            self.set_state(agent, DiseaseState::Infected);
        }
    }

    /// Advances the simulation by one round.
    pub fn update(&mut self) {
        self.change_state();
        self.affect();
        self.move_agents();
        self.round += 1;
        debug!("{}", self.counts());
    }

    /// Moves `agent` into `state` and records the current round as the moment it entered it.
    /// This is the only place either field is written after construction.
    fn set_state(&mut self, agent: usize, state: DiseaseState) {
        trace!(
            "agent {agent}: {:?} -> {state:?} at round {}",
            self.states[agent],
            self.round
        );
        self.states[agent] = state;
        self.state_entered_at[agent] = self.round;
    }

    fn agents_in(&self, state: DiseaseState) -> Vec<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|&(_, s)| *s == state)
            .map(|(agent, _)| agent)
            .collect()
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    #[must_use]
    pub fn hospital(&self) -> &Hospital {
        &self.hospital
    }

    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[must_use]
    pub fn states(&self) -> &[DiseaseState] {
        &self.states
    }

    #[must_use]
    pub fn state_entered_at(&self) -> &[usize] {
        &self.state_entered_at
    }

    #[must_use]
    pub fn position(&self, agent: usize) -> Position {
        self.positions[agent]
    }

    #[must_use]
    pub fn state(&self, agent: usize) -> DiseaseState {
        self.states[agent]
    }

    /// Rounds elapsed since `agent` entered its current state.
    #[must_use]
    pub fn dwell_time(&self, agent: usize) -> usize {
        self.round - self.state_entered_at[agent]
    }

    /// Positions of every agent in `state`, in agent order. Empty when no agent is in `state`.
    #[must_use]
    pub fn positions_in(&self, state: DiseaseState) -> Vec<Position> {
        self.positions
            .iter()
            .zip(&self.states)
            .filter(|(_, s)| **s == state)
            .map(|(position, _)| *position)
            .collect()
    }

    #[must_use]
    pub fn healthy(&self) -> Vec<Position> {
        self.positions_in(DiseaseState::Healthy)
    }

    #[must_use]
    pub fn infected(&self) -> Vec<Position> {
        self.positions_in(DiseaseState::Infected)
    }

    #[must_use]
    pub fn confirmed(&self) -> Vec<Position> {
        self.positions_in(DiseaseState::Confirmed)
    }

    #[must_use]
    pub fn isolated(&self) -> Vec<Position> {
        self.positions_in(DiseaseState::Isolated)
    }

    #[must_use]
    pub fn count(&self, state: DiseaseState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    #[must_use]
    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts {
            round: self.round,
            ..StateCounts::default()
        };
        for state in &self.states {
            match state {
                DiseaseState::Healthy => counts.healthy += 1,
                DiseaseState::Infected => counts.infected += 1,
                DiseaseState::Confirmed => counts.confirmed += 1,
                DiseaseState::Isolated => counts.isolated += 1,
            }
        }
        counts
    }

    /// The beds occupied by isolated agents: bed `i` holds the `i`-th isolated agent.
    #[must_use]
    pub fn isolated_bed_positions(&self) -> Vec<Position> {
        let occupied = self.count(DiseaseState::Isolated);
        self.hospital.first_beds(occupied.min(self.hospital.capacity()))
    }

    /// True once no healthy agent is left.
    #[must_use]
    pub fn is_over(&self) -> bool {
        !self.states.contains(&DiseaseState::Healthy)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{DiseaseState, Population, Position};
    use crate::parameters::Parameters;

    /// A population with no initial infections whose agents are placed and staged by the test.
    pub(crate) fn staged(parameters: Parameters, agents: &[(Position, DiseaseState)]) -> Population {
        let parameters = Parameters {
            population: agents.len(),
            initial_infected: 0,
            ..parameters
        };
        let mut population = Population::new(parameters, 42).unwrap();
        for (agent, (position, state)) in agents.iter().enumerate() {
            population.positions[agent] = *position;
            population.set_state(agent, *state);
        }
        population
    }

    pub(crate) fn at(x: f64, y: f64) -> Position {
        Position { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{at, staged};
    use super::*;

    fn small(population: usize, initial_infected: usize) -> Parameters {
        Parameters {
            population,
            initial_infected,
            ..Parameters::default()
        }
    }

    #[test]
    fn construction_infects_requested_count() {
        let population = Population::new(small(200, 17), 1).unwrap();
        assert_eq!(population.round(), 0);
        assert_eq!(population.count(DiseaseState::Infected), 17);
        assert_eq!(population.count(DiseaseState::Healthy), 183);
        assert!(population.state_entered_at().iter().all(|&t| t == 0));
    }

    #[test]
    fn whole_population_can_start_infected() {
        let population = Population::new(small(25, 25), 3).unwrap();
        assert_eq!(population.count(DiseaseState::Infected), 25);
        assert!(population.is_over());
    }

    #[test]
    fn too_many_initial_infections_fail_fast() {
        let result = Population::new(small(5, 6), 3);
        assert!(matches!(result, Err(SimError::InvalidParameter(_))));
    }

    #[test]
    fn empty_population() {
        let population = Population::new(small(0, 0), 3).unwrap();
        assert_eq!(population.agent_count(), 0);
        assert!(population.healthy().is_empty());
        assert!(population.isolated().is_empty());
        assert!(population.isolated_bed_positions().is_empty());
        assert_eq!(population.counts().total(), 0);
    }

    #[test]
    fn accessors_are_idempotent() {
        let mut population = Population::new(small(300, 10), 5).unwrap();
        for _ in 0..5 {
            population.update();
        }
        for state in DiseaseState::ALL {
            assert_eq!(population.positions_in(state), population.positions_in(state));
        }
        assert_eq!(population.counts(), population.counts());
    }

    #[test]
    fn filtered_views_partition_the_population() {
        let mut population = Population::new(small(400, 8), 11).unwrap();
        for _ in 0..30 {
            population.update();
            let counts = population.counts();
            assert_eq!(counts.total(), population.agent_count());
            for state in DiseaseState::ALL {
                assert_eq!(population.positions_in(state).len(), counts.get(state));
            }
        }
    }

    #[test]
    fn update_increments_round_once() {
        let mut population = Population::new(small(10, 1), 5).unwrap();
        population.update();
        population.update();
        assert_eq!(population.round(), 2);
        assert_eq!(population.counts().round, 2);
    }

    #[test]
    fn reset_returns_to_round_zero_and_keeps_positions() {
        let mut population = Population::new(small(100, 4), 9).unwrap();
        for _ in 0..10 {
            population.update();
        }
        let positions = population.positions().to_vec();
        population.reset();
        assert_eq!(population.round(), 0);
        assert_eq!(population.positions(), positions.as_slice());
        assert_eq!(population.count(DiseaseState::Infected), 4);
        assert_eq!(population.count(DiseaseState::Healthy), 96);
        assert!(population.state_entered_at().iter().all(|&t| t == 0));
    }

    #[test]
    fn isolated_agents_occupy_the_first_beds() {
        let parameters = Parameters {
            hospital_width: 2,
            hospital_height: 2,
            ..Parameters::default()
        };
        let population = staged(
            parameters,
            &[
                (at(0.0, 0.0), DiseaseState::Isolated),
                (at(10.0, 0.0), DiseaseState::Healthy),
                (at(20.0, 0.0), DiseaseState::Isolated),
            ],
        );
        assert_eq!(
            population.isolated_bed_positions(),
            vec![at(400.0, -200.0), at(401.0, -200.0)]
        );
    }

    #[test]
    fn set_state_records_round() {
        let mut population = staged(
            Parameters::default(),
            &[(at(0.0, 0.0), DiseaseState::Healthy)],
        );
        population.round = 6;
        population.set_state(0, DiseaseState::Infected);
        assert_eq!(population.state(0), DiseaseState::Infected);
        assert_eq!(population.state_entered_at()[0], 6);
        assert_eq!(population.dwell_time(0), 0);
        population.round = 9;
        assert_eq!(population.dwell_time(0), 3);
    }

    #[test]
    fn summary_line() {
        let counts = StateCounts {
            round: 3,
            healthy: 10,
            infected: 2,
            confirmed: 1,
            isolated: 0,
        };
        assert_eq!(
            counts.to_string(),
            "Round: 3, Healthy: 10, Infected: 2, Confirmed: 1, Isolated: 0"
        );
    }
}
