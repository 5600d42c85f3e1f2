//! Proximity-based transmission.
//!
//! Sources are the agents that are infected or confirmed when the step starts; an agent
//! infected during the step does not transmit until the next round. Each source scans its
//! neighbours nearest-first and stops at the first one at or beyond the safe distance.

use log::trace;
use rand_distr::StandardNormal;

use crate::define_rng;
use crate::parameters::TransmissionMode;
use crate::population::{DiseaseState, Population};
use crate::spatial::SpatialGrid;

define_rng!(TransmissionRng);

impl Population {
    pub(crate) fn affect(&mut self) {
        let safe_distance = self.parameters.safe_distance;
        let grid = SpatialGrid::build(&self.positions, safe_distance);
        let infected = self.agents_in(DiseaseState::Infected);
        let confirmed = self.agents_in(DiseaseState::Confirmed);

        match self.parameters.transmission_mode {
            TransmissionMode::Probabilistic => {
                let intensity = self.parameters.transmission_intensity;
                for source in infected {
                    self.infect_possible(&grid, source, intensity);
                }
                let intensity = intensity + self.parameters.confirmed_intensity_bonus;
                for source in confirmed {
                    self.infect_possible(&grid, source, intensity);
                }
            }
            TransmissionMode::Nearest => {
                for source in infected {
                    self.infect_nearest(&grid, source);
                }
            }
        }
    }

    /// Infects each healthy neighbour of `source` within the safe distance when a standard
    /// normal draw does not exceed `intensity`.
    fn infect_possible(&mut self, grid: &SpatialGrid, source: usize, intensity: f64) {
        let safe_distance = self.parameters.safe_distance;
        let center = self.positions[source];
        for neighbor in grid.nearest_first(&self.positions, &center) {
            if neighbor.distance >= safe_distance {
                break;
            }
            if self.states[neighbor.index] != DiseaseState::Healthy {
                continue;
            }
            let draw: f64 = self.rng.sample_distr(TransmissionRng, StandardNormal);
            if draw > intensity {
                continue;
            }
            trace!("agent {source} infects agent {}", neighbor.index);
            self.set_state(neighbor.index, DiseaseState::Infected);
        }
    }

    /// Infects the nearest healthy neighbour of `source` within the safe distance, if any.
    fn infect_nearest(&mut self, grid: &SpatialGrid, source: usize) {
        let safe_distance = self.parameters.safe_distance;
        let center = self.positions[source];
        for neighbor in grid.nearest_first(&self.positions, &center) {
            if neighbor.distance >= safe_distance {
                break;
            }
            if self.states[neighbor.index] != DiseaseState::Healthy {
                continue;
            }
            trace!("agent {source} infects nearest agent {}", neighbor.index);
            self.set_state(neighbor.index, DiseaseState::Infected);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use crate::parameters::{Parameters, TransmissionMode};
    use crate::population::test_support::{at, staged};
    use crate::population::DiseaseState::{Confirmed, Healthy, Infected, Isolated};

    fn with_intensity(transmission_intensity: f64) -> Parameters {
        Parameters {
            transmission_intensity,
            ..Parameters::default()
        }
    }

    #[test]
    fn saturating_intensity_infects_neighbour() {
        let mut population = staged(
            with_intensity(10.0),
            &[(at(0.0, 0.0), Infected), (at(1.0, 0.0), Healthy)],
        );
        population.round = 4;
        population.affect();
        assert_eq!(population.state(1), Infected);
        assert_eq!(population.state_entered_at()[1], 4);
    }

    #[test]
    fn negligible_intensity_never_infects() {
        let mut population = staged(
            Parameters {
                transmission_intensity: -10.0,
                confirmed_intensity_bonus: 0.0,
                ..Parameters::default()
            },
            &[
                (at(0.0, 0.0), Infected),
                (at(0.5, 0.0), Confirmed),
                (at(1.0, 0.0), Healthy),
            ],
        );
        for _ in 0..100 {
            population.affect();
        }
        assert_eq!(population.state(2), Healthy);
    }

    #[test]
    fn agents_beyond_safe_distance_are_safe() {
        let mut population = staged(
            with_intensity(10.0),
            &[
                (at(0.0, 0.0), Infected),
                (at(2.0, 0.0), Healthy),
                (at(0.0, -2.5), Healthy),
            ],
        );
        for _ in 0..10 {
            population.affect();
        }
        assert_eq!(population.state(1), Healthy);
        assert_eq!(population.state(2), Healthy);
    }

    #[test]
    fn no_sources_no_infection() {
        let agents: Vec<_> = (0..50)
            .map(|i| (at(0.1 * f64::from(i), 0.0), Healthy))
            .collect();
        let mut population = staged(with_intensity(10.0), &agents);
        for _ in 0..20 {
            population.affect();
        }
        assert_eq!(population.count(Healthy), 50);
    }

    #[test]
    fn newly_infected_do_not_transmit_in_the_same_round() {
        let mut population = staged(
            with_intensity(10.0),
            &[
                (at(0.0, 0.0), Infected),
                (at(1.5, 0.0), Healthy),
                (at(3.0, 0.0), Healthy),
            ],
        );
        population.affect();
        assert_eq!(population.state(1), Infected);
        assert_eq!(population.state(2), Healthy);

        // Next round the chain continues.
        population.affect();
        assert_eq!(population.state(2), Infected);
    }

    #[test]
    fn non_healthy_neighbours_are_untouched() {
        let mut population = staged(
            with_intensity(10.0),
            &[
                (at(0.0, 0.0), Infected),
                (at(0.5, 0.0), Confirmed),
                (at(1.0, 0.0), Isolated),
            ],
        );
        population.round = 3;
        population.affect();
        assert_eq!(population.state(1), Confirmed);
        assert_eq!(population.state(2), Isolated);
        assert_eq!(population.state_entered_at(), &[0, 0, 0]);
    }

    #[test]
    fn confirmed_agents_transmit() {
        let mut population = staged(
            with_intensity(10.0),
            &[(at(0.0, 0.0), Confirmed), (at(0.0, 1.0), Healthy)],
        );
        population.affect();
        assert_eq!(population.state(1), Infected);
    }

    #[test]
    fn even_odds_at_zero_intensity() {
        // One source surrounded by healthy agents on a tight ring, all within the safe distance.
        let ring = 2000;
        let mut agents = vec![(at(0.0, 0.0), Infected)];
        agents.extend((0..ring).map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(ring);
            (at(angle.cos(), angle.sin()), Healthy)
        }));
        let mut population = staged(
            Parameters {
                transmission_intensity: 0.0,
                ..Parameters::default()
            },
            &agents,
        );
        population.affect();
        let rate = population.count(Infected) as f64 / f64::from(ring + 1);
        assert_approx_eq!(rate, 0.5, 0.05);
    }

    #[test]
    fn nearest_mode_infects_only_the_nearest_healthy_agent() {
        let parameters = Parameters {
            transmission_mode: TransmissionMode::Nearest,
            ..Parameters::default()
        };
        let mut population = staged(
            parameters,
            &[
                (at(0.0, 0.0), Infected),
                (at(0.3, 0.0), Confirmed),
                (at(0.6, 0.0), Healthy),
                (at(1.0, 0.0), Healthy),
            ],
        );
        population.affect();
        assert_eq!(population.state(2), Infected);
        assert_eq!(population.state(3), Healthy);
    }

    #[test]
    fn nearest_mode_ignores_confirmed_sources() {
        let parameters = Parameters {
            transmission_mode: TransmissionMode::Nearest,
            ..Parameters::default()
        };
        let mut population = staged(
            parameters,
            &[(at(0.0, 0.0), Confirmed), (at(0.5, 0.0), Healthy)],
        );
        population.affect();
        assert_eq!(population.state(1), Healthy);
    }
}
