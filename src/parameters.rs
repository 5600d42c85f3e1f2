//! Numeric configuration of a simulation run.
//!
//! Every field has a default, so a JSON parameters file only needs to name the values it
//! overrides. Unknown fields are rejected so that a misspelled parameter is not silently
//! ignored.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// How infected agents pass the disease on to their healthy neighbours.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransmissionMode {
    /// Every healthy neighbour within the safe distance of an infected or confirmed agent is
    /// infected with a probability governed by the transmission intensity.
    #[default]
    Probabilistic,
    /// Every infected agent infects exactly its nearest healthy neighbour within the safe
    /// distance. Confirmed agents do not transmit.
    Nearest,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// Number of agents.
    pub population: usize,
    /// Number of agents forced to be infected at round 0.
    pub initial_infected: usize,
    /// Standard deviation of the zero-mean Gaussian the initial positions are drawn from.
    pub initial_spread: f64,
    /// Number of bed columns in the hospital.
    pub hospital_width: usize,
    /// Number of bed rows in the hospital.
    pub hospital_height: usize,
    /// Standard deviation of an agent's displacement in one round.
    pub movement_width: f64,
    /// The probability an agent moves in a round is `P(Z < mobility_intention)` for a standard
    /// normal `Z`.
    pub mobility_intention: f64,
    /// The probability an infected agent infects a healthy neighbour is
    /// `P(Z <= transmission_intensity)` for a standard normal `Z`.
    pub transmission_intensity: f64,
    /// Added to `transmission_intensity` for confirmed agents.
    pub confirmed_intensity_bonus: f64,
    /// Inclusive lower bound of the per-agent latency threshold.
    pub latency_lower_bound: usize,
    /// Exclusive upper bound of the latency threshold. Infected agents whose dwell time exceeds
    /// it become confirmed regardless of their threshold.
    pub latency_period: usize,
    /// Rounds a confirmed agent waits before it is eligible for a hospital bed.
    pub hospital_response_time: usize,
    /// Neighbour search radius for transmission.
    pub safe_distance: f64,
    pub transmission_mode: TransmissionMode,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            population: 1000,
            initial_infected: 3,
            initial_spread: 100.0,
            hospital_width: 50,
            hospital_height: 20,
            movement_width: 5.0,
            mobility_intention: 2.0,
            transmission_intensity: 5.0,
            confirmed_intensity_bonus: 0.3,
            latency_lower_bound: 7,
            latency_period: 14,
            hospital_response_time: 0,
            safe_distance: 2.0,
            transmission_mode: TransmissionMode::Probabilistic,
        }
    }
}

fn invalid(message: String) -> SimError {
    SimError::InvalidParameter(message)
}

impl Parameters {
    /// Reads parameters from a JSON file and validates them.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` if the file cannot be opened, is not valid JSON for `Parameters`,
    /// or describes an invalid configuration (see [`Parameters::validate`]).
    pub fn from_json_file(path: &Path) -> Result<Parameters, SimError> {
        debug!("loading parameters from {}", path.display());
        let file = File::open(path)?;
        let parameters: Parameters = serde_json::from_reader(BufReader::new(file))?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Total number of hospital beds.
    #[must_use]
    pub fn hospital_capacity(&self) -> usize {
        self.hospital_width.saturating_mul(self.hospital_height)
    }

    /// Checks the configuration for contract violations that would make a run ill-defined.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` naming the first offending parameter.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.initial_infected > self.population {
            return Err(invalid(format!(
                "initial_infected ({}) exceeds population ({})",
                self.initial_infected, self.population
            )));
        }
        if self.latency_lower_bound >= self.latency_period {
            return Err(invalid(format!(
                "latency_lower_bound ({}) must be less than latency_period ({})",
                self.latency_lower_bound, self.latency_period
            )));
        }
        if self
            .hospital_width
            .checked_mul(self.hospital_height)
            .is_none()
        {
            return Err(invalid(format!(
                "hospital of {} x {} beds is too large",
                self.hospital_width, self.hospital_height
            )));
        }

        let reals = [
            ("initial_spread", self.initial_spread),
            ("movement_width", self.movement_width),
            ("mobility_intention", self.mobility_intention),
            ("transmission_intensity", self.transmission_intensity),
            ("confirmed_intensity_bonus", self.confirmed_intensity_bonus),
            ("safe_distance", self.safe_distance),
        ];
        if let Some((name, value)) = reals.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }
        for (name, value) in [
            ("initial_spread", self.initial_spread),
            ("movement_width", self.movement_width),
        ] {
            if value < 0.0 {
                return Err(invalid(format!("{name} must not be negative, got {value}")));
            }
        }
        if self.safe_distance <= 0.0 {
            return Err(invalid(format!(
                "safe_distance must be positive, got {}",
                self.safe_distance
            )));
        }
        Ok(())
    }
}
