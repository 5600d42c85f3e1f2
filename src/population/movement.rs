use rand_distr::StandardNormal;

use crate::define_rng;
use crate::population::{DiseaseState, Population};

define_rng!(MovementRng);

impl Population {
    /// Every agent draws a Gaussian displacement and a mobility switch. The displacement is
    /// applied unless the agent is isolated or its switch is off.
    pub(crate) fn move_agents(&mut self) {
        let displacement = self.displacement;
        let intention = self.parameters.mobility_intention;

        for agent in 0..self.positions.len() {
            let dx: f64 = self.rng.sample_distr(MovementRng, displacement);
            let dy: f64 = self.rng.sample_distr(MovementRng, displacement);
            let switch: f64 = self.rng.sample_distr(MovementRng, StandardNormal);

            if self.states[agent] == DiseaseState::Isolated || switch >= intention {
                continue;
            }
            let position = &mut self.positions[agent];
            position.x += dx;
            position.y += dy;
        }
    }
}
