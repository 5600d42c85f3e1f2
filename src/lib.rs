//! An agent-based simulation of disease spread with capacity-limited hospital isolation
//!
//! A fixed population of agents moves around a plane. Each agent is in one of four disease
//! states: healthy, infected, confirmed or isolated. Every round, in order:
//! * infected agents whose latency has elapsed become confirmed, and confirmed agents are
//!   admitted to the hospital while it has free beds
//! * infected and confirmed agents may infect healthy agents within a safe distance
//! * agents that are not isolated may move
//!
//! The central object is the [`Population`], which owns all per-agent data and the round
//! counter and exposes read-only, state-filtered views for rendering or reporting. A
//! [`Hospital`] bounds how many agents can be isolated at once.
//!
//! All randomness flows through named streams seeded from a single base seed (see
//! [`random`]), so a run is fully reproducible from its seed and [`Parameters`].
pub mod error;
pub mod hashing;
pub mod hospital;
pub mod log;
pub mod parameters;
pub mod population;
pub mod random;
pub mod report;
pub mod runner;
pub mod spatial;

pub use error::SimError;
pub use hospital::Hospital;
pub use parameters::{Parameters, TransmissionMode};
pub use population::{DiseaseState, Population, Position, StateCounts};

// Re-exports for use in the `define_rng!` macro
pub use paste;
pub use rand;
