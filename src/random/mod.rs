//! Named, independently seeded random number streams.
//!
//! Each concern of the simulation (initial placement, seeding of infections, disease
//! progression, transmission and movement) draws from its own stream. A stream is identified
//! by a zero-sized type created with [`define_rng!`] and is seeded lazily from the base seed
//! plus a hash of the stream's name. Changing how many numbers one concern draws therefore
//! never perturbs the numbers seen by another, and a fixed base seed reproduces a run exactly.
mod macros;
mod sampling_algorithms;
mod streams;

pub use macros::define_rng;
pub use sampling_algorithms::sample_multiple_from_known_length;
pub use streams::RandomStreams;

use crate::rand::{Rng, SeedableRng};

pub trait RngId: Copy + Clone + 'static {
    type RngType: SeedableRng + Rng + 'static;
    fn get_name() -> &'static str;
}
