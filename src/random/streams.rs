use std::any::{Any, TypeId};

use log::trace;

use crate::hashing::{hash_str, HashMap};
use crate::rand::distr::uniform::{SampleRange, SampleUniform};
use crate::rand::distr::Distribution;
use crate::rand::{Rng, SeedableRng};
use crate::random::RngId;

// This is a wrapper that allows for future support for different types of
// random number generators (anything that implements SeedableRng is valid).
struct RngHolder {
    rng: Box<dyn Any>,
}

/// Stores a base seed for all rngs and a map of rngs, keyed by their [`RngId`].
/// Rngs are created lazily the first time they are sampled from.
pub struct RandomStreams {
    base_seed: u64,
    rng_holders: HashMap<TypeId, RngHolder>,
}

impl RandomStreams {
    #[must_use]
    pub fn new(base_seed: u64) -> Self {
        RandomStreams {
            base_seed,
            rng_holders: HashMap::default(),
        }
    }

    /// Gets a mutable reference to the random number generator associated with the given
    /// [`RngId`]. If the Rng has not been used before, one will be created with the base seed.
    fn get_rng<R: RngId>(&mut self) -> &mut R::RngType {
        let base_seed = self.base_seed;
        self.rng_holders
            .entry(TypeId::of::<R>())
            // Create a new rng holder if it doesn't exist yet
            .or_insert_with(|| {
                trace!(
                    "creating new RNG (seed={}) for stream {}",
                    base_seed,
                    R::get_name()
                );
                let seed_offset = hash_str(R::get_name());
                RngHolder {
                    rng: Box::new(R::RngType::seed_from_u64(
                        base_seed.wrapping_add(seed_offset),
                    )),
                }
            })
            .rng
            .downcast_mut::<R::RngType>()
            .expect("rng holder is keyed by its RngId type")
    }

    /// Gets a random sample from the random number generator associated with the given
    /// [`RngId`] by applying the specified sampler function.
    pub fn sample<R: RngId, T>(
        &mut self,
        _rng_id: R,
        sampler: impl FnOnce(&mut R::RngType) -> T,
    ) -> T {
        let rng = self.get_rng::<R>();
        sampler(rng)
    }

    /// Gets a random sample from the specified distribution using the random number generator
    /// associated with the given [`RngId`].
    pub fn sample_distr<R: RngId, T>(&mut self, _rng_id: R, distribution: impl Distribution<T>) -> T {
        let rng = self.get_rng::<R>();
        distribution.sample::<R::RngType>(rng)
    }

    /// Gets a random sample within the range provided by `range`
    /// using the generator associated with the given [`RngId`].
    pub fn sample_range<R: RngId, S, T>(&mut self, rng_id: R, range: S) -> T
    where
        S: SampleRange<T>,
        T: SampleUniform,
    {
        self.sample(rng_id, |rng| rng.random_range(range))
    }

}
