//! Uniform sampling without replacement, used to pick the agents infected at round 0.

use crate::rand::seq::index::sample as choose_range;
use crate::rand::Rng;

/// Sample multiple random elements uniformly without replacement from a container of known length.
/// This function assumes `iter.len() >= requested`; callers validate that up front.
///
/// We do not assume the container is randomly indexable, only that it can be iterated over.
/// The selected items are returned in iteration order.
pub fn sample_multiple_from_known_length<I, R, T>(rng: &mut R, iter: I, requested: usize) -> Vec<T>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = T> + ExactSizeIterator<Item = T>,
{
    if requested == 0 {
        return Vec::new();
    }
    let mut indexes = Vec::with_capacity(requested);
    indexes.extend(choose_range(rng, iter.len(), requested));
    indexes.sort_unstable();
    let mut index_iterator = indexes.into_iter();
    let mut next_idx = index_iterator.next();
    let mut selected = Vec::with_capacity(requested);

    for (idx, item) in iter.enumerate() {
        if Some(idx) == next_idx {
            selected.push(item);
            next_idx = index_iterator.next();
            if next_idx.is_none() {
                break;
            }
        }
    }

    selected
}
