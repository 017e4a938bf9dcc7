//! Shuffle order for queues
//!
//! A shuffled queue keeps `tracks` untouched and stores a Fisher-Yates
//! permutation of its indices in `shuffle_list`. The random source is
//! injected so tests can use a seeded generator.

use encore_core::Queue;
use rand::Rng;

/// Uniform random permutation of `0..len` (Fisher-Yates)
pub fn permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }
    order
}

/// Turn shuffle on
///
/// Builds a fresh permutation and points `shuffle_index` at the current
/// track so playback continues from where it is. Already-shuffled queues
/// keep their order.
pub fn enable<R: Rng + ?Sized>(queue: &mut Queue, rng: &mut R) {
    if queue.is_shuffled() {
        return;
    }

    let order = permutation(queue.len(), rng);
    queue.shuffle_index = queue
        .current_index
        .and_then(|current| order.iter().position(|&i| i == current));
    queue.shuffle_list = Some(order);
}

/// Turn shuffle off; `current_index` is left as-is
pub fn disable(queue: &mut Queue) {
    queue.shuffle_list = None;
    queue.shuffle_index = None;
}
