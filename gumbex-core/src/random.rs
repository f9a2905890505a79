use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Source of randomness injected into the layout, motion and design generators.
///
/// Generators never reach for a global RNG; they only see this trait, so a
/// seeded or scripted implementation makes every run reproducible.
pub trait Randomness {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Permutes `items` in place, every ordering equally likely.
    fn shuffle<T>(&mut self, items: &mut [T]);

    /// Picks `k` distinct elements of `candidates` in random order.
    /// Returns fewer than `k` elements when `candidates` is shorter.
    fn sample_without_replacement<T: Clone>(&mut self, candidates: &[T], k: usize) -> Vec<T>;
}

/// [`Randomness`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngRandomness<R: Rng> {
    rng: R,
}

impl<R: Rng> RngRandomness<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Randomness for RngRandomness<R> {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    fn sample_without_replacement<T: Clone>(&mut self, candidates: &[T], k: usize) -> Vec<T> {
        candidates
            .choose_multiple(&mut self.rng, k)
            .cloned()
            .collect()
    }
}

/// Deterministic stand-in for tests and replays.
///
/// `uniform` cycles through a fixed script, `shuffle` keeps the input order and
/// sampling takes the leading candidates.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandomness {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandomness {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Number of uniform draws served so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl Randomness for ScriptedRandomness {
    fn uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }

    fn shuffle<T>(&mut self, _items: &mut [T]) {}

    fn sample_without_replacement<T: Clone>(&mut self, candidates: &[T], k: usize) -> Vec<T> {
        candidates.iter().take(k).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn uniform_stays_in_unit_interval() {
        let mut r = RngRandomness::new(ChaCha8Rng::seed_from_u64(7));
        for _ in 0..1000 {
            let u = r.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut r = RngRandomness::new(ChaCha8Rng::seed_from_u64(11));
        let mut items: Vec<u32> = (0..27).collect();
        r.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..27).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_shuffle() {
        let mut a = RngRandomness::new(ChaCha8Rng::seed_from_u64(3));
        let mut b = RngRandomness::new(ChaCha8Rng::seed_from_u64(3));
        let mut xs: Vec<u32> = (0..20).collect();
        let mut ys = xs.clone();
        a.shuffle(&mut xs);
        b.shuffle(&mut ys);
        assert_eq!(xs, ys);
    }

    #[test]
    fn sampling_yields_distinct_members() {
        let mut r = RngRandomness::new(ChaCha8Rng::seed_from_u64(5));
        let picked = r.sample_without_replacement(&[0, 1, 2, 3], 3);
        assert_eq!(picked.len(), 3);
        for p in &picked {
            assert!((0..4).contains(p));
        }
        let mut dedup = picked.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), 3);

        assert_eq!(r.sample_without_replacement(&[1, 2], 5).len(), 2);
    }

    #[test]
    fn scripted_cycles_values() {
        let mut r = ScriptedRandomness::new(vec![0.1, 0.2]);
        assert_eq!(r.uniform(), 0.1);
        assert_eq!(r.uniform(), 0.2);
        assert_eq!(r.uniform(), 0.1);
        assert_eq!(r.draws(), 3);

        let mut items = vec!['a', 'b', 'c'];
        r.shuffle(&mut items);
        assert_eq!(items, vec!['a', 'b', 'c']);
        assert_eq!(r.sample_without_replacement(&items, 2), vec!['a', 'b']);
    }
}
