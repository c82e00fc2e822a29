//! Parent selection.
//!
//! Tournament selection over the scored population: `k` candidates drawn
//! with replacement, the best wins. Ordering is fitness-maximizing, ties
//! broken by lower hard-violation count, then by lower population index,
//! so a run is fully determined by its seed.

use rand::Rng;

use crate::chromosome::Chromosome;

/// Whether candidate `a` (at index `ai`) ranks ahead of `b` (at `bi`).
pub(crate) fn outranks(a: &Chromosome, ai: usize, b: &Chromosome, bi: usize) -> bool {
    if a.fitness != b.fitness {
        return a.fitness > b.fitness;
    }
    if a.hard_violations != b.hard_violations {
        return a.hard_violations < b.hard_violations;
    }
    ai < bi
}

/// Population indices ranked best-first under [`outranks`].
pub(crate) fn rank_indices(population: &[Chromosome]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..population.len()).collect();
    indices.sort_by(|&a, &b| {
        if a == b {
            std::cmp::Ordering::Equal
        } else if outranks(&population[a], a, &population[b], b) {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        }
    });
    indices
}

/// Tournament selection: draw `k` indices with replacement, return the
/// best.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<R: Rng>(population: &[Chromosome], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let k = k.max(1);
    let n = population.len();

    let mut best = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if outranks(&population[idx], idx, &population[best], best) {
            best = idx;
        }
    }
    best
}
