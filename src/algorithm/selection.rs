use crate::{
    algorithm::{propagation::restrict_to, wave::Wave},
    io::configuration::ENTROPY_NOISE,
    math::probability::weighted_index,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random source shared by cell selection and collapse
///
/// Every random draw of a generation run goes through this type, so the
/// sequence of draws alone determines the output for fixed rules.
#[derive(Clone, Debug)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restart the draw sequence from a seed
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Uniform sample in `[0, 1)`
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// Weighted random selection
    ///
    /// Returns an index into `weights` using the cumulative distribution in
    /// slice order.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        let unit = self.unit();
        weighted_index(weights, unit)
    }
}

/// Outcome of scanning the wave for the next cell to collapse
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Undecided cell with the lowest noisy entropy
    Cell(usize),
    /// Every cell holds exactly one tile
    Complete,
    /// This cell has an empty domain
    Contradiction(usize),
}

/// Find the undecided cell with minimum entropy
///
/// Cells are scanned in row-major order. Each undecided cell draws a small
/// random perturbation to break ties, and the first strict minimum wins.
/// Decided cells draw nothing, so detecting completion consumes no
/// randomness.
pub fn select_next(wave: &Wave, selector: &mut RandomSelector) -> Selection {
    if let Some(cell) = wave.contradiction_cell() {
        return Selection::Contradiction(cell);
    }

    let mut best: Option<(usize, f64)> = None;
    for cell in 0..wave.cell_count() {
        match wave.count(cell) {
            0 => return Selection::Contradiction(cell),
            1 => continue,
            _ => {}
        }

        let noisy = wave.entropy(cell) + ENTROPY_NOISE * selector.unit();
        if best.is_none_or(|(_, lowest)| noisy < lowest) {
            best = Some((cell, noisy));
        }
    }

    best.map_or(Selection::Complete, |(cell, _)| Selection::Cell(cell))
}

/// Observe a cell by sampling one of its remaining tiles
///
/// Candidates are weighted by tile weight in ascending id order. Every other
/// tile is banned and the removals are propagated. Returns the chosen tile,
/// or `None` when the cell was already empty.
pub fn collapse(wave: &mut Wave, cell: usize, selector: &mut RandomSelector) -> Option<usize> {
    let candidates = wave.domain(cell)?.to_vec();
    if candidates.is_empty() {
        return None;
    }

    let rules = wave.rules().clone();
    let weights: Vec<f64> = candidates.iter().map(|&tile| rules.weight(tile)).collect();
    let index = selector.weighted_choice(&weights);
    let chosen = candidates.get(index).copied()?;

    restrict_to(wave, cell, chosen);
    Some(chosen)
}
