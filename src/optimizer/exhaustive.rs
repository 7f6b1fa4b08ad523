//! Bounded Cartesian enumeration of per-section candidate prices.
//!
//! The product is walked lazily in lexicographic order (section 0 varies slowest, the last section
//! fastest) so a cap on examined combinations stops the walk without materializing the product.

use crate::model::{MarginFactor, PriceBounds, PriceVector, Scenario};
use crate::optimizer::candidates::section_candidates;
use crate::optimizer::constraint::is_valid;

/// Default cap on combinations examined (not combinations accepted).
pub const DEFAULT_MAX_COMBINATIONS: usize = 100_000;

/// Lazy lexicographic product over candidate sets, odometer style.
#[derive(Debug, Clone)]
pub struct CandidateProduct<'a> {
    sets: &'a [Vec<f64>],
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> CandidateProduct<'a> {
    pub fn new(sets: &'a [Vec<f64>]) -> Self {
        let exhausted = sets.is_empty() || sets.iter().any(Vec::is_empty);
        Self {
            sets,
            indices: vec![0; sets.len()],
            exhausted,
        }
    }

    /// Total size of the product, saturating.
    pub fn total(sets: &[Vec<f64>]) -> usize {
        if sets.is_empty() {
            return 0;
        }
        sets.iter()
            .fold(1usize, |acc, set| acc.saturating_mul(set.len()))
    }
}

impl Iterator for CandidateProduct<'_> {
    type Item = PriceVector;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current: PriceVector = self
            .indices
            .iter()
            .zip(self.sets)
            .map(|(&i, set)| set[i])
            .collect();

        // Advance the odometer from the last position.
        let mut position = self.sets.len();
        loop {
            if position == 0 {
                self.exhausted = true;
                break;
            }
            position -= 1;
            self.indices[position] += 1;
            if self.indices[position] < self.sets[position].len() {
                break;
            }
            self.indices[position] = 0;
        }

        Some(current)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustiveOutcome {
    /// Accepted vectors in enumeration order.
    pub vectors: Vec<PriceVector>,
    /// Combinations examined, never more than the cap.
    pub examined: usize,
    /// Size of the full product before the cap.
    pub product_size: usize,
}

impl ExhaustiveOutcome {
    pub fn truncated(&self) -> bool {
        self.examined < self.product_size
    }
}

pub fn search_exhaustive(
    section_count: usize,
    scenario: &Scenario,
    bounds: PriceBounds,
    margin_factor: MarginFactor,
    pin_endpoints: bool,
    max_combinations: usize,
) -> ExhaustiveOutcome {
    let sets = section_candidates(section_count, bounds, scenario, pin_endpoints);
    let product_size = CandidateProduct::total(&sets);

    let mut examined = 0usize;
    let vectors = CandidateProduct::new(&sets)
        .take(max_combinations)
        .inspect(|_| examined += 1)
        .filter(|prices| is_valid(prices, margin_factor))
        .collect();

    ExhaustiveOutcome {
        vectors,
        examined,
        product_size,
    }
}
