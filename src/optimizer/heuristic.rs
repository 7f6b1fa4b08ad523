//! Randomized fallback search over monotone-decreasing price chains.
//!
//! Each trial builds one chain from the top tier down, drawing each price below the previous one
//! divided by the margin factor, and keeps the chain whose revenue lands closest to the target.

use rand::Rng;

use crate::model::{round_cents, MarginFactor, PriceBounds, PriceVector, Section};
use crate::optimizer::constraint::is_valid;
use crate::optimizer::revenue::revenue_at_rate;

pub const DEFAULT_HEURISTIC_TRIALS: usize = 10_000;

/// Interior draws come from `[prev / factor * INTERIOR_FLOOR_RATIO, prev / factor]` when pinned.
const INTERIOR_FLOOR_RATIO: f64 = 0.95;

#[derive(Debug, Clone, Copy)]
pub struct HeuristicParams {
    pub target_revenue: f64,
    pub bounds: PriceBounds,
    pub margin_factor: MarginFactor,
    /// Sell-through rate used to score trials.
    pub scoring_rate: f64,
    pub pin_endpoints: bool,
    pub trials: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicOutcome {
    pub best: Option<PriceVector>,
    /// Revenue of `best` at the scoring rate.
    pub best_revenue: f64,
    pub best_distance: f64,
    pub trials: usize,
    /// Trials whose chain passed the margin re-check.
    pub accepted: usize,
}

/// Uniform draw on `[lo, hi)`; an inverted interval draws from `(hi, lo]` instead of panicking.
#[inline]
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.gen::<f64>()
}

fn build_chain<R: Rng + ?Sized>(
    rng: &mut R,
    section_count: usize,
    bounds: PriceBounds,
    factor: f64,
    pin_endpoints: bool,
) -> PriceVector {
    let mut chain = Vec::with_capacity(section_count);
    let mut prev = bounds.global_max;

    if pin_endpoints && section_count >= 2 {
        chain.push(round_cents(bounds.global_max));
        for _ in 0..section_count - 2 {
            let hi = prev / factor;
            let lo = bounds.global_min.max(hi * INTERIOR_FLOOR_RATIO);
            let price = uniform(rng, lo, hi);
            chain.push(round_cents(price));
            prev = price;
        }
        chain.push(round_cents(bounds.global_min));
    } else {
        for _ in 0..section_count {
            let price = uniform(rng, bounds.global_min, prev / factor);
            chain.push(round_cents(price));
            prev = price;
        }
    }

    chain
}

pub fn search_heuristic<R: Rng + ?Sized>(
    sections: &[Section],
    params: &HeuristicParams,
    rng: &mut R,
) -> HeuristicOutcome {
    let mut outcome = HeuristicOutcome {
        best: None,
        best_revenue: 0.0,
        best_distance: f64::INFINITY,
        trials: 0,
        accepted: 0,
    };
    if sections.is_empty() {
        return outcome;
    }

    let factor = params.margin_factor.value();
    for _ in 0..params.trials {
        outcome.trials += 1;
        let chain = build_chain(rng, sections.len(), params.bounds, factor, params.pin_endpoints);
        if !is_valid(&chain, params.margin_factor) {
            continue;
        }
        outcome.accepted += 1;

        let revenue = revenue_at_rate(&chain, sections, params.scoring_rate);
        let distance = (revenue - params.target_revenue).abs();
        if distance < outcome.best_distance {
            outcome.best_distance = distance;
            outcome.best_revenue = revenue;
            outcome.best = Some(chain);
        }
    }

    outcome
}
