use serde::Serialize;

use crate::model::{PriceVector, Section};
use crate::optimizer::revenue::revenue_at_rate;

/// Default number of ranked vectors returned per scenario.
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVector {
    pub prices: PriceVector,
    /// Revenue at the ranking rate; the value the ordering is based on.
    pub ranking_revenue: f64,
    /// `|ranking_revenue - target|`.
    pub distance: f64,
}

/// Up to `k` vectors ordered by ascending distance between revenue at `ranking_rate` and the
/// target. The sort is stable, so ties keep enumeration order.
pub fn top_k(
    vectors: Vec<PriceVector>,
    sections: &[Section],
    target_revenue: f64,
    k: usize,
    ranking_rate: f64,
) -> Vec<RankedVector> {
    let mut ranked: Vec<RankedVector> = vectors
        .into_iter()
        .map(|prices| {
            let ranking_revenue = revenue_at_rate(&prices, sections, ranking_rate);
            RankedVector {
                distance: (ranking_revenue - target_revenue).abs(),
                ranking_revenue,
                prices,
            }
        })
        .collect();

    ranked.sort_by(|left, right| left.distance.total_cmp(&right.distance));
    ranked.truncate(k);
    ranked
}
