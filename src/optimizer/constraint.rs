use crate::model::MarginFactor;

/// True when every tier is priced at least `margin_factor` times the next lower tier.
/// Vectors with fewer than two prices are vacuously valid.
pub fn is_valid(prices: &[f64], margin_factor: MarginFactor) -> bool {
    prices
        .windows(2)
        .all(|pair| pair[0] >= margin_factor.value() * pair[1])
}

/// Relative gap `(p[i] - p[i+1]) / p[i]` between adjacent tiers. A zero-priced tier yields 0.
pub fn adjacent_margins(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                0.0
            } else {
                (pair[0] - pair[1]) / pair[0]
            }
        })
        .collect()
}
