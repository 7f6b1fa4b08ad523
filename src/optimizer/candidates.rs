use crate::model::{round_cents, PriceBounds, Scenario};

/// Number of points in the uniform price grid spanning the configured bounds.
pub const GRID_POINTS: usize = 9;

/// Uniform grid of [GRID_POINTS] prices from `global_min` to `global_max` inclusive, rounded to cents.
/// Degenerate bounds (`global_max <= global_min`) yield `[global_min]`.
pub fn price_grid(global_min: f64, global_max: f64) -> Vec<f64> {
    if global_max <= global_min {
        return vec![global_min];
    }
    let step = (global_max - global_min) / (GRID_POINTS - 1) as f64;
    (0..GRID_POINTS)
        .map(|i| round_cents(global_min + i as f64 * step))
        .collect()
}

/// Scenario window of the price grid: top 3 for high demand, middle 3 for moderate, bottom 3 for
/// low. Unrecognized scenarios get the whole grid.
pub fn generate_candidates(global_min: f64, global_max: f64, scenario: &Scenario) -> Vec<f64> {
    let grid = price_grid(global_min, global_max);
    if grid.len() < GRID_POINTS {
        return grid;
    }
    match scenario.grid_window() {
        Some((start, end)) => grid[start..=end].to_vec(),
        None => grid,
    }
}

/// Per-section candidate sets. With `pin_endpoints` and at least two sections, the first section is
/// fixed at `round(global_max)` and the last at `round(global_min)`; interior sections use the
/// scenario window.
pub fn section_candidates(
    section_count: usize,
    bounds: PriceBounds,
    scenario: &Scenario,
    pin_endpoints: bool,
) -> Vec<Vec<f64>> {
    let window = generate_candidates(bounds.global_min, bounds.global_max, scenario);
    let pinned = pin_endpoints && section_count >= 2;

    (0..section_count)
        .map(|index| {
            if pinned && index == 0 {
                vec![round_cents(bounds.global_max)]
            } else if pinned && index == section_count - 1 {
                vec![round_cents(bounds.global_min)]
            } else {
                window.clone()
            }
        })
        .collect()
}
