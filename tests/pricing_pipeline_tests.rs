//! End-to-end checks of the search pipeline through the library API.

use pricemaster::data::config::EngineConfig;
use pricemaster::model::{MarginFactor, PriceBounds, Scenario, Section};
use pricemaster::optimizer::candidates::{generate_candidates, price_grid};
use pricemaster::optimizer::constraint::is_valid;
use pricemaster::optimizer::exhaustive::search_exhaustive;
use pricemaster::optimizer::heuristic::{search_heuristic, HeuristicParams};
use pricemaster::optimizer::revenue::{revenue_at_rate, SellRatePolicy};
use pricemaster::optimizer::rng::SplitMix64;
use pricemaster::optimizer::{optimize_all_with_seed, optimize_scenario, SearchPath};
use pricemaster::report::build_report;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn three_equal_sections() -> Vec<Section> {
    (1..=3)
        .map(|i| Section::new(format!("Section {i}"), 500))
        .collect()
}

fn venue() -> EngineConfig {
    EngineConfig {
        sections: three_equal_sections(),
        target_revenue: 200_000.0,
        margin_percent: 5.0,
        global_min: 50.0,
        global_max: 200.0,
        ..EngineConfig::default()
    }
}

#[test]
fn reference_venue_grid_and_high_window() {
    assert_eq!(
        price_grid(50.0, 200.0),
        vec![50.0, 68.75, 87.5, 106.25, 125.0, 143.75, 162.5, 181.25, 200.0]
    );
    assert_eq!(
        generate_candidates(50.0, 200.0, &Scenario::High),
        vec![162.5, 181.25, 200.0]
    );

    let outcome = search_exhaustive(
        3,
        &Scenario::High,
        PriceBounds::new(50.0, 200.0),
        MarginFactor::from_percent(5.0),
        true,
        100_000,
    );
    assert_eq!(outcome.vectors.len(), 2);
}

#[test]
fn every_ranked_vector_respects_margin_and_bounds() {
    let config = EngineConfig {
        sections: (1..=5).map(|i| Section::new(format!("T{i}"), 200 * i)).collect(),
        target_revenue: 300_000.0,
        margin_percent: 8.0,
        global_min: 30.0,
        global_max: 600.0,
        scenarios: vec![
            Scenario::High,
            Scenario::Moderate,
            Scenario::Low,
            Scenario::parse("other"),
        ],
        ..EngineConfig::default()
    };
    let run = optimize_all_with_seed(&config, 1234, true);
    for outcome in &run.outcomes {
        assert!(outcome.results.len() <= config.top_k);
        assert!(outcome.stats.examined <= config.max_combinations);
        for result in &outcome.results {
            assert!(is_valid(&result.prices, config.margin_factor()));
            assert!(result
                .prices
                .iter()
                .all(|&p| (config.global_min..=config.global_max).contains(&p)));
        }
        let distances: Vec<f64> = outcome
            .results
            .iter()
            .map(|r| (r.ranking_revenue - config.target_revenue).abs())
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn degenerate_bounds_fall_through_both_searches() {
    let config = EngineConfig {
        global_min: 90.0,
        global_max: 90.0,
        ..venue()
    };
    let outcome = optimize_scenario(&config, &Scenario::Moderate, &mut SplitMix64::new(8));
    assert_eq!(outcome.stats.examined, 1);
    assert_eq!(outcome.stats.heuristic_trials, 10_000);
    assert_eq!(outcome.path, SearchPath::Empty);

    // Without a margin, equal prices are acceptable and the grid finds the single vector.
    let flat = EngineConfig {
        margin_percent: 0.0,
        ..config
    };
    let outcome = optimize_scenario(&flat, &Scenario::Moderate, &mut SplitMix64::new(8));
    assert_eq!(outcome.path, SearchPath::Exhaustive);
    assert_eq!(outcome.results[0].prices, vec![90.0, 90.0, 90.0]);
}

#[test]
fn heuristic_accepts_any_seeded_rng() {
    let sections = three_equal_sections();
    let params = HeuristicParams {
        target_revenue: 200_000.0,
        bounds: PriceBounds::new(50.0, 200.0),
        margin_factor: MarginFactor::from_percent(5.0),
        scoring_rate: 0.9,
        pin_endpoints: false,
        trials: 2_000,
    };
    let first = search_heuristic(&sections, &params, &mut StdRng::seed_from_u64(77));
    let second = search_heuristic(&sections, &params, &mut StdRng::seed_from_u64(77));
    assert_eq!(first, second);
    assert_eq!(first.trials, 2_000);
    let best = first.best.expect("unpinned chains over 50..200 should pass");
    let revenue = revenue_at_rate(&best, &sections, 0.9);
    assert!((revenue - first.best_revenue).abs() < 1e-6);
}

#[test]
fn basic_variant_scores_heuristic_at_high_rate() {
    // The low window cannot hold four tiers 12% apart, so the heuristic decides the result.
    let config = EngineConfig {
        sections: (1..=4).map(|i| Section::new(format!("S{i}"), 500)).collect(),
        margin_percent: 12.0,
        ..venue()
    }
    .basic_variant();
    assert_eq!(config.heuristic_rate, SellRatePolicy::Fixed(0.98));

    let outcome = optimize_scenario(&config, &Scenario::Low, &mut SplitMix64::new(2));
    assert_eq!(outcome.stats.valid_combinations, 0);
    assert_eq!(outcome.path, SearchPath::Heuristic);
    // Reported revenue still uses the low-demand rate.
    let best = &outcome.results[0];
    let reported = revenue_at_rate(&best.prices, &config.sections, 0.85);
    assert!((best.revenue - reported).abs() < 1e-6);
}

#[test]
fn report_derives_section_figures_from_best_vector() {
    let config = EngineConfig {
        target_revenue: 205_000.0,
        scenarios: vec![Scenario::High],
        ..venue()
    };
    let run = optimize_all_with_seed(&config, 3, false);
    let report = build_report(&config, &run);
    let high = &report.scenarios[0];

    assert_eq!(high.rows.len(), 3);
    let total: f64 = high.rows.iter().map(|row| row.section_revenue).sum();
    let best_revenue = high.total_revenue.expect("high scenario should have a best vector");
    assert!((total - best_revenue).abs() < 1e-6);
    assert!(high.rows.iter().all(|row| row.seats_sold == 490));
    assert_eq!(high.options[0].tier_margins.len(), 2);
}
