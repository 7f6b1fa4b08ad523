pub mod candidates;
pub mod constraint;
pub mod exhaustive;
pub mod heuristic;
pub mod ranking;
pub mod revenue;
pub mod rng;

use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::data::config::EngineConfig;
use crate::model::{PriceVector, Scenario};
use crate::optimizer::exhaustive::search_exhaustive;
use crate::optimizer::heuristic::{search_heuristic, HeuristicParams};
use crate::optimizer::ranking::top_k;
use crate::optimizer::revenue::revenue_at_rate;
use crate::optimizer::rng::SplitMix64;
use crate::parallel::WorkerPool;

/// Which search produced the candidate pool that was ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPath {
    Exhaustive,
    Heuristic,
    /// Neither search produced a valid vector.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub prices: PriceVector,
    /// Revenue at the scenario's sell-through rate.
    pub revenue: f64,
    /// `revenue - target_revenue`.
    pub delta_from_target: f64,
    /// Revenue at the ranking rate, which decided the order.
    pub ranking_revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub product_size: usize,
    pub examined: usize,
    /// The combination cap stopped enumeration before the whole product was seen.
    pub truncated: bool,
    pub valid_combinations: usize,
    pub heuristic_trials: usize,
    pub heuristic_accepted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub sell_through_rate: f64,
    pub path: SearchPath,
    pub results: Vec<RankedResult>,
    pub stats: SearchStats,
}

impl ScenarioOutcome {
    pub fn best(&self) -> Option<&RankedResult> {
        self.results.first()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationRun {
    /// Base seed the per-scenario streams were derived from.
    pub seed: u64,
    pub outcomes: Vec<ScenarioOutcome>,
}

/// Solve one scenario: exhaustive grid search, heuristic fallback when the grid yields nothing,
/// then rank by distance to target.
pub fn optimize_scenario<R: Rng + ?Sized>(
    config: &EngineConfig,
    scenario: &Scenario,
    rng: &mut R,
) -> ScenarioOutcome {
    let margin_factor = config.margin_factor();
    let mut stats = SearchStats::default();

    let exhaustive = search_exhaustive(
        config.sections.len(),
        scenario,
        config.bounds(),
        margin_factor,
        config.pin_endpoints,
        config.max_combinations,
    );
    stats.product_size = exhaustive.product_size;
    stats.examined = exhaustive.examined;
    stats.truncated = exhaustive.truncated();
    stats.valid_combinations = exhaustive.vectors.len();

    let (path, pool) = if !exhaustive.vectors.is_empty() {
        (SearchPath::Exhaustive, exhaustive.vectors)
    } else {
        let params = HeuristicParams {
            target_revenue: config.target_revenue,
            bounds: config.bounds(),
            margin_factor,
            scoring_rate: config.heuristic_rate.rate_for(scenario),
            pin_endpoints: config.pin_endpoints,
            trials: config.heuristic_trials,
        };
        let heuristic = search_heuristic(&config.sections, &params, rng);
        stats.heuristic_trials = heuristic.trials;
        stats.heuristic_accepted = heuristic.accepted;
        match heuristic.best {
            Some(best) => (SearchPath::Heuristic, vec![best]),
            None => (SearchPath::Empty, Vec::new()),
        }
    };

    let sell_through_rate = scenario.sell_through_rate();
    let results = top_k(
        pool,
        &config.sections,
        config.target_revenue,
        config.top_k,
        config.ranking_rate.rate_for(scenario),
    )
    .into_iter()
    .map(|ranked| {
        let revenue = revenue_at_rate(&ranked.prices, &config.sections, sell_through_rate);
        RankedResult {
            revenue,
            delta_from_target: revenue - config.target_revenue,
            ranking_revenue: ranked.ranking_revenue,
            prices: ranked.prices,
        }
    })
    .collect();

    ScenarioOutcome {
        scenario: scenario.clone(),
        sell_through_rate,
        path,
        results,
        stats,
    }
}

/// Solve every configured scenario with a stream derived from `seed` and the scenario's position.
/// Scenarios are independent, so `parallel` fans them out over rayon; output order and values are
/// the same either way.
pub fn optimize_all_with_seed(config: &EngineConfig, seed: u64, parallel: bool) -> OptimizationRun {
    let solve_one = |(index, scenario): (usize, &Scenario)| {
        let mut rng = SplitMix64::for_stream(seed, index as u64);
        optimize_scenario(config, scenario, &mut rng)
    };

    let outcomes = if parallel {
        config
            .scenarios
            .par_iter()
            .enumerate()
            .map(solve_one)
            .collect()
    } else {
        config.scenarios.iter().enumerate().map(solve_one).collect()
    };

    OptimizationRun { seed, outcomes }
}

/// Solve every configured scenario in parallel on `pool`. Uses the configured seed, or a fresh one.
pub fn optimize_all_in(config: &EngineConfig, pool: &WorkerPool) -> OptimizationRun {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    pool.install(|| optimize_all_with_seed(config, seed, true))
}

pub fn optimize_all(config: &EngineConfig) -> OptimizationRun {
    optimize_all_in(config, &WorkerPool::default())
}
