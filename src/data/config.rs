//! Engine configuration: sections, price bounds, margin, target and search limits.
//! Loaded from YAML (`.yaml`/`.yml`) or JSON; every search limit has a default.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{MarginFactor, PriceBounds, Scenario, Section};
use crate::optimizer::exhaustive::DEFAULT_MAX_COMBINATIONS;
use crate::optimizer::heuristic::DEFAULT_HEURISTIC_TRIALS;
use crate::optimizer::ranking::DEFAULT_TOP_K;
use crate::optimizer::revenue::SellRatePolicy;

/// Rate used to order candidates when no ranking policy is configured.
pub const DEFAULT_RANKING_RATE: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub sections: Vec<Section>,
    pub target_revenue: f64,
    pub margin_percent: f64,
    pub global_min: f64,
    pub global_max: f64,
    #[serde(default = "default_scenarios")]
    pub scenarios: Vec<Scenario>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_true")]
    pub pin_endpoints: bool,
    #[serde(default = "default_max_combinations")]
    pub max_combinations: usize,
    #[serde(default = "default_heuristic_trials")]
    pub heuristic_trials: usize,
    #[serde(default = "default_heuristic_rate")]
    pub heuristic_rate: SellRatePolicy,
    #[serde(default = "default_ranking_rate")]
    pub ranking_rate: SellRatePolicy,
    /// Base seed for the heuristic search. When None, a fresh seed is drawn per run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_scenarios() -> Vec<Scenario> {
    Scenario::ALL.to_vec()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_true() -> bool {
    true
}

fn default_max_combinations() -> usize {
    DEFAULT_MAX_COMBINATIONS
}

fn default_heuristic_trials() -> usize {
    DEFAULT_HEURISTIC_TRIALS
}

fn default_heuristic_rate() -> SellRatePolicy {
    SellRatePolicy::Scenario
}

fn default_ranking_rate() -> SellRatePolicy {
    SellRatePolicy::Fixed(DEFAULT_RANKING_RATE)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sections: (1..=3)
                .map(|i| Section::new(format!("Section {i}"), 500))
                .collect(),
            target_revenue: 50_000.0,
            margin_percent: 5.0,
            global_min: 50.0,
            global_max: 500.0,
            scenarios: default_scenarios(),
            top_k: DEFAULT_TOP_K,
            pin_endpoints: true,
            max_combinations: DEFAULT_MAX_COMBINATIONS,
            heuristic_trials: DEFAULT_HEURISTIC_TRIALS,
            heuristic_rate: default_heuristic_rate(),
            ranking_rate: default_ranking_rate(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn margin_factor(&self) -> MarginFactor {
        MarginFactor::from_percent(self.margin_percent)
    }

    pub fn bounds(&self) -> PriceBounds {
        PriceBounds::new(self.global_min, self.global_max)
    }

    /// The unpinned generator scoring every heuristic trial at the high-demand rate.
    pub fn basic_variant(self) -> Self {
        Self {
            pin_endpoints: false,
            heuristic_rate: SellRatePolicy::Fixed(Scenario::High.sell_through_rate()),
            ..self
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    ParseYaml(serde_yaml::Error),
    ParseJson(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read config file: {err}"),
            Self::ParseYaml(err) => write!(f, "failed to parse YAML config: {err}"),
            Self::ParseJson(err) => write!(f, "failed to parse JSON config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::ParseYaml(err) => Some(err),
            Self::ParseJson(err) => Some(err),
        }
    }
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
        })
}

pub fn parse_config_yaml(raw: &str) -> Result<EngineConfig, ConfigError> {
    serde_yaml::from_str(raw).map_err(ConfigError::ParseYaml)
}

pub fn parse_config_json(raw: &str) -> Result<EngineConfig, ConfigError> {
    serde_json::from_str(raw).map_err(ConfigError::ParseJson)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(ConfigError::Read)?;
    if is_yaml_path(path) {
        parse_config_yaml(&raw)
    } else {
        parse_config_json(&raw)
    }
}
