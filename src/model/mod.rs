//! Pricing domain types: sections (tiers), price bounds, demand scenarios and price vectors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sell-through rate applied when a scenario label is not recognized.
pub const DEFAULT_SELL_THROUGH_RATE: f64 = 0.95;

/// Round to two decimal places (cents); exact half-cent ties go to the even cent.
#[inline]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Inventory tier. Index order in a section list encodes price rank: index 0 is the most expensive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub name: String,
    pub seats: u32,
}

impl Section {
    pub fn new(name: impl Into<String>, seats: u32) -> Self {
        Self {
            name: name.into(),
            seats,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub global_min: f64,
    pub global_max: f64,
}

impl PriceBounds {
    pub fn new(global_min: f64, global_max: f64) -> Self {
        Self {
            global_min,
            global_max,
        }
    }

    /// False when the interval is empty or inverted; generation then degrades to `[global_min]`.
    pub fn is_proper(&self) -> bool {
        self.global_max > self.global_min
    }
}

/// Demand regime. Fixes a sell-through rate and the window of the price grid used for candidates.
///
/// Labels that are not one of the known regimes are kept as [Scenario::Unrecognized] and fall
/// back to the full grid and [DEFAULT_SELL_THROUGH_RATE].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scenario {
    High,
    Moderate,
    Low,
    Unrecognized(String),
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::High, Scenario::Moderate, Scenario::Low];

    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" | "alta" => Self::High,
            "moderate" | "moderada" | "medium" => Self::Moderate,
            "low" | "baja" => Self::Low,
            _ => Self::Unrecognized(label.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
            Self::Unrecognized(label) => label.as_str(),
        }
    }

    pub fn sell_through_rate(&self) -> f64 {
        match self {
            Self::High => 0.98,
            Self::Moderate => 0.90,
            Self::Low => 0.85,
            Self::Unrecognized(_) => DEFAULT_SELL_THROUGH_RATE,
        }
    }

    /// Inclusive index window into the 9-point price grid, or None for the whole grid.
    pub fn grid_window(&self) -> Option<(usize, usize)> {
        match self {
            Self::High => Some((6, 8)),
            Self::Moderate => Some((3, 5)),
            Self::Low => Some((0, 2)),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for Scenario {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<Scenario> for String {
    fn from(scenario: Scenario) -> Self {
        scenario.as_str().to_string()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum ratio between a tier's price and the next lower tier's price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarginFactor(pub f64);

impl MarginFactor {
    pub fn from_percent(margin_percent: f64) -> Self {
        Self(1.0 + margin_percent / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// One price per section, ordered by tier rank.
pub type PriceVector = Vec<f64>;
