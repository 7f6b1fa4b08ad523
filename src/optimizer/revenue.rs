use serde::{Deserialize, Serialize};

use crate::model::{Scenario, Section};

/// Which sell-through rate a search stage scores with.
///
/// Written in config as the string `scenario` or the map `fixed: <rate>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolicyRepr", into = "PolicyRepr")]
pub enum SellRatePolicy {
    /// The rate bound to the scenario being solved.
    Scenario,
    /// A fixed rate regardless of scenario.
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PolicyLabel {
    Scenario,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum PolicyRepr {
    Label(PolicyLabel),
    Fixed { fixed: f64 },
}

impl From<PolicyRepr> for SellRatePolicy {
    fn from(repr: PolicyRepr) -> Self {
        match repr {
            PolicyRepr::Label(PolicyLabel::Scenario) => Self::Scenario,
            PolicyRepr::Fixed { fixed } => Self::Fixed(fixed),
        }
    }
}

impl From<SellRatePolicy> for PolicyRepr {
    fn from(policy: SellRatePolicy) -> Self {
        match policy {
            SellRatePolicy::Scenario => Self::Label(PolicyLabel::Scenario),
            SellRatePolicy::Fixed(fixed) => Self::Fixed { fixed },
        }
    }
}

impl SellRatePolicy {
    pub fn rate_for(&self, scenario: &Scenario) -> f64 {
        match self {
            Self::Scenario => scenario.sell_through_rate(),
            Self::Fixed(rate) => *rate,
        }
    }
}

/// Estimated revenue: `sum(seats[i] * sell_rate * price[i])`. Extra prices or sections are ignored.
pub fn revenue_at_rate(prices: &[f64], sections: &[Section], sell_rate: f64) -> f64 {
    prices
        .iter()
        .zip(sections)
        .map(|(price, section)| f64::from(section.seats) * sell_rate * price)
        .sum()
}

pub fn revenue(prices: &[f64], sections: &[Section], scenario: &Scenario) -> f64 {
    revenue_at_rate(prices, sections, scenario.sell_through_rate())
}
