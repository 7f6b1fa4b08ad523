//! Per-scenario revenue breakdown built from an optimization run, rendered as JSON or as a
//! tab-separated table for the console.

use std::fmt;
use std::io;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::data::config::EngineConfig;
use crate::model::{PriceVector, Scenario, Section};
use crate::optimizer::constraint::adjacent_margins;
use crate::optimizer::{OptimizationRun, ScenarioOutcome, SearchPath, SearchStats};

pub const NO_RESULT_NOTE: &str = "No valid combinations found. Adjust the parameters.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRow {
    pub section: String,
    pub recommended_price: f64,
    pub seats: u32,
    pub sell_through_rate: f64,
    pub seats_sold: u32,
    pub section_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceOption {
    pub rank: usize,
    pub prices: PriceVector,
    pub revenue: f64,
    pub delta_from_target: f64,
    /// `(p[i] - p[i+1]) / p[i]` for each adjacent pair of tiers.
    pub tier_margins: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub sell_through_rate: f64,
    pub path: SearchPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
    pub total_revenue: Option<f64>,
    pub rows: Vec<SectionRow>,
    pub options: Vec<PriceOption>,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub seed: u64,
    pub target_revenue: f64,
    pub margin_percent: f64,
    pub scenarios: Vec<ScenarioReport>,
}

pub fn section_rows(prices: &[f64], sections: &[Section], sell_through_rate: f64) -> Vec<SectionRow> {
    prices
        .iter()
        .zip(sections)
        .map(|(&price, section)| {
            let seats = f64::from(section.seats);
            SectionRow {
                section: section.name.clone(),
                recommended_price: price,
                seats: section.seats,
                sell_through_rate,
                seats_sold: (seats * sell_through_rate).floor() as u32,
                section_revenue: price * seats * sell_through_rate,
            }
        })
        .collect()
}

pub fn scenario_report(outcome: &ScenarioOutcome, sections: &[Section]) -> ScenarioReport {
    let rows = outcome
        .best()
        .map(|best| section_rows(&best.prices, sections, outcome.sell_through_rate))
        .unwrap_or_default();
    let options = outcome
        .results
        .iter()
        .enumerate()
        .map(|(index, result)| PriceOption {
            rank: index + 1,
            prices: result.prices.clone(),
            revenue: result.revenue,
            delta_from_target: result.delta_from_target,
            tier_margins: adjacent_margins(&result.prices),
        })
        .collect();

    ScenarioReport {
        scenario: outcome.scenario.clone(),
        sell_through_rate: outcome.sell_through_rate,
        path: outcome.path,
        note: outcome.is_empty().then_some(NO_RESULT_NOTE),
        total_revenue: outcome.best().map(|best| best.revenue),
        rows,
        options,
        stats: outcome.stats.clone(),
    }
}

pub fn build_report(config: &EngineConfig, run: &OptimizationRun) -> RunReport {
    RunReport {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        seed: run.seed,
        target_revenue: config.target_revenue,
        margin_percent: config.margin_percent,
        scenarios: run
            .outcomes
            .iter()
            .map(|outcome| scenario_report(outcome, &config.sections))
            .collect(),
    }
}

pub fn render_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[derive(Debug)]
pub enum TableError {
    Csv(csv::Error),
    Io(io::Error),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "failed to write table row: {err}"),
            Self::Io(err) => write!(f, "failed to flush table: {err}"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<io::Error> for TableError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// One tab-separated row per section of each scenario's best vector. Scenarios without a result
/// get a single row carrying [NO_RESULT_NOTE].
pub fn write_table<W: io::Write>(report: &RunReport, out: W) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);
    writer.write_record([
        "scenario",
        "path",
        "section",
        "recommended_price",
        "seats",
        "sell_through_rate",
        "seats_sold",
        "section_revenue",
    ])?;

    for scenario in &report.scenarios {
        let label = scenario.scenario.as_str();
        let path = match scenario.path {
            SearchPath::Exhaustive => "exhaustive",
            SearchPath::Heuristic => "heuristic",
            SearchPath::Empty => "empty",
        };
        if scenario.rows.is_empty() {
            writer.write_record([label, path, NO_RESULT_NOTE, "", "", "", "", ""])?;
            continue;
        }
        for row in &scenario.rows {
            writer.write_record([
                label.to_string(),
                path.to_string(),
                row.section.clone(),
                format!("{:.2}", row.recommended_price),
                row.seats.to_string(),
                format!("{:.2}", row.sell_through_rate),
                row.seats_sold.to_string(),
                format!("{:.2}", row.section_revenue),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
