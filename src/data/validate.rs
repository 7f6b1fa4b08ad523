use std::fmt;

use crate::data::config::EngineConfig;
use crate::optimizer::candidates::section_candidates;
use crate::optimizer::exhaustive::CandidateProduct;
use crate::optimizer::revenue::SellRatePolicy;

/// Margin range offered by the pricing dashboard; values outside it are legal but unusual.
pub const RECOMMENDED_MARGIN_RANGE: (f64, f64) = (2.0, 20.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

fn check_policy(report: &mut ValidationReport, field: &str, policy: SellRatePolicy) {
    if let SellRatePolicy::Fixed(rate) = policy {
        if !(rate > 0.0 && rate <= 1.0) {
            report.push(
                ValidationSeverity::Error,
                field,
                format!("fixed sell-through rate must be in (0, 1], got {rate}"),
            );
        }
    }
}

pub fn validate_config(config: &EngineConfig) -> ValidationReport {
    use ValidationSeverity::{Error, Info, Warning};
    let mut report = ValidationReport::default();

    if config.sections.is_empty() {
        report.push(Error, "sections", "at least one section is required");
    }
    for (index, section) in config.sections.iter().enumerate() {
        let context = format!("sections[{index}]");
        if section.seats == 0 {
            report.push(Error, context.as_str(), "seats must be positive");
        }
        if section.name.trim().is_empty() {
            report.push(Warning, context.as_str(), "name is empty");
        }
    }

    if !(config.target_revenue.is_finite() && config.target_revenue > 0.0) {
        report.push(Error, "target_revenue", "must be a positive number");
    }

    if !config.margin_percent.is_finite() || !(0.0..=100.0).contains(&config.margin_percent) {
        report.push(Error, "margin_percent", "must be between 0 and 100");
    } else {
        let (lo, hi) = RECOMMENDED_MARGIN_RANGE;
        if !(lo..=hi).contains(&config.margin_percent) {
            report.push(
                Warning,
                "margin_percent",
                format!("outside the usual {lo}-{hi}% range"),
            );
        }
    }

    if !config.global_min.is_finite() || !config.global_max.is_finite() {
        report.push(Error, "global_min/global_max", "price bounds must be finite");
    } else if !config.bounds().is_proper() {
        report.push(
            Warning,
            "global_min/global_max",
            "global_max <= global_min; every section gets the single price global_min",
        );
    }

    if config.top_k == 0 {
        report.push(Error, "top_k", "must be at least 1");
    }
    if config.max_combinations == 0 {
        report.push(
            Warning,
            "max_combinations",
            "0 disables the grid search; every scenario goes to the heuristic",
        );
    }
    if config.heuristic_trials == 0 {
        report.push(
            Warning,
            "heuristic_trials",
            "0 disables the heuristic fallback; scenarios without a grid result stay empty",
        );
    }
    if config.scenarios.is_empty() {
        report.push(Warning, "scenarios", "no scenarios configured; nothing will be solved");
    }
    for scenario in config.scenarios.iter().filter(|s| !s.is_recognized()) {
        report.push(
            Warning,
            "scenarios",
            format!("unrecognized scenario '{scenario}' uses the full price grid and a 0.95 rate"),
        );
    }
    if config.pin_endpoints && config.sections.len() == 1 {
        report.push(Warning, "pin_endpoints", "ignored for a single section");
    }

    check_policy(&mut report, "heuristic_rate", config.heuristic_rate);
    check_policy(&mut report, "ranking_rate", config.ranking_rate);

    if !report.has_errors() {
        for scenario in &config.scenarios {
            let sets = section_candidates(
                config.sections.len(),
                config.bounds(),
                scenario,
                config.pin_endpoints,
            );
            let product = CandidateProduct::total(&sets);
            let examined = product.min(config.max_combinations);
            report.push(
                Info,
                format!("scenario {scenario}"),
                format!(
                    "{product} grid combination(s), {examined} examined (cap {})",
                    config.max_combinations
                ),
            );
        }
    }

    report
}
