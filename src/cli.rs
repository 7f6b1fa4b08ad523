use std::io;

use crate::data::config::{load_config, EngineConfig};
use crate::data::validate::{validate_config, ValidationSeverity};
use crate::model::Scenario;
use crate::optimizer::candidates::generate_candidates;
use crate::optimizer::{optimize_all_in, SearchPath};
use crate::parallel::WorkerPool;
use crate::report::{build_report, render_json, write_table};

const USAGE: &str = "usage: pricemaster <solve|candidates|validate|defaults>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Solve,
    Candidates,
    Validate,
    Defaults,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("solve") => Some(Command::Solve),
        Some("candidates") => Some(Command::Candidates),
        Some("validate") => Some(Command::Validate),
        Some("defaults") => Some(Command::Defaults),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Solve) => handle_solve(args),
        Some(Command::Candidates) => handle_candidates(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Defaults) => handle_defaults(),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Value following `--name`, if present.
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a String> {
    args.iter()
        .position(|arg| arg == name)
        .and_then(|index| args.get(index + 1))
}

/// First positional argument after the command, skipping flags and their values.
fn positional_path(args: &[String]) -> Option<&str> {
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" | "--workers" => {
                iter.next();
            }
            "--table" => {}
            other => return Some(other),
        }
    }
    None
}

fn load_or_default(path: Option<&str>) -> Result<EngineConfig, i32> {
    match path {
        None => Ok(EngineConfig::default()),
        Some(path) => load_config(path).map_err(|err| {
            eprintln!("config: {path}: {err}");
            1
        }),
    }
}

fn handle_solve(args: &[String]) -> i32 {
    let mut config = match load_or_default(positional_path(args)) {
        Ok(config) => config,
        Err(code) => return code,
    };
    if let Some(raw) = flag_value(args, "--seed") {
        match raw.parse::<u64>() {
            Ok(seed) => config.seed = Some(seed),
            Err(_) => eprintln!("invalid seed '{raw}', ignoring"),
        }
    }
    let workers = parse_usize_arg(flag_value(args, "--workers"), "workers", 0);
    let as_table = args.iter().any(|arg| arg == "--table");

    let validation = validate_config(&config);
    for diag in &validation.diagnostics {
        if diag.severity != ValidationSeverity::Info {
            eprintln!("config: {diag}");
        }
    }
    if validation.has_errors() {
        eprintln!(
            "config: refusing to solve, {} error(s)",
            validation.count(ValidationSeverity::Error)
        );
        return 1;
    }

    let run = optimize_all_in(&config, &WorkerPool::with_workers(workers));
    for outcome in &run.outcomes {
        if outcome.stats.truncated {
            eprintln!(
                "solve: scenario {}: combination cap reached, examined {} of {}",
                outcome.scenario, outcome.stats.examined, outcome.stats.product_size
            );
        }
        match outcome.path {
            SearchPath::Exhaustive => {}
            SearchPath::Heuristic => eprintln!(
                "solve: scenario {}: exhaustive search found no valid combination, used heuristic search ({} of {} trials accepted)",
                outcome.scenario, outcome.stats.heuristic_accepted, outcome.stats.heuristic_trials
            ),
            SearchPath::Empty => eprintln!(
                "solve: scenario {}: no valid combinations found, adjust the parameters",
                outcome.scenario
            ),
        }
    }
    let report = build_report(&config, &run);

    if as_table {
        if let Err(err) = write_table(&report, io::stdout().lock()) {
            eprintln!("solve: {err}");
            return 1;
        }
        return 0;
    }

    match render_json(&report) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize optimization report: {err}");
            1
        }
    }
}

fn handle_candidates(args: &[String]) -> i32 {
    let (Some(min), Some(max), Some(label)) = (args.get(2), args.get(3), args.get(4)) else {
        eprintln!("usage: pricemaster candidates <min> <max> <scenario>");
        return 2;
    };
    let (Ok(min), Ok(max)) = (min.parse::<f64>(), max.parse::<f64>()) else {
        eprintln!("candidates: min and max must be numbers");
        return 2;
    };

    let scenario = Scenario::parse(label);
    let payload = serde_json::json!({
        "scenario": scenario,
        "sell_through_rate": scenario.sell_through_rate(),
        "candidates": generate_candidates(min, max, &scenario),
    });
    match serde_json::to_string_pretty(&payload) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize candidates: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: pricemaster validate <config.yaml|config.json>");
        return 2;
    };
    let config = match load_or_default(Some(path)) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let report = validate_config(&config);
    for diag in &report.diagnostics {
        println!("{diag}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} issue(s)",
            report.count(ValidationSeverity::Error)
        );
        1
    } else {
        println!("validation passed: {path}");
        0
    }
}

fn handle_defaults() -> i32 {
    match serde_yaml::to_string(&EngineConfig::default()) {
        Ok(yaml) => {
            print!("{yaml}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize default config: {err}");
            1
        }
    }
}

fn parse_usize_arg(raw: Option<&String>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
