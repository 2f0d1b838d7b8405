// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! LAE command-line tool
//!
//! Reads a JSON matrix expression, reduces it on a fatigue-aware worker pool
//! and writes `{"result": ...}` (or `{"error": ...}`) to the output path.
//!
//! Usage: lae <WORKERS> <INPUT> <OUTPUT> [--config <PATH>] [--debug <CRATE>]...

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lae::config::{load_config_or_default, validate_config, LaeConfig};
use lae::engine::LinearAlgebraEngine;
use lae::io::{parse_file, write as write_output, OutputPayload};
use lae::observability::{init_logging, CrateDebugFlags};
use lae::scheduling::WorkerStats;
use tracing::{debug, error, info, warn};

/// Linear Algebra Engine - evaluate a matrix expression file
#[derive(Parser, Debug)]
#[command(name = "lae", version, long_about = None)]
struct Args {
    /// Number of worker threads
    workers: usize,

    /// Expression file (JSON)
    input: PathBuf,

    /// Result file, overwritten on success and on failure
    output: PathBuf,

    /// Configuration file (default: search for lae_configuration.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for worker fatigue multipliers
    #[arg(long)]
    seed: Option<u64>,

    /// Write per-worker statistics as JSON to this path
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Enable debug logging for a crate (repeatable, e.g. --debug lae-engine)
    #[arg(long = "debug", value_name = "CRATE")]
    debug: Vec<String>,

    /// Enable debug logging for all crates
    #[arg(long, default_value_t = false)]
    debug_all: bool,
}

struct Evaluation {
    report: String,
    stats: Vec<WorkerStats>,
}

fn main() -> ExitCode {
    let started = Instant::now();
    let args = Args::parse();
    let flags = debug_flags(&args);

    let config = match load_settings(&args) {
        Ok(config) => config,
        Err(e) => {
            if let Err(log_err) = init_logging(&flags, "info", false) {
                eprintln!("Failed to initialize logging: {:#}", log_err);
            }
            return fail(&args.output, &e, true);
        }
    };
    if let Err(e) = init_logging(&flags, &config.logging.level, config.logging.show_target) {
        eprintln!("Failed to initialize logging: {:#}", e);
    }
    for name in flags.unknown_crates() {
        warn!(crate_name = name, "Ignoring --debug for unknown crate");
    }

    match evaluate(&args, &config) {
        Ok(evaluation) => {
            let seconds = started.elapsed().as_secs_f64();
            for line in evaluation.report.lines() {
                info!("{}", line);
            }
            info!(seconds, "Finished");

            if config.output.print_report {
                println!("{}", evaluation.report);
                println!(" time in seconds: {}", seconds);
            }
            if let Some(path) = &args.stats {
                if let Err(e) = write_stats(&evaluation.stats, path) {
                    error!("{:#}", e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&args.output, &e, config.output.pretty),
    }
}

fn debug_flags(args: &Args) -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_crates(&args.debug);
    if args.debug_all {
        flags.enable_all();
    }
    flags.merge(CrateDebugFlags::from_env());
    flags
}

fn load_settings(args: &Args) -> Result<LaeConfig> {
    let mut overrides = HashMap::new();
    overrides.insert("workers".to_string(), args.workers.to_string());
    if let Some(seed) = args.seed {
        overrides.insert("fatigue_seed".to_string(), seed.to_string());
    }

    let config = load_config_or_default(args.config.as_deref(), Some(&overrides))?;
    validate_config(&config)?;
    Ok(config)
}

fn evaluate(args: &Args, config: &LaeConfig) -> Result<Evaluation> {
    let mut graph = parse_file(&args.input)?;
    graph.normalize();
    debug!(nodes = graph.node_count(), "Expression loaded");

    let mut engine = LinearAlgebraEngine::with_config(&config.scheduler)?;
    let reduced = engine.run(graph)?;

    let payload = OutputPayload::from_matrix(reduced.root_matrix()?);
    write_output(&payload, &args.output, config.output.pretty)?;

    Ok(Evaluation {
        report: engine.worker_report(),
        stats: engine.worker_stats(),
    })
}

fn write_stats(stats: &[WorkerStats], path: &Path) -> Result<()> {
    let body = serde_json::to_string_pretty(stats).context("Failed to serialize worker stats")?;
    fs::write(path, body)
        .with_context(|| format!("Failed to write worker stats to {}", path.display()))
}

/// Record `err` in the output file and log it
fn fail(output: &Path, err: &anyhow::Error, pretty: bool) -> ExitCode {
    error!("{}", err);
    let payload = OutputPayload::from_error(err.to_string());
    if let Err(write_err) = write_output(&payload, output, pretty) {
        error!("Could not record the error in the output file: {}", write_err);
    }
    ExitCode::FAILURE
}
