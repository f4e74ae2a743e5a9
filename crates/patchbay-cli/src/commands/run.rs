//! Drive a demo patch for a number of update cycles.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use crate::config::HarnessConfig;
use crate::patches::{Patch, PatchKind};

#[derive(Args)]
pub struct RunArgs {
    /// Patch to build
    #[arg(value_enum)]
    patch: PatchKind,

    /// Harness settings file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of update cycles
    #[arg(short = 'n', long)]
    cycles: Option<usize>,

    /// Cycles per two periods of the sine drive
    #[arg(long)]
    period: Option<usize>,

    /// Peak amplitude of the sine drive
    #[arg(long)]
    amplitude: Option<f32>,

    /// Lowpass cutoff coefficient (0.0 to 0.99)
    #[arg(long)]
    cutoff: Option<f32>,

    /// Lowpass resonance (0.0 to 1.0)
    #[arg(long)]
    resonance: Option<f32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// One row of the report.
#[derive(Debug, Serialize)]
struct CycleReport {
    cycle: usize,
    drive: f32,
    outputs: BTreeMap<&'static str, f32>,
}

/// Whole-run report, as printed with `--json`.
#[derive(Debug, Serialize)]
struct RunReport {
    patch: &'static str,
    config: HarnessConfig,
    cycles: Vec<CycleReport>,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    tracing::debug!(?config, "harness settings");

    let mut patch = Patch::build(args.patch, &config)
        .with_context(|| format!("failed to build patch '{}'", args.patch.name()))?;
    let labels = patch.labels();

    let mut cycles = Vec::with_capacity(config.cycles);
    for i in 0..config.cycles {
        let drive = config.drive(i);
        let values = patch
            .step(drive)
            .with_context(|| format!("update failed at cycle {i}"))?;
        cycles.push(CycleReport {
            cycle: i,
            drive,
            outputs: labels.iter().copied().zip(values).collect(),
        });
    }
    tracing::info!(patch = args.patch.name(), cycles = config.cycles, "run complete");

    if args.json {
        let report = RunReport {
            patch: args.patch.name(),
            config,
            cycles,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{:>6}  {:>12}", "cycle", "drive");
    for label in &labels {
        print!("  {label:>12}");
    }
    println!();
    for row in &cycles {
        print!("{:>6}  {:>12.6}", row.cycle, row.drive);
        for label in &labels {
            print!("  {:>12.6}", row.outputs[label]);
        }
        println!();
    }
    Ok(())
}

/// File settings (or defaults), overridden by command-line flags.
fn resolve_config(args: &RunArgs) -> anyhow::Result<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(cycles) = args.cycles {
        config.cycles = cycles;
    }
    if let Some(period) = args.period {
        config.drive_period = period;
    }
    if let Some(amplitude) = args.amplitude {
        config.drive_amplitude = amplitude;
    }
    if let Some(cutoff) = args.cutoff {
        config.cutoff = cutoff;
    }
    if let Some(resonance) = args.resonance {
        config.resonance = resonance;
    }
    config.validate()?;
    Ok(config)
}
