//! Command-line runner for the lattice simulation studies.
//!
//! Loads a JSON study configuration, runs one study and prints its results as
//! whitespace-delimited rows on stdout.

mod output;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use latsim_core::StudyConfig;
use latsim_world::{stats, study};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// Run a lattice simulation study.
#[derive(Parser)]
#[command(name = "latsim-runner", about = "Life and SIRS lattice simulation studies")]
struct Args {
    /// JSON study configuration; defaults are used for anything omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    study: Study,
}

#[derive(Subcommand)]
enum Study {
    /// Equilibrium times of random automaton trials, as a histogram.
    Equilibrium {
        /// Print one equilibrium time per trial instead of the histogram.
        #[arg(long)]
        raw: bool,
    },
    /// Centre-of-mass trajectory of a glider.
    Glider,
    /// Mean infected fraction over the (p1, p3) grid.
    Phase,
    /// Variance of the infected fraction along p1, with bootstrap errors.
    Variance,
}

fn load_config(path: Option<&PathBuf>) -> Result<StudyConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(StudyConfig::from_json(&json)?)
        }
        None => Ok(StudyConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry()?;

    let config = load_config(args.config.as_ref())?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match args.study {
        Study::Equilibrium { raw } => {
            let times = study::equilibrium_times(&config.life)?;
            let reached: Vec<usize> = times.into_iter().flatten().collect();
            if raw {
                output::write_values(&mut out, &reached)?;
            } else {
                let bins = stats::histogram(
                    &reached,
                    config.life.histogram_bin_width,
                    config.life.histogram_upper,
                )?;
                output::write_histogram(&mut out, &bins)?;
            }
        }
        Study::Glider => {
            let run = study::glider_trajectory(&config.life)?;
            output::write_trajectory(&mut out, &run.samples)?;
            if let Some((vr, vc)) = run.velocity {
                info!("Glider velocity: ({:.5}, {:.5}) cells/step", vr, vc);
            }
        }
        Study::Phase => {
            let matrix = study::phase_diagram(&config.sirs)?;
            output::write_matrix(&mut out, &matrix)?;
        }
        Study::Variance => {
            let points = study::variance_scan(&config.sirs)?;
            output::write_variance(&mut out, &points)?;
        }
    }

    out.flush()?;
    Ok(())
}
