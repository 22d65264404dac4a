use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use walbench::compare::render_comparison;
use walbench::harness::{execute, BenchmarkRun, RunOutcome};
use walbench::schema::RunReport;

const RUN_USAGE: &str = "Usage: walbench run <label> <engine-directory> <log-service-uri>";

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute one TPC-C benchmark run and capture its output under <label>.
    Run {
        /// File-name prefix for this run's artifacts and its legend key.
        label: String,

        /// Directory containing the engine's `tpcc` binary; the run executes
        /// from here and its CSV telemetry lands here.
        engine_dir: PathBuf,

        /// Metadata URI of the replicated log service, passed through
        /// unmodified.
        log_service_uri: String,

        /// Write a JSON run report to this path.
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Render the side-by-side comparison chart for two completed runs.
    Compare {
        /// Label of the first run (drawn in blue).
        label_a: String,

        /// Label of the second run (drawn in red).
        label_b: String,

        /// Directory holding both runs' CSV telemetry.
        #[arg(long, value_name = "DIR", default_value = ".")]
        data_dir: PathBuf,

        /// Output image path.
        #[arg(long, value_name = "FILE", default_value = "comparison.png")]
        out: PathBuf,
    },
}

#[derive(Parser, Debug)]
#[command(name = "walbench")]
#[command(about = "TPC-C benchmark orchestration and WAL-backend comparison charts")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

fn write_report(path: &PathBuf, report: &RunReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write run report to {}", path.display()))?;
    Ok(())
}

fn cmd_run(
    label: String,
    engine_dir: PathBuf,
    log_service_uri: String,
    report: Option<PathBuf>,
) -> i32 {
    if label.is_empty() || engine_dir.as_os_str().is_empty() || log_service_uri.is_empty() {
        println!("{RUN_USAGE}");
        return 1;
    }

    let run = BenchmarkRun::new(label, engine_dir, log_service_uri);
    let started = Instant::now();
    let outcome = match execute(&run) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("{err}");
            return 1;
        }
    };
    let duration = started.elapsed().as_secs_f64();

    if let Some(path) = report {
        let report = RunReport::new(&run, outcome, duration);
        if let Err(err) = write_report(&path, &report) {
            log::error!("{err:#}");
            return 1;
        }
    }

    if let RunOutcome::NonZeroExit { code } = outcome {
        log::error!(
            "benchmark run `{}` exited with code {:?}; captured output kept",
            run.label,
            code
        );
    }
    outcome.exit_code()
}

fn cmd_compare(label_a: String, label_b: String, data_dir: PathBuf, out: PathBuf) -> i32 {
    match render_comparison(&data_dir, &label_a, &label_b, &out) {
        Ok(()) => {
            println!("comparison saved to {}", out.display());
            0
        }
        Err(err) => {
            log::error!("{err}");
            1
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
        ) =>
        {
            print!("{err}");
            process::exit(0);
        }
        Err(err) => {
            // Argument errors are part of the CLI contract: usage on stdout,
            // exit status 1, no I/O performed.
            println!("{err}");
            process::exit(1);
        }
    };

    let code = match args.cmd {
        Command::Run {
            label,
            engine_dir,
            log_service_uri,
            report,
        } => cmd_run(label, engine_dir, log_service_uri, report),
        Command::Compare {
            label_a,
            label_b,
            data_dir,
            out,
        } => cmd_compare(label_a, label_b, data_dir, out),
    };
    process::exit(code);
}
