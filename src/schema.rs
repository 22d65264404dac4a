use serde::Serialize;

use crate::harness::{BenchmarkRun, RunOutcome};

/// Machine-readable summary of one harness invocation, written as JSON when
/// the caller asks for a report file.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub schema_version: u32,
    pub tool_version: String,

    pub label: String,
    pub engine_dir: String,
    pub log_service_uri: String,
    /// Exact argument list passed to the benchmark binary.
    pub command: Vec<String>,

    /// `success` or `nonzero-exit`. Launch failures produce no report.
    pub outcome: String,
    pub exit_code: Option<i32>,
    pub duration_secs: f64,

    pub stdout_path: String,
    pub stderr_path: String,
}

impl RunReport {
    pub fn new(run: &BenchmarkRun, outcome: RunOutcome, duration_secs: f64) -> Self {
        let (outcome_str, exit_code) = match outcome {
            RunOutcome::Success => ("success", Some(0)),
            RunOutcome::NonZeroExit { code } => ("nonzero-exit", code),
        };
        Self {
            schema_version: 1,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            label: run.label.clone(),
            engine_dir: run.engine_dir.display().to_string(),
            log_service_uri: run.log_service_uri.clone(),
            command: run.command_args(),
            outcome: outcome_str.to_string(),
            exit_code,
            duration_secs,
            stdout_path: run.stdout_path().display().to_string(),
            stderr_path: run.stderr_path().display().to_string(),
        }
    }
}
