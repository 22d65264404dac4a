//! Single-shot execution of the external benchmark binary.
//!
//! One `BenchmarkRun` describes one synchronous invocation of `./tpcc` from
//! the engine's working directory. The child's stdout and stderr are captured
//! verbatim and persisted next to the CSV telemetry the engine writes, so a
//! failed run still leaves its output behind for inspection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::workload::{WorkloadConfig, TPCC_BINARY};

/// Descriptor for one benchmark invocation. Immutable after construction.
#[derive(Clone, Debug)]
pub struct BenchmarkRun {
    /// File-name prefix for all artifacts of this run and the legend key in
    /// comparison charts.
    pub label: String,
    /// Directory containing the benchmark binary; the child process runs with
    /// this as its working directory. The override is scoped to the spawn, so
    /// the harness process itself never changes directory.
    pub engine_dir: PathBuf,
    /// Replicated-log metadata URI, passed through unmodified.
    pub log_service_uri: String,
    pub workload: WorkloadConfig,
}

impl BenchmarkRun {
    pub fn new(
        label: impl Into<String>,
        engine_dir: impl Into<PathBuf>,
        log_service_uri: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            engine_dir: engine_dir.into(),
            log_service_uri: log_service_uri.into(),
            workload: WorkloadConfig::default(),
        }
    }

    /// Where this run's captured stdout is persisted.
    pub fn stdout_path(&self) -> PathBuf {
        self.engine_dir.join(format!("{}Stdout.txt", self.label))
    }

    /// Where this run's captured stderr is persisted. The `Stdrr` spelling is
    /// part of the established file contract.
    pub fn stderr_path(&self) -> PathBuf {
        self.engine_dir.join(format!("{}Stdrr.txt", self.label))
    }

    /// Full argument list handed to the benchmark binary.
    pub fn command_args(&self) -> Vec<String> {
        self.workload.command_args(&self.label, &self.log_service_uri)
    }
}

/// Completion status of a run whose child process was successfully launched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// The benchmark ran but reported failure. `code` is `None` when the
    /// child was terminated by a signal.
    NonZeroExit { code: Option<i32> },
}

impl RunOutcome {
    /// Process exit code the caller should propagate for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Success => 0,
            RunOutcome::NonZeroExit { code } => code.unwrap_or(1),
        }
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to launch `{binary}` in {dir}: {source}")]
    Launch {
        binary: String,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write captured output to {path}: {source}")]
    CaptureWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn write_capture(path: &Path, bytes: &[u8]) -> Result<(), HarnessError> {
    fs::write(path, bytes).map_err(|source| HarnessError::CaptureWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Execute one benchmark run to completion, blocking for its full duration.
///
/// On a successful launch the captured stdout/stderr are written to
/// `<label>Stdout.txt` / `<label>Stdrr.txt` in the engine directory
/// (overwriting any previous run with the same label) regardless of the
/// child's exit status, and the status is returned for the caller to act on.
/// A launch failure writes nothing and surfaces as `HarnessError::Launch`.
pub fn execute(run: &BenchmarkRun) -> Result<RunOutcome, HarnessError> {
    let args = run.command_args();
    log::info!(
        "launching {} in {} with {} flags",
        TPCC_BINARY,
        run.engine_dir.display(),
        args.len()
    );
    log::debug!("command line: {} {}", TPCC_BINARY, args.join(" "));

    let output = Command::new(TPCC_BINARY)
        .args(&args)
        .current_dir(&run.engine_dir)
        .output()
        .map_err(|source| HarnessError::Launch {
            binary: TPCC_BINARY.to_string(),
            dir: run.engine_dir.clone(),
            source,
        })?;

    let stdout_path = run.stdout_path();
    let stderr_path = run.stderr_path();
    write_capture(&stdout_path, &output.stdout)?;
    write_capture(&stderr_path, &output.stderr)?;

    println!(
        "output saved to {} and {}",
        stdout_path.display(),
        stderr_path.display()
    );

    if output.status.success() {
        Ok(RunOutcome::Success)
    } else {
        log::warn!("benchmark exited with {}", output.status);
        Ok(RunOutcome::NonZeroExit {
            code: output.status.code(),
        })
    }
}
