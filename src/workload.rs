//! Workload parameters for one TPC-C benchmark invocation.
//!
//! The engine's benchmark binary is configured entirely through CLI flags.
//! `WorkloadConfig` enumerates every flag with a named field so callers can
//! override any subset; the defaults reproduce the canonical comparison
//! workload flag-for-flag.

use serde::Serialize;

/// Name of the benchmark binary, resolved relative to the engine working
/// directory.
pub const TPCC_BINARY: &str = "./tpcc";

/// Transaction isolation level understood by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    #[default]
    SnapshotIsolation,
    Serializable,
}

impl IsolationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "ru",
            IsolationLevel::ReadCommitted => "rc",
            IsolationLevel::SnapshotIsolation => "si",
            IsolationLevel::Serializable => "ser",
        }
    }
}

/// Full set of workload parameters passed to the benchmark binary.
///
/// Defaults match the reference comparison run: a small single-warehouse
/// workload with latency profiling on, short enough to iterate on quickly.
#[derive(Clone, Debug, Serialize)]
pub struct WorkloadConfig {
    /// Number of TPC-C warehouses.
    pub warehouse_count: u32,
    /// Pin each worker to a home warehouse. Off for the comparison workload.
    pub warehouse_affinity: bool,
    /// Transaction worker threads.
    pub worker_threads: u32,
    /// Page-provider (post-processing) threads.
    pub pp_threads: u32,
    /// Target percentage of free pages maintained by the buffer manager.
    pub free_pct: u32,
    /// Enable contention-triggered B-tree node splits.
    pub contention_split: bool,
    /// Enable cross-node page merging.
    pub xmerge: bool,
    /// Warm-up phase length in seconds (not measured).
    pub warmup_seconds: u32,
    /// Measured run length in seconds.
    pub run_seconds: u32,
    pub isolation_level: IsolationLevel,
    /// Classpath roots for the replicated-log client library, relative to the
    /// engine working directory.
    pub jar_directories: Vec<String>,
    /// Synchronous page-write mode for the WAL.
    pub wal_pwrite: bool,
    /// Record per-transaction latency telemetry.
    pub profile_latency: bool,
    /// WAL backend variant selector understood by the engine.
    pub wal_variant: u32,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            warehouse_count: 1,
            warehouse_affinity: false,
            worker_threads: 4,
            pp_threads: 16,
            free_pct: 1,
            contention_split: true,
            xmerge: true,
            warmup_seconds: 1,
            run_seconds: 2,
            isolation_level: IsolationLevel::SnapshotIsolation,
            jar_directories: vec![
                "../../bookkeeper-wal/target".to_string(),
                "../../bookkeeper-wal/target/maven-dependencies".to_string(),
            ],
            wal_pwrite: true,
            profile_latency: true,
            wal_variant: 0,
        }
    }
}

impl WorkloadConfig {
    /// Build the argument list for one run.
    ///
    /// `label` becomes the CSV file-name prefix and `uri` the replicated-log
    /// metadata URI; both are passed through literally. The caller is
    /// responsible for supplying values safe to use as file-name prefixes.
    pub fn command_args(&self, label: &str, log_service_uri: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(16);

        args.push(format!("--tpcc_warehouse_count={}", self.warehouse_count));
        if !self.warehouse_affinity {
            args.push("--notpcc_warehouse_affinity".to_string());
        }
        args.push(format!("--worker_threads={}", self.worker_threads));
        args.push(format!("--pp_threads={}", self.pp_threads));
        args.push(format!("--free_pct={}", self.free_pct));
        if self.contention_split {
            args.push("--contention_split".to_string());
        }
        if self.xmerge {
            args.push("--xmerge".to_string());
        }
        args.push(format!("--warmup_for_seconds={}", self.warmup_seconds));
        args.push(format!("--run_for_seconds={}", self.run_seconds));
        args.push(format!("--isolation_level={}", self.isolation_level.as_str()));
        args.push(format!(
            "--bookkeeper_jar_directories={}",
            self.jar_directories.join(":")
        ));
        args.push(format!("--wal_pwrite={}", self.wal_pwrite));
        args.push(format!("--profile_latency={}", self.profile_latency));
        args.push(format!("--csv_path={label}"));
        args.push(format!("--wal_variant={}", self.wal_variant));
        args.push(format!("--bookkeeper_metadata_uri={log_service_uri}"));

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_match_reference_workload() {
        let args = WorkloadConfig::default().command_args("BC", "zk://localhost:2181/ledgers");
        let expected = vec![
            "--tpcc_warehouse_count=1",
            "--notpcc_warehouse_affinity",
            "--worker_threads=4",
            "--pp_threads=16",
            "--free_pct=1",
            "--contention_split",
            "--xmerge",
            "--warmup_for_seconds=1",
            "--run_for_seconds=2",
            "--isolation_level=si",
            "--bookkeeper_jar_directories=../../bookkeeper-wal/target:../../bookkeeper-wal/target/maven-dependencies",
            "--wal_pwrite=true",
            "--profile_latency=true",
            "--csv_path=BC",
            "--wal_variant=0",
            "--bookkeeper_metadata_uri=zk://localhost:2181/ledgers",
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn label_and_uri_are_passed_through_literally() {
        let args = WorkloadConfig::default().command_args("File", "bk://10.0.0.7:4181");
        assert!(args.contains(&"--csv_path=File".to_string()));
        assert!(args.contains(&"--bookkeeper_metadata_uri=bk://10.0.0.7:4181".to_string()));
    }

    #[test]
    fn boolean_toggles_control_flag_presence() {
        let cfg = WorkloadConfig {
            warehouse_affinity: true,
            contention_split: false,
            xmerge: false,
            ..Default::default()
        };
        let args = cfg.command_args("x", "u");
        assert!(!args.iter().any(|a| a == "--notpcc_warehouse_affinity"));
        assert!(!args.iter().any(|a| a == "--contention_split"));
        assert!(!args.iter().any(|a| a == "--xmerge"));
    }

    #[test]
    fn overrides_flow_into_flags() {
        let cfg = WorkloadConfig {
            warehouse_count: 8,
            worker_threads: 32,
            run_seconds: 60,
            isolation_level: IsolationLevel::Serializable,
            wal_variant: 1,
            ..Default::default()
        };
        let args = cfg.command_args("x", "u");
        assert!(args.contains(&"--tpcc_warehouse_count=8".to_string()));
        assert!(args.contains(&"--worker_threads=32".to_string()));
        assert!(args.contains(&"--run_for_seconds=60".to_string()));
        assert!(args.contains(&"--isolation_level=ser".to_string()));
        assert!(args.contains(&"--wal_variant=1".to_string()));
    }
}
