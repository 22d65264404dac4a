//! Benchmark orchestration and WAL-backend comparison for TPC-C runs.
//!
//! Two halves, decoupled through the filesystem: the run harness
//! ([`harness`]) drives the engine's benchmark binary once per WAL backend
//! and captures its output, and the comparator ([`compare`]) reads the CSV
//! telemetry of two labeled runs ([`metrics`]) and renders a side-by-side
//! chart grid.

pub mod compare;
pub mod harness;
pub mod metrics;
pub mod schema;
pub mod workload;
