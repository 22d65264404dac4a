//! The metric file contract shared between the harness and the comparator.
//!
//! The engine writes five CSV telemetry tables per run, named
//! `<label>_<tag>.csv`, each keyed by a time column `t`. This module only
//! reads them; generation is entirely the engine's business, including
//! sampling interval and row count.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The five telemetry categories the engine emits per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Buffer-manager page consumption and I/O volume.
    BufferManager,
    /// CPU utilization and clock speed.
    Cpu,
    /// Commit/abort rates.
    CommitRate,
    /// Data throughput.
    DataThroughput,
    /// Per-transaction latency percentiles.
    Latency,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::BufferManager,
        Category::Cpu,
        Category::CommitRate,
        Category::DataThroughput,
        Category::Latency,
    ];

    /// File-name tag, as emitted by the engine's `--csv_path` writer.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::BufferManager => "bm",
            Category::Cpu => "cpu",
            Category::CommitRate => "cr",
            Category::DataThroughput => "dt",
            Category::Latency => "latency",
        }
    }

    /// Value columns the contract guarantees for this category, beyond `t`.
    /// `dt` and `latency` carry engine-defined columns with no fixed set.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Category::BufferManager => &["consumed_pages", "r_mib", "w_mib"],
            Category::Cpu => &["CPU", "GHz"],
            Category::CommitRate => &["tx_abort"],
            Category::DataThroughput => &[],
            Category::Latency => &[],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Path of one metric file: `<dir>/<label>_<tag>.csv`.
pub fn series_path(dir: &Path, label: &str, category: Category) -> PathBuf {
    dir.join(format!("{label}_{}.csv", category.tag()))
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("missing metric file for label `{label}`, category `{category}`: {path}")]
    MissingFile {
        label: String,
        category: Category,
        path: PathBuf,
    },
    #[error("malformed metric file for label `{label}`, category `{category}` ({path}): {source}")]
    Malformed {
        label: String,
        category: Category,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("metric file {path} has no `{column}` column (label `{label}`, category `{category}`)")]
    MissingColumn {
        label: String,
        category: Category,
        path: PathBuf,
        column: String,
    },
    #[error("non-numeric value `{value}` in {path}, column `{column}`, row {row}")]
    BadValue {
        path: PathBuf,
        column: String,
        row: usize,
        value: String,
    },
}

/// One time-indexed telemetry table for one run.
///
/// All numeric columns are retained; columns with values that do not parse as
/// numbers are dropped unless the contract requires them, in which case the
/// load fails. The two runs of a comparison are never resampled or truncated
/// against each other.
#[derive(Clone, Debug)]
pub struct MetricSeries {
    pub label: String,
    pub category: Category,
    pub t: Vec<f64>,
    columns: HashMap<String, Vec<f64>>,
}

impl MetricSeries {
    /// Load `<dir>/<label>_<tag>.csv`, validating the contract for
    /// `category`.
    pub fn load(dir: &Path, label: &str, category: Category) -> Result<Self, MetricsError> {
        let path = series_path(dir, label, category);
        if !path.is_file() {
            return Err(MetricsError::MissingFile {
                label: label.to_string(),
                category,
                path,
            });
        }

        let malformed = |source| MetricsError::Malformed {
            label: label.to_string(),
            category,
            path: path.clone(),
            source,
        };

        let mut reader = csv::Reader::from_path(&path).map_err(malformed)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(malformed)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let required_present = |column: &str| -> Result<(), MetricsError> {
            if headers.iter().any(|h| h == column) {
                Ok(())
            } else {
                Err(MetricsError::MissingColumn {
                    label: label.to_string(),
                    category,
                    path: path.clone(),
                    column: column.to_string(),
                })
            }
        };
        required_present("t")?;
        for column in category.required_columns() {
            required_present(column)?;
        }

        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record.map_err(malformed)?);
        }

        let mut t = Vec::new();
        let mut columns: HashMap<String, Vec<f64>> = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            let mandatory = name == "t"
                || category.required_columns().iter().any(|c| c == name);

            let mut values = Vec::with_capacity(records.len());
            let mut parse_ok = true;
            for (row, record) in records.iter().enumerate() {
                let field = record.get(idx).unwrap_or("").trim();
                match field.parse::<f64>() {
                    Ok(v) => values.push(v),
                    Err(_) if mandatory => {
                        return Err(MetricsError::BadValue {
                            path: path.clone(),
                            column: name.clone(),
                            row,
                            value: field.to_string(),
                        });
                    }
                    Err(_) => {
                        parse_ok = false;
                        break;
                    }
                }
            }
            if !parse_ok {
                continue;
            }
            if name == "t" {
                t = values;
            } else {
                columns.insert(name.clone(), values);
            }
        }

        Ok(Self {
            label: label.to_string(),
            category,
            t,
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Values of a named column, if present and numeric.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// `(t, value)` pairs for a named column.
    pub fn points(&self, name: &str) -> Option<Vec<(f64, f64)>> {
        let values = self.column(name)?;
        Some(self.t.iter().copied().zip(values.iter().copied()).collect())
    }
}

/// All five metric tables of one labeled run.
#[derive(Clone, Debug)]
pub struct RunMetrics {
    pub label: String,
    series: HashMap<Category, MetricSeries>,
}

impl RunMetrics {
    /// Load the full category set for `label` from `dir`. Fails on the first
    /// missing or malformed file; no partial set is returned.
    pub fn load(dir: &Path, label: &str) -> Result<Self, MetricsError> {
        let mut series = HashMap::new();
        for category in Category::ALL {
            series.insert(category, MetricSeries::load(dir, label, category)?);
        }
        Ok(Self {
            label: label.to_string(),
            series,
        })
    }

    pub fn series(&self, category: Category) -> &MetricSeries {
        // Every category is populated by construction.
        &self.series[&category]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_bm(dir: &Path, label: &str, rows: &[(f64, f64, f64, f64)]) {
        let mut body = String::from("t,consumed_pages,r_mib,w_mib\n");
        for (t, c, r, w) in rows {
            body.push_str(&format!("{t},{c},{r},{w}\n"));
        }
        fs::write(series_path(dir, label, Category::BufferManager), body).unwrap();
    }

    #[test]
    fn loads_numeric_columns() {
        let dir = tempdir().unwrap();
        write_bm(dir.path(), "BC", &[(0.0, 10.0, 1.5, 2.5), (1.0, 20.0, 3.0, 4.0)]);

        let s = MetricSeries::load(dir.path(), "BC", Category::BufferManager).unwrap();
        assert_eq!(s.t, vec![0.0, 1.0]);
        assert_eq!(s.column("consumed_pages").unwrap(), &[10.0, 20.0]);
        assert_eq!(s.points("w_mib").unwrap(), vec![(0.0, 2.5), (1.0, 4.0)]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn missing_file_names_label_and_category() {
        let dir = tempdir().unwrap();
        let err = MetricSeries::load(dir.path(), "File", Category::Cpu).unwrap_err();
        assert!(matches!(err, MetricsError::MissingFile { .. }));
        let msg = err.to_string();
        assert!(msg.contains("File"));
        assert!(msg.contains("cpu"));
    }

    #[test]
    fn missing_t_column_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            series_path(dir.path(), "BC", Category::Latency),
            "50p,99p\n1.0,2.0\n",
        )
        .unwrap();
        let err = MetricSeries::load(dir.path(), "BC", Category::Latency).unwrap_err();
        assert!(matches!(err, MetricsError::MissingColumn { ref column, .. } if column == "t"));
    }

    #[test]
    fn missing_required_value_column_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            series_path(dir.path(), "BC", Category::CommitRate),
            "t,tx_commit\n0,5\n",
        )
        .unwrap();
        let err = MetricSeries::load(dir.path(), "BC", Category::CommitRate).unwrap_err();
        assert!(
            matches!(err, MetricsError::MissingColumn { ref column, .. } if column == "tx_abort")
        );
    }

    #[test]
    fn non_numeric_optional_column_is_dropped() {
        let dir = tempdir().unwrap();
        fs::write(
            series_path(dir.path(), "BC", Category::DataThroughput),
            "t,phase,tx\n0,warmup,100\n1,run,200\n",
        )
        .unwrap();
        let s = MetricSeries::load(dir.path(), "BC", Category::DataThroughput).unwrap();
        assert!(s.column("phase").is_none());
        assert_eq!(s.column("tx").unwrap(), &[100.0, 200.0]);
    }

    #[test]
    fn non_numeric_t_is_a_bad_value() {
        let dir = tempdir().unwrap();
        fs::write(
            series_path(dir.path(), "BC", Category::DataThroughput),
            "t,tx\n0,100\noops,200\n",
        )
        .unwrap();
        let err = MetricSeries::load(dir.path(), "BC", Category::DataThroughput).unwrap_err();
        assert!(matches!(err, MetricsError::BadValue { row: 1, .. }));
    }

    #[test]
    fn run_metrics_requires_all_five_files() {
        let dir = tempdir().unwrap();
        write_bm(dir.path(), "BC", &[(0.0, 1.0, 1.0, 1.0)]);
        let err = RunMetrics::load(dir.path(), "BC").unwrap_err();
        assert!(matches!(err, MetricsError::MissingFile { .. }));
    }
}
