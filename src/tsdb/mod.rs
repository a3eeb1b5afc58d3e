use crate::common::units::SECONDS;
use crate::error::Error;
use arrow::array::{Float64Array, Int64Array, UInt64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

mod sample;
mod series;
mod stats;

pub use sample::{sample, SamplingDirective, MAX_RENDER_POINTS};
pub use series::Series;
pub use stats::{describe, SeriesStats, DEFAULT_PTILE_RANGE};

/// An ordered numeric table loaded from a parquet recording: one series per
/// named value column, all sharing a nanosecond `timestamp` column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tsdb {
    columns: BTreeMap<String, Series>,
    source: String,
    version: String,
    filename: String,
}

impl Tsdb {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut data = Tsdb {
            filename: path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or_default()
                .to_string(),
            ..Default::default()
        };

        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        // recordings may carry their producer in the file metadata
        if let Some(pairs) = builder.metadata().file_metadata().key_value_metadata() {
            for pair in pairs {
                match (pair.key.as_str(), &pair.value) {
                    ("source", Some(v)) => data.source = v.clone(),
                    ("version", Some(v)) => data.version = v.clone(),
                    _ => {}
                }
            }
        }

        let reader = builder.build()?;

        for batch in reader.into_iter().flatten() {
            let schema = batch.schema().clone();

            // row to timestamp in nanoseconds
            let mut timestamps: BTreeMap<usize, u64> = BTreeMap::new();
            let mut found = false;

            // loop to find the timestamp column and store it in the map
            for (id, field) in schema.fields().iter().enumerate() {
                if field.name() == "timestamp" {
                    let column = batch.column(id);

                    if *column.data_type() != DataType::UInt64 {
                        return Err(Error::TypeMismatch(format!(
                            "timestamp column must be uint64 nanoseconds, found: {:?}",
                            column.data_type()
                        )));
                    }

                    let values = column
                        .as_any()
                        .downcast_ref::<UInt64Array>()
                        .expect("failed to downcast");

                    for (row, value) in values.iter().enumerate() {
                        if let Some(v) = value {
                            timestamps.insert(row, v);
                        }
                    }

                    found = true;
                    break;
                }
            }

            if !found {
                return Err(Error::TypeMismatch(
                    "recording has no timestamp column".to_string(),
                ));
            }

            // loop through all non-timestamp columns, and insert them into
            // the table
            for (id, field) in schema.fields().iter().enumerate() {
                if field.name() == "timestamp" {
                    continue;
                }

                // producers may carry the series name in the field metadata,
                // otherwise the field name is the series name
                let name = field
                    .metadata()
                    .get("metric")
                    .cloned()
                    .unwrap_or_else(|| field.name().to_string());

                let column = batch.column(id);
                let series = data.columns.entry(name.clone()).or_default();

                match column.data_type() {
                    DataType::Float64 => {
                        let values = column
                            .as_any()
                            .downcast_ref::<Float64Array>()
                            .expect("failed to downcast");

                        for (row, value) in values.iter().enumerate() {
                            if let (Some(v), Some(ts)) = (value, timestamps.get(&row)) {
                                series.insert(*ts, v);
                            }
                        }
                    }
                    DataType::UInt64 => {
                        let values = column
                            .as_any()
                            .downcast_ref::<UInt64Array>()
                            .expect("failed to downcast");

                        for (row, value) in values.iter().enumerate() {
                            if let (Some(v), Some(ts)) = (value, timestamps.get(&row)) {
                                series.insert(*ts, v as f64);
                            }
                        }
                    }
                    DataType::Int64 => {
                        let values = column
                            .as_any()
                            .downcast_ref::<Int64Array>()
                            .expect("failed to downcast");

                        for (row, value) in values.iter().enumerate() {
                            if let (Some(v), Some(ts)) = (value, timestamps.get(&row)) {
                                series.insert(*ts, v as f64);
                            }
                        }
                    }
                    other => {
                        return Err(Error::TypeMismatch(format!(
                            "column {name} is not numeric: {other:?}"
                        )));
                    }
                }
            }
        }

        Ok(data)
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    pub fn insert<T: Into<String>>(&mut self, name: T, series: Series) {
        self.columns.insert(name.into(), series);
    }

    /// Column names in lexical order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Length of the longest column.
    pub fn rows(&self) -> usize {
        self.columns
            .values()
            .map(|series| series.len())
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.values().all(|series| series.is_empty())
    }

    /// Median interval between consecutive timestamps across all columns,
    /// as fractional seconds.
    pub fn interval(&self) -> Result<f64, Error> {
        let mut times: BTreeSet<u64> = BTreeSet::new();

        for series in self.columns.values() {
            times.extend(series.times());
        }

        if times.len() < 2 {
            return Err(Error::InsufficientData(
                "at least two timestamps are required to derive a sampling period".to_string(),
            ));
        }

        let times: Vec<u64> = times.into_iter().collect();
        let mut deltas: Vec<f64> = times.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
        deltas.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Ok(stats::percentile(&deltas, 50.0) / SECONDS as f64)
    }

    /// First and last timestamps across all columns.
    pub fn span(&self) -> Option<(u64, u64)> {
        let mut result: Option<(u64, u64)> = None;

        for series in self.columns.values() {
            if let Some((first, last)) = series.span() {
                result = match result {
                    Some((lo, hi)) => Some((lo.min(first), hi.max(last))),
                    None => Some((first, last)),
                };
            }
        }

        result
    }

    pub fn source(&self) -> String {
        self.source.clone()
    }

    pub fn version(&self) -> String {
        self.version.clone()
    }

    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    /// A copy with every column passed through `f`, keeping the recording
    /// metadata.
    pub(crate) fn map_columns<F: Fn(&Series) -> Series>(&self, f: F) -> Tsdb {
        let mut result = Tsdb {
            columns: BTreeMap::new(),
            source: self.source.clone(),
            version: self.version.clone(),
            filename: self.filename.clone(),
        };

        for (name, series) in self.columns.iter() {
            result.insert(name.clone(), f(series));
        }

        result
    }
}
