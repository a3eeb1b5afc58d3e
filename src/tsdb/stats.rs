use super::Series;
use crate::error::Error;

/// Percentile bounds used for plot limits when the caller does not supply
/// a range. Trimming the outer percent on each side keeps a handful of
/// outliers from flattening the rest of the series.
pub const DEFAULT_PTILE_RANGE: (f64, f64) = (1.0, 99.0);

/// Descriptive statistics for one series, computed over its finite samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub lower: f64,
    pub upper: f64,
}

impl SeriesStats {
    /// Width of the percentile band, used for axis bounds and unit choice.
    pub fn spread(&self) -> f64 {
        self.upper - self.lower
    }
}

pub fn describe(series: &Series, ptile_range: (f64, f64)) -> Result<SeriesStats, Error> {
    let (lo, hi) = ptile_range;

    if !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) || lo > hi {
        return Err(Error::InvalidArgument(format!(
            "percentile range must satisfy 0 <= lower <= upper <= 100: ({lo}, {hi})"
        )));
    }

    let mut sorted: Vec<f64> = series
        .values()
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();

    if sorted.is_empty() {
        return Err(Error::InsufficientData(
            "series has no finite samples".to_string(),
        ));
    }

    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(SeriesStats {
        count: sorted.len(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        median: percentile(&sorted, 50.0),
        lower: percentile(&sorted, lo),
        upper: percentile(&sorted, hi),
    })
}

/// Value closest to the requested percentile. `sorted` must be non-empty
/// and in ascending order.
pub(crate) fn percentile(sorted: &[f64], percentile: f64) -> f64 {
    if percentile <= 0.0 {
        return sorted[0];
    }

    let need = ((percentile / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[need.min(sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Series {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as u64, *v))
            .collect()
    }

    #[test]
    fn describe_small_series() {
        let stats = describe(&series(&[4.0, 1.0, 3.0, 2.0]), DEFAULT_PTILE_RANGE).unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.lower, 1.0);
        assert_eq!(stats.upper, 4.0);
        assert_eq!(stats.spread(), 3.0);
    }

    #[test]
    fn percentile_bounds_trim_outliers() {
        // 1..=100 with the ends acting as outliers
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        let stats = describe(&series(&values), (10.0, 90.0)).unwrap();

        assert_eq!(stats.lower, 10.0);
        assert_eq!(stats.upper, 90.0);
        assert_eq!(stats.median, 50.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 100.0);
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let stats = describe(
            &series(&[1.0, f64::NAN, 2.0, f64::INFINITY, 3.0]),
            DEFAULT_PTILE_RANGE,
        )
        .unwrap();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.max, 3.0);
    }

    #[test]
    fn empty_series_is_insufficient() {
        let result = describe(&Series::default(), DEFAULT_PTILE_RANGE);
        assert!(matches!(result, Err(Error::InsufficientData(_))));

        let result = describe(&series(&[f64::NAN]), DEFAULT_PTILE_RANGE);
        assert!(matches!(result, Err(Error::InsufficientData(_))));
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let s = series(&[1.0, 2.0]);

        assert!(matches!(
            describe(&s, (-1.0, 99.0)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            describe(&s, (1.0, 101.0)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            describe(&s, (90.0, 10.0)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn percentile_zero_is_minimum() {
        let sorted = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 3.0);
    }
}
