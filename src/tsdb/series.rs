use crate::common::units::SECONDS;
use std::collections::BTreeMap;

/// A single named column of the recording: values keyed by nanosecond
/// timestamp. The map keeps timestamps strictly increasing and duplicate
/// timestamps collapse to the last value written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Series {
    inner: BTreeMap<u64, f64>,
}

impl Series {
    pub fn insert(&mut self, time: u64, value: f64) {
        self.inner.insert(time, value);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Values in timestamp order.
    pub fn values(&self) -> Vec<f64> {
        self.inner.values().copied().collect()
    }

    pub fn times(&self) -> Vec<u64> {
        self.inner.keys().copied().collect()
    }

    /// First and last timestamps, if the series has any samples.
    pub fn span(&self) -> Option<(u64, u64)> {
        match (self.inner.keys().next(), self.inner.keys().next_back()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        }
    }

    pub fn multiply_scalar(&mut self, multiplier: f64) {
        for value in self.inner.values_mut() {
            *value *= multiplier;
        }
    }

    /// Every `stride`-th sample by position, starting from the first. The
    /// stride must be nonzero.
    pub fn decimate(&self, stride: usize) -> Series {
        let mut result = Series::default();

        for (i, (time, value)) in self.inner.iter().enumerate() {
            if i % stride == 0 {
                result.inner.insert(*time, *value);
            }
        }

        result
    }

    /// Bins samples into windows of `period` nanoseconds, aligned to whole
    /// multiples of the period, and reduces each bin to its median. Bins
    /// with no samples are absent from the result. The period must be
    /// nonzero.
    pub fn resample_median(&self, period: u64) -> Series {
        let mut bins: BTreeMap<u64, Vec<f64>> = BTreeMap::new();

        for (time, value) in self.inner.iter() {
            bins.entry(time - time % period).or_default().push(*value);
        }

        let mut result = Series::default();

        for (start, mut values) in bins {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            result.inner.insert(start, values[(values.len() - 1) / 2]);
        }

        result
    }

    pub fn as_data(&self) -> Vec<Vec<f64>> {
        let mut times = Vec::new();
        let mut values = Vec::new();

        for (time, value) in self.inner.iter() {
            // convert time to unix epoch float seconds
            times.push(*time as f64 / SECONDS as f64);
            values.push(*value);
        }

        vec![times, values]
    }
}

impl FromIterator<(u64, f64)> for Series {
    fn from_iter<T: IntoIterator<Item = (u64, f64)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(samples: &[(u64, f64)]) -> Series {
        samples.iter().copied().collect()
    }

    #[test]
    fn decimate_keeps_every_nth_sample() {
        let s: Series = (0..10).map(|i| (i as u64, i as f64)).collect();

        let reduced = s.decimate(3);
        assert_eq!(reduced.times(), vec![0, 3, 6, 9]);
        assert_eq!(reduced.values(), vec![0.0, 3.0, 6.0, 9.0]);

        // ceil(n / stride) rows
        assert_eq!(s.decimate(4).len(), 3);
        assert_eq!(s.decimate(10).len(), 1);
        assert_eq!(s.decimate(1), s);
    }

    #[test]
    fn resample_aligns_bins_to_period() {
        let s = series(&[
            (100, 1.0),
            (1_100, 2.0),
            (1_900, 4.0),
            (5_500, 8.0),
        ]);

        let resampled = s.resample_median(1_000);

        // bin starts are multiples of the period and empty bins are absent
        assert_eq!(resampled.times(), vec![0, 1_000, 5_000]);
        assert_eq!(resampled.values(), vec![1.0, 2.0, 8.0]);
    }

    #[test]
    fn resample_reduces_bins_to_median() {
        let s = series(&[(0, 5.0), (10, 1.0), (20, 9.0)]);
        assert_eq!(s.resample_median(100).values(), vec![5.0]);
    }

    #[test]
    fn span_and_values_follow_time_order() {
        let mut s = Series::default();
        s.insert(30, 3.0);
        s.insert(10, 1.0);
        s.insert(20, 2.0);

        assert_eq!(s.span(), Some((10, 30)));
        assert_eq!(s.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(Series::default().span(), None);
    }

    #[test]
    fn as_data_converts_to_float_seconds() {
        let s = series(&[(1_500_000_000, 0.25), (2_000_000_000, 0.5)]);
        let data = s.as_data();

        assert_eq!(data[0], vec![1.5, 2.0]);
        assert_eq!(data[1], vec![0.25, 0.5]);
    }
}
