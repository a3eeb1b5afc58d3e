use super::Tsdb;
use crate::error::Error;
use std::str::FromStr;
use std::time::Duration;

/// Above this row count a plot stops resolving individual samples, so the
/// heuristic thins the data down to roughly this many rows.
pub const MAX_RENDER_POINTS: usize = 2000;

/// How to reduce a recording before rendering. Parsed from the `--sampling`
/// argument: a non-negative integer is a stride, anything else must be a
/// time period such as `5s` or `250ms`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SamplingDirective {
    /// Keep every n-th row. A stride of zero keeps everything.
    Stride(u64),
    /// Median-resample into bins of this length.
    Period(Duration),
}

impl FromStr for SamplingDirective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(stride) = s.parse::<i64>() {
            if stride < 0 {
                return Err(Error::InvalidArgument(format!(
                    "stride must not be negative: {stride}"
                )));
            }

            return Ok(Self::Stride(stride as u64));
        }

        match humantime::parse_duration(s) {
            Ok(period) if period.is_zero() => Err(Error::InvalidArgument(format!(
                "resample period must not be zero: {s}"
            ))),
            Ok(period) => Ok(Self::Period(period)),
            Err(_) => Err(Error::InvalidArgument(format!(
                "not a stride or a time period: {s}"
            ))),
        }
    }
}

/// Produces a reduced copy of the recording suitable for rendering.
///
/// With a directive the reduction is explicit: stride decimation or median
/// resampling, applied to every column. Without one, the data is thinned to
/// about [`MAX_RENDER_POINTS`] rows whenever the rendering target cannot
/// resolve more than that anyway: an interactive viewer, a vector image
/// destination, or simply a recording too large for any plot. The input is
/// never mutated.
pub fn sample(
    data: &Tsdb,
    directive: Option<&SamplingDirective>,
    vector_output: bool,
    interactive: bool,
) -> Tsdb {
    match directive {
        Some(SamplingDirective::Stride(0)) => data.clone(),
        Some(SamplingDirective::Stride(stride)) => {
            data.map_columns(|series| series.decimate(*stride as usize))
        }
        Some(SamplingDirective::Period(period)) => {
            let period = period.as_nanos().min(u64::MAX as u128).max(1) as u64;
            data.map_columns(|series| series.resample_median(period))
        }
        None => {
            let rows = data.rows();

            if interactive || vector_output || rows > MAX_RENDER_POINTS {
                let stride = rows / MAX_RENDER_POINTS;

                if stride > 1 {
                    data.map_columns(|series| series.decimate(stride))
                } else {
                    data.clone()
                }
            } else {
                data.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsdb::Series;

    fn recording(rows: usize) -> Tsdb {
        let mut data = Tsdb::default();
        data.insert(
            "offset",
            (0..rows).map(|i| (i as u64 * 1_000, i as f64)).collect(),
        );
        data
    }

    fn offsets(data: &Tsdb) -> &Series {
        data.get("offset").unwrap()
    }

    #[test]
    fn stride_zero_is_identity() {
        let data = recording(10);
        let sampled = sample(&data, Some(&SamplingDirective::Stride(0)), true, true);
        assert_eq!(sampled, data);
    }

    #[test]
    fn stride_keeps_rows_by_position() {
        let data = recording(10);
        let sampled = sample(&data, Some(&SamplingDirective::Stride(3)), false, false);

        assert_eq!(offsets(&sampled).values(), vec![0.0, 3.0, 6.0, 9.0]);

        // ceil(rows / stride) rows survive
        for stride in 1..=10u64 {
            let sampled = sample(&data, Some(&SamplingDirective::Stride(stride)), false, false);
            assert_eq!(offsets(&sampled).len(), 10usize.div_ceil(stride as usize));
        }
    }

    #[test]
    fn period_resamples_to_aligned_bins() {
        let data = recording(10);
        let directive = "3us".parse::<SamplingDirective>().unwrap();
        let sampled = sample(&data, Some(&directive), false, false);

        let times = offsets(&sampled).times();
        assert!(times.iter().all(|t| t % 3_000 == 0));
        assert_eq!(times.len(), 4);
    }

    #[test]
    fn heuristic_passes_small_noninteractive_data_through() {
        let data = recording(100);
        let sampled = sample(&data, None, false, false);
        assert_eq!(sampled, data);
    }

    #[test]
    fn heuristic_thins_large_data() {
        let data = recording(10_000);
        let sampled = sample(&data, None, false, false);
        assert_eq!(offsets(&sampled).len(), 2000);
    }

    #[test]
    fn heuristic_is_identity_below_twice_the_target() {
        // stride computes to 1, which degenerates to the identity
        let data = recording(3_000);

        for (vector, interactive) in [(true, false), (false, true), (false, false)] {
            let sampled = sample(&data, None, vector, interactive);
            assert_eq!(sampled, data);
        }
    }

    #[test]
    fn interactive_and_vector_targets_trigger_thinning() {
        let data = recording(4_000);

        let sampled = sample(&data, None, false, true);
        assert_eq!(offsets(&sampled).len(), 2000);

        let sampled = sample(&data, None, true, false);
        assert_eq!(offsets(&sampled).len(), 2000);
    }

    #[test]
    fn directive_parsing() {
        assert_eq!(
            "0".parse::<SamplingDirective>().unwrap(),
            SamplingDirective::Stride(0)
        );
        assert_eq!(
            "25".parse::<SamplingDirective>().unwrap(),
            SamplingDirective::Stride(25)
        );
        assert_eq!(
            "5s".parse::<SamplingDirective>().unwrap(),
            SamplingDirective::Period(Duration::from_secs(5))
        );
        assert_eq!(
            " 250ms ".parse::<SamplingDirective>().unwrap(),
            SamplingDirective::Period(Duration::from_millis(250))
        );

        assert!(matches!(
            "-3".parse::<SamplingDirective>(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            "0s".parse::<SamplingDirective>(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            "every other".parse::<SamplingDirective>(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            "2.5".parse::<SamplingDirective>(),
            Err(Error::InvalidArgument(_))
        ));
    }
}
