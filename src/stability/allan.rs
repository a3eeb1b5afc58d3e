/// Which Allan variance estimator to run.
///
/// The standard estimator partitions the series into adjacent blocks of
/// `tau` samples. The overlapping estimator repeats that at every phase
/// origin within a block and averages, trading computation for a lower
/// variance of the estimate itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Estimator {
    Standard,
    Overlapping,
}

/// Allan variance across a set of dyadic averaging times. `taus` and
/// `variances` are parallel, in ascending tau order, and `taus` holds
/// averaging window lengths in samples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllanVariance {
    taus: Vec<u64>,
    variances: Vec<f64>,
}

impl AllanVariance {
    pub fn taus(&self) -> &[u64] {
        &self.taus
    }

    pub fn variances(&self) -> &[f64] {
        &self.variances
    }

    pub fn len(&self) -> usize {
        self.taus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taus.is_empty()
    }

    /// Points for a log-log Allan deviation plot: tau mapped onto seconds
    /// using the sampling `period`, deviation normalized by it.
    pub fn deviation_points(&self, period: f64) -> (Vec<f64>, Vec<f64>) {
        let taus = self.taus.iter().map(|tau| *tau as f64 * period).collect();
        let deviations = self
            .variances
            .iter()
            .map(|variance| (variance / period).sqrt())
            .collect();

        (taus, deviations)
    }
}

/// Computes the Allan variance of `values` at every power-of-two averaging
/// time the series can support.
///
/// The taus are 2, 4, 8, ... up to 2^(floor(log2(n)) - 2), further limited
/// to n/2 samples for the standard estimator and n/3 for the overlapping
/// one so the largest window still produces enough blocks. Series shorter
/// than 8 samples support no tau at all and produce an empty result, which
/// is a valid outcome rather than an error. A tau whose aggregation yields
/// fewer than two blocks is skipped.
pub fn compute(values: &[f64], estimator: Estimator) -> AllanVariance {
    let count = values.len();

    if count < 4 {
        return AllanVariance::default();
    }

    let max_exponent = (count as f64).log2().floor() as u32 - 1;

    // cumulative sum with a leading zero, so cum[i] is the sum of the
    // first i samples and block sums are cheap differences
    let mut cum = Vec::with_capacity(count + 1);
    cum.push(0.0);

    let mut total = 0.0;

    for value in values {
        total += value;
        cum.push(total);
    }

    let mut taus = Vec::new();
    let mut variances = Vec::new();

    for exponent in 1..max_exponent {
        let tau = 1usize << exponent;

        let within_span = match estimator {
            Estimator::Standard => 2 * tau <= count,
            Estimator::Overlapping => 3 * tau <= count,
        };

        if !within_span {
            break;
        }

        let variance = match estimator {
            Estimator::Standard => origin_variance(&cum, tau, 0),
            Estimator::Overlapping => {
                let mut sum = 0.0;
                let mut origins = 0usize;

                for origin in 0..tau {
                    if let Some(v) = origin_variance(&cum, tau, origin) {
                        sum += v;
                        origins += 1;
                    }
                }

                if origins > 0 {
                    Some(sum / origins as f64)
                } else {
                    None
                }
            }
        };

        if let Some(variance) = variance {
            taus.push(tau as u64);
            variances.push(variance);
        }
    }

    AllanVariance { taus, variances }
}

/// Allan variance of the series aggregated into blocks of `tau` samples
/// starting at the given phase origin, or `None` when fewer than two block
/// averages fit.
fn origin_variance(cum: &[f64], tau: usize, origin: usize) -> Option<f64> {
    let count = cum.len() - 1;

    // block boundaries sit at origin + j * tau, strictly below the sample
    // count
    let blocks = (count - 1 - origin) / tau;

    if blocks < 2 {
        return None;
    }

    let inv = 1.0 / tau as f64;
    let mut previous = (cum[origin + tau] - cum[origin]) * inv;
    let mut sum_sq = 0.0;

    for j in 2..=blocks {
        let mean = (cum[origin + j * tau] - cum[origin + (j - 1) * tau]) * inv;
        let diff = mean - previous;
        sum_sq += diff * diff;
        previous = mean;
    }

    Some(sum_sq / (2.0 * (blocks - 1) as f64))
}
