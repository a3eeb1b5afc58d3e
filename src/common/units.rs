#![allow(dead_code)]

// Time units with base unit as nanoseconds
pub const SECONDS: u64 = 1_000 * MILLISECONDS;
pub const MILLISECONDS: u64 = 1_000 * MICROSECONDS;
pub const MICROSECONDS: u64 = 1_000 * NANOSECONDS;
pub const NANOSECONDS: u64 = 1;

/// An engineering scale for plotting values measured in seconds. Picks the
/// unit so the scaled spread of sub-second data lands in [1, 1000), which
/// keeps axis labels readable for anything from nanosecond jitter up to
/// drifts of whole seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    multiplier: f64,
    suffix: &'static str,
}

impl Scale {
    pub fn time(spread: f64) -> Self {
        if !spread.is_finite() || spread <= 0.0 || spread >= 1.0 {
            Self {
                multiplier: 1.0,
                suffix: "s",
            }
        } else if spread >= 1e-3 {
            Self {
                multiplier: 1e3,
                suffix: "ms",
            }
        } else if spread >= 1e-6 {
            Self {
                multiplier: 1e6,
                suffix: "us",
            }
        } else {
            Self {
                multiplier: 1e9,
                suffix: "ns",
            }
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn suffix(&self) -> &'static str {
        self.suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_chooses_engineering_unit() {
        assert_eq!(Scale::time(2.5).suffix(), "s");
        assert_eq!(Scale::time(1.0).suffix(), "s");
        assert_eq!(Scale::time(0.5).suffix(), "ms");
        assert_eq!(Scale::time(0.002).suffix(), "ms");
        assert_eq!(Scale::time(1e-3).suffix(), "ms");
        assert_eq!(Scale::time(2e-5).suffix(), "us");
        assert_eq!(Scale::time(5e-8).suffix(), "ns");
    }

    #[test]
    fn scaled_spread_lands_in_range() {
        for spread in [0.9, 0.1, 1e-3, 5e-4, 2e-6, 3e-9] {
            let scale = Scale::time(spread);
            let scaled = spread * scale.multiplier();
            assert!(
                (1.0..1000.0).contains(&scaled),
                "spread {spread} scaled to {scaled}"
            );
        }
    }

    #[test]
    fn degenerate_spread_is_unscaled() {
        assert_eq!(Scale::time(0.0).multiplier(), 1.0);
        assert_eq!(Scale::time(f64::NAN).multiplier(), 1.0);
        assert_eq!(Scale::time(f64::INFINITY).multiplier(), 1.0);
    }
}
