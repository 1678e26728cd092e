//! "Pretty" breaks: equal intervals rounded to human-friendly magnitudes.
//!
//! The equal-interval thresholds are snapped to multiples of a rounding unit
//! drawn from the 1-2-5 ladder (…, 0.5, 1, 2, 5, 10, 20, 50, …). The unit is
//! the largest ladder step no greater than half the raw interval, which keeps
//! adjacent snapped thresholds at least one unit apart. The top threshold is
//! rounded up so it never falls below the maximum observation.

use super::ClassificationError;
use crate::types::BreakSet;

const LADDER_TOLERANCE: f64 = 1e-9;

/// A 1-2-5 ladder step, kept as `mantissa * 10^exponent` so that snapped
/// thresholds are produced from exact integer multiples.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NiceUnit {
    mantissa: u8,
    exponent: i32,
}

impl NiceUnit {
    /// Largest ladder step `<= x`. `x` must be finite and positive.
    fn floor(x: f64) -> Self {
        let mut exponent = x.log10().floor() as i32;
        let mut fraction = x / pow10(exponent);
        // log10 can land one decade off near exact powers of ten.
        if fraction >= 10.0 - LADDER_TOLERANCE {
            exponent += 1;
            fraction /= 10.0;
        } else if fraction < 1.0 - LADDER_TOLERANCE {
            exponent -= 1;
            fraction *= 10.0;
        }
        let mantissa = if fraction >= 5.0 - LADDER_TOLERANCE {
            5
        } else if fraction >= 2.0 - LADDER_TOLERANCE {
            2
        } else {
            1
        };
        Self { mantissa, exponent }
    }

    fn value(&self) -> f64 {
        self.scale(1.0)
    }

    /// `count` units as a float, scaled without accumulating error.
    fn scale(&self, count: f64) -> f64 {
        let n = count * self.mantissa as f64;
        if self.exponent >= 0 {
            n * pow10(self.exponent)
        } else {
            n / pow10(-self.exponent)
        }
    }
}

fn pow10(exponent: i32) -> f64 {
    10f64.powi(exponent)
}

/// Pretty breaks over sorted distinct `values` (at least `k` of them).
pub fn breaks(values: &[f64], k: usize) -> Result<BreakSet, ClassificationError> {
    let min = values[0];
    let max = values[values.len() - 1];
    let raw = (max - min) / k as f64;
    if !(raw > 0.0) || !raw.is_finite() {
        return Err(ClassificationError::degenerate(
            "pretty",
            format!("cannot derive a rounding unit from range [{min}, {max}]"),
        ));
    }

    let unit = NiceUnit::floor(raw / 2.0);
    let u = unit.value();

    let mut counts: Vec<f64> = (1..k)
        .map(|i| ((min + i as f64 * raw) / u).round())
        .collect();
    counts.push((max / u).ceil());

    // Snapping can only collapse neighbours through float error; push any
    // collided threshold outward by one unit.
    for i in 1..counts.len() {
        if counts[i] <= counts[i - 1] {
            counts[i] = counts[i - 1] + 1.0;
        }
    }
    // The top threshold never sits below the maximum, even when the
    // division or the rescale rounds down.
    if let Some(top) = counts.last_mut() {
        while unit.scale(*top) < max {
            *top += 1.0;
        }
    }

    let thresholds = counts.into_iter().map(|c| unit.scale(c)).collect();
    BreakSet::new(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_unit_floor() {
        assert_eq!(NiceUnit::floor(4.1667), NiceUnit { mantissa: 2, exponent: 0 });
        assert_eq!(NiceUnit::floor(133.25), NiceUnit { mantissa: 1, exponent: 2 });
        assert_eq!(NiceUnit::floor(0.07), NiceUnit { mantissa: 5, exponent: -2 });
        assert_eq!(NiceUnit::floor(1000.0), NiceUnit { mantissa: 1, exponent: 3 });
        assert_eq!(NiceUnit::floor(20.0), NiceUnit { mantissa: 2, exponent: 1 });
    }

    #[test]
    fn test_thresholds_are_multiples_of_unit() {
        let values: Vec<f64> = (1..=40).map(|i| (i * i) as f64).collect();
        let b = breaks(&values, 6).unwrap();
        assert_eq!(b.thresholds(), &[300.0, 500.0, 800.0, 1100.0, 1300.0, 1600.0]);
    }

    #[test]
    fn test_top_break_rounds_up_past_max() {
        let b = breaks(&[3.0, 17.0, 41.0, 88.0, 101.0], 4).unwrap();
        assert!(b.upper() >= 101.0);
        assert_eq!(b.class_of(101.0).get(), 3);
        assert!(b.thresholds().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_max_just_above_unit_multiple() {
        let values = [0.5, 300.0, 600.0, 900.0, 1200.0, 1600.000_000_1];
        let b = breaks(&values, 6).unwrap();
        assert_eq!(b.thresholds(), &[300.0, 500.0, 800.0, 1100.0, 1300.0, 1700.0]);
        assert!(b.upper() >= 1600.000_000_1);
        assert_eq!(b.class_of(1600.000_000_1).get(), 5);
    }

    #[test]
    fn test_small_decimal_range_stays_clean() {
        let b = breaks(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7], 3).unwrap();
        // raw = 0.2, unit = 0.1
        assert_eq!(b.thresholds(), &[0.3, 0.5, 0.7]);
    }
}
