//! Rounding of float quantities to a unit-of-measure precision.

/// Round `value` to an integer multiple of `precision` (e.g. `0.01`,
/// `0.5`), half away from zero.
///
/// `precision` must be finite and strictly positive; callers validate it
/// when the unit of measure is constructed. The quotient is nudged by one
/// ulp toward the nearest integer before rounding so that values sitting an
/// epsilon under a rounding boundary after the division (e.g.
/// `2.675 / 0.01 == 267.49999...`) still round the way their decimal
/// representation reads.
pub fn round_to_precision(value: f64, precision: f64) -> f64 {
    let normalized = value / precision;
    if normalized == 0.0 {
        return 0.0;
    }
    let epsilon = normalized.abs() * f64::EPSILON;
    let adjusted = normalized + normalized.signum() * epsilon;
    adjusted.round() * precision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_hundredths() {
        assert_eq!(round_to_precision(1.234, 0.01), 1.23);
        assert_eq!(round_to_precision(1.235, 0.01), 1.24);
        assert_eq!(round_to_precision(2.675, 0.01), 2.68);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to_precision(0.5, 1.0), 1.0);
        assert_eq!(round_to_precision(-0.5, 1.0), -1.0);
        assert_eq!(round_to_precision(-1.235, 0.01), -1.24);
    }

    #[test]
    fn supports_coarse_precisions() {
        assert_eq!(round_to_precision(7.3, 0.5), 7.5);
        assert_eq!(round_to_precision(7.24, 0.5), 7.0);
        assert_eq!(round_to_precision(12.0, 5.0), 10.0);
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(round_to_precision(0.0, 0.01), 0.0);
        assert_eq!(round_to_precision(-0.0, 0.5), 0.0);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the result is an integer multiple of the precision
            /// (up to float representation error).
            #[test]
            fn result_is_a_multiple_of_precision(
                value in -1.0e6f64..1.0e6,
                step in prop::sample::select(vec![1.0, 0.5, 0.25, 0.1, 0.01, 0.001]),
            ) {
                let rounded = round_to_precision(value, step);
                let quotient = rounded / step;
                prop_assert!((quotient - quotient.round()).abs() < 1e-6);
            }

            /// Property: rounding is idempotent.
            #[test]
            fn rounding_is_idempotent(
                value in -1.0e6f64..1.0e6,
                step in prop::sample::select(vec![1.0, 0.5, 0.1, 0.01]),
            ) {
                let once = round_to_precision(value, step);
                let twice = round_to_precision(once, step);
                prop_assert!((once - twice).abs() < 1e-9);
            }

            /// Property: the result stays within half a step of the input.
            #[test]
            fn result_stays_within_half_a_step(
                value in -1.0e6f64..1.0e6,
                step in prop::sample::select(vec![1.0, 0.5, 0.1, 0.01]),
            ) {
                let rounded = round_to_precision(value, step);
                prop_assert!((rounded - value).abs() <= step / 2.0 + 1e-6);
            }
        }
    }
}
