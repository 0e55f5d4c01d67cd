//! Numeric value generators.

use rand::Rng;
use stream_core::{GeneratedValue, Parameter};

/// Generate a number from a parameter's `min`/`max`/`precision` constraints.
///
/// Bounds default to the full i64 range. With `precision:N` (N > 0) the
/// result is a float in `[min, max]` rounded to N fraction digits, otherwise
/// an integer in `[min, max]`.
pub fn generate_number<R: Rng + ?Sized>(param: &Parameter, rng: &mut R) -> GeneratedValue {
    let precision: u32 = param
        .constraint("precision")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    if precision > 0 {
        let min: f64 = param
            .constraint("min")
            .and_then(|v| v.parse().ok())
            .unwrap_or(i64::MIN as f64);
        let max: f64 = param
            .constraint("max")
            .and_then(|v| v.parse().ok())
            .unwrap_or(i64::MAX as f64);

        let raw = if min >= max {
            min
        } else {
            rng.gen_range(min..=max)
        };
        let factor = 10f64.powi(precision as i32);
        GeneratedValue::Float((raw * factor).round() / factor)
    } else {
        let min: i64 = param
            .constraint("min")
            .and_then(|v| v.parse().ok())
            .unwrap_or(i64::MIN);
        let max: i64 = param
            .constraint("max")
            .and_then(|v| v.parse().ok())
            .unwrap_or(i64::MAX);

        if min >= max {
            GeneratedValue::Int(min)
        } else {
            GeneratedValue::Int(rng.gen_range(min..=max))
        }
    }
}
