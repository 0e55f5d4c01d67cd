//! Manual value selection.

use crate::error::GenerateError;
use rand::Rng;
use stream_core::{GeneratedValue, Parameter};

/// Pick one of the parameter's manual values uniformly at random.
///
/// Values are selected uniformly rather than rotated in order, so any element
/// may repeat across consecutive renders. An empty value list is the only
/// failure mode.
pub fn pick<R: Rng + ?Sized>(
    param: &Parameter,
    rng: &mut R,
) -> Result<GeneratedValue, GenerateError> {
    if param.manual_values.is_empty() {
        return Err(GenerateError::EmptyValueSet(param.name.clone()));
    }
    let idx = rng.gen_range(0..param.manual_values.len());
    Ok(GeneratedValue::String(param.manual_values[idx].clone()))
}
