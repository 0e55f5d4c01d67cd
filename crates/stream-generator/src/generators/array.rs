//! Array value generator.

use crate::catalog::ValueCatalog;
use crate::error::GenerateError;
use rand::{Rng, RngCore};
use stream_core::{GeneratedValue, Parameter};

/// Generate an array value.
///
/// `length:N` fixes the element count (default: random 1-5) and
/// `itemType:<type>` selects the element generator (default: `string`).
/// Elements are generated by re-entering the main dispatch with the item
/// type and no constraints, so dotted catalog paths work as item types and
/// their resolution failures surface as the parameter's generation error.
pub fn generate_array(
    param: &Parameter,
    catalog: &dyn ValueCatalog,
    rng: &mut dyn RngCore,
) -> Result<GeneratedValue, GenerateError> {
    let length = param
        .constraint("length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or_else(|| rng.gen_range(1..=5));
    let item_kind = param.constraint("itemType").unwrap_or("string");

    let item = Parameter::randomized(param.name.clone(), item_kind);
    let mut items = Vec::with_capacity(length);
    for _ in 0..length {
        items.push(super::generate(&item, catalog, rng)?);
    }
    Ok(GeneratedValue::Array(items))
}
