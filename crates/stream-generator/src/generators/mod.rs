//! Individual value generators for different parameter types.
//!
//! This module provides the generation logic for each generator type tag and
//! the dispatch that selects between them. All generation is a pure function
//! of the parameter, the RNG, and the catalog; generators share no state and
//! may be invoked concurrently from any number of sessions.

pub mod array;
pub mod manual;
pub mod numeric;
pub mod string;
pub mod timestamp;
pub mod uuid;

use crate::catalog::ValueCatalog;
use crate::error::GenerateError;
use rand::{Rng, RngCore};
use stream_core::{GeneratedValue, Parameter};

/// Generate one value for a parameter.
///
/// Non-randomized parameters pick uniformly from their manual values.
/// Randomized parameters dispatch on the type tag; dotted
/// `namespace.method` tags are resolved through the catalog, and any other
/// unrecognized scalar tag falls back to a generic word token rather than
/// failing the render.
pub fn generate(
    param: &Parameter,
    catalog: &dyn ValueCatalog,
    rng: &mut dyn RngCore,
) -> Result<GeneratedValue, GenerateError> {
    if !param.is_randomized {
        return manual::pick(param, rng);
    }

    let value = match param.kind.as_str() {
        "uuid" => uuid::generate_uuid(rng),

        "string" => string::generate_string(param, rng),

        "number" => numeric::generate_number(param, rng),

        "date" => timestamp::generate_date(param, rng),

        "boolean" => GeneratedValue::Bool(rng.gen_bool(0.5)),

        "array" => array::generate_array(param, catalog, rng)?,

        kind if kind.contains('.') => {
            catalog
                .generate(kind, rng)
                .ok_or_else(|| GenerateError::UnknownPath {
                    parameter: param.name.clone(),
                    path: kind.to_string(),
                })?
        }

        _ => string::generate_word(rng),
    };

    Ok(value)
}
