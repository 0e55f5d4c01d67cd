//! Template rendering.
//!
//! A template is an opaque string with `{{name}}` placeholder tokens. Each
//! parameter is generated at most once per render and the same value replaces
//! every occurrence of its token, so a placeholder repeated in one message is
//! internally consistent. Placeholders with no matching parameter are left
//! verbatim.

use crate::catalog::ValueCatalog;
use crate::error::GenerateError;
use crate::generators;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use stream_core::Parameter;

/// A generation failure scoped to one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderIssue {
    /// The parameter whose value could not be generated.
    pub parameter: String,
    /// The underlying failure.
    pub error: GenerateError,
}

/// The outcome of one render call.
///
/// `message` always contains the best-effort result: placeholders whose
/// generation failed stay unsubstituted, and each failure is recorded in
/// `issues` for the caller to surface.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub message: String,
    pub issues: Vec<RenderIssue>,
}

/// Render a template against a parameter set.
///
/// The template undergoes no JSON parsing; only generated values are
/// JSON-encoded before substitution.
pub fn render(
    template: &str,
    parameters: &[Parameter],
    catalog: &dyn ValueCatalog,
    rng: &mut dyn RngCore,
) -> Rendered {
    let mut message = template.to_string();
    let mut issues = Vec::new();

    for param in parameters {
        let token = param.placeholder();
        if !message.contains(&token) {
            continue;
        }
        match generators::generate(param, catalog, rng) {
            Ok(value) => {
                message = message.replace(&token, &value.to_json());
            }
            Err(error) => {
                issues.push(RenderIssue {
                    parameter: param.name.clone(),
                    error,
                });
            }
        }
    }

    Rendered { message, issues }
}

/// A renderer owning its catalog and RNG, one per producer session.
///
/// With a seed the produced message stream is fully reproducible, including
/// catalog-backed placeholders.
pub struct MessageRenderer {
    catalog: Arc<dyn ValueCatalog>,
    rng: StdRng,
}

impl MessageRenderer {
    /// Create a renderer, seeded when `seed` is given.
    pub fn new(catalog: Arc<dyn ValueCatalog>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { catalog, rng }
    }

    /// Render one message.
    pub fn render(&mut self, template: &str, parameters: &[Parameter]) -> Rendered {
        render(template, parameters, self.catalog.as_ref(), &mut self.rng)
    }
}
