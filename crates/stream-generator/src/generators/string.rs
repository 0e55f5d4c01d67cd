//! String value generators.

use rand::distributions::Alphanumeric;
use rand::Rng;
use stream_core::{GeneratedValue, Parameter};

/// Word pool for generic tokens, shared with the built-in catalog.
pub(crate) const WORDS: &[&str] = &[
    "alpha", "breeze", "cobalt", "delta", "ember", "fathom", "glacier", "harbor", "indigo",
    "jigsaw", "kernel", "lumen", "meadow", "nimbus", "onyx", "prairie", "quartz", "ripple",
    "summit", "timber", "umbra", "vertex", "willow", "zenith",
];

/// Pick a random word from the shared pool.
pub(crate) fn word<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WORDS[rng.gen_range(0..WORDS.len())]
}

/// Generate a generic word-like token.
pub fn generate_word<R: Rng + ?Sized>(rng: &mut R) -> GeneratedValue {
    GeneratedValue::String(word(rng).to_string())
}

/// Generate a string value.
///
/// With a `length:N` constraint, produces a random alphanumeric string of
/// exactly N characters; otherwise a random word-like token.
pub fn generate_string<R: Rng + ?Sized>(param: &Parameter, rng: &mut R) -> GeneratedValue {
    match param.constraint("length").and_then(|v| v.parse::<usize>().ok()) {
        Some(length) => {
            let s: String = (0..length)
                .map(|_| rng.sample(Alphanumeric) as char)
                .collect();
            GeneratedValue::String(s)
        }
        None => generate_word(rng),
    }
}
