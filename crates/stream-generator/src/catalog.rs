//! Dotted-path value catalog.
//!
//! Parameters whose type tag is a dotted `namespace.method` path (the
//! faker-style namespace the original tool exposes) resolve through a
//! [`ValueCatalog`]. The catalog is a capability injected into generation:
//! callers can plug in arbitrarily rich catalogs, and the engine ships a
//! small built-in one so it works out of the box.

use crate::generators::string::word;
use rand::{Rng, RngCore};
use stream_core::GeneratedValue;

/// Resolver for dotted `namespace.method` generator paths.
///
/// `generate` receives the caller's RNG so that seeded sessions stay
/// reproducible across catalog-backed placeholders. Returning `None` means
/// the path is unknown, which the caller reports as a recoverable
/// per-placeholder failure.
pub trait ValueCatalog: Send + Sync {
    /// Generate a value for `path`, or `None` if the path is unknown.
    fn generate(&self, path: &str, rng: &mut dyn RngCore) -> Option<GeneratedValue>;
}

/// Built-in catalog with a handful of common fake-data paths.
pub struct BuiltinCatalog;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Carmen", "Derek", "Elena", "Felix", "Greta", "Hassan", "Ingrid", "Jonas",
    "Katya", "Liam", "Mona", "Nadia", "Oscar", "Priya", "Quentin", "Rosa", "Stefan", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Bergman", "Castillo", "Dvorak", "Eriksen", "Fontaine", "Garrett", "Hoffman",
    "Ivanov", "Jansen", "Keller", "Lindqvist", "Moreau", "Novak", "Okafor", "Petrov", "Quinn",
    "Rossi", "Schneider", "Tanaka",
];

const DOMAINS: &[&str] = &[
    "example.com", "example.org", "mail.test", "inbox.dev", "post.example",
];

const CITIES: &[&str] = &[
    "Aurora", "Brighton", "Calder", "Dunmore", "Eastvale", "Fairhaven", "Grantham", "Holloway",
    "Iverton", "Junction City", "Kingsport", "Lakewood",
];

fn pick<R: Rng + ?Sized>(pool: &[&str], rng: &mut R) -> String {
    pool[rng.gen_range(0..pool.len())].to_string()
}

impl ValueCatalog for BuiltinCatalog {
    fn generate(&self, path: &str, rng: &mut dyn RngCore) -> Option<GeneratedValue> {
        let value = match path {
            "person.firstName" => pick(FIRST_NAMES, rng),
            "person.lastName" => pick(LAST_NAMES, rng),
            "person.fullName" => format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng)),
            "internet.email" => format!(
                "{}.{}@{}",
                pick(FIRST_NAMES, rng).to_lowercase(),
                pick(LAST_NAMES, rng).to_lowercase(),
                pick(DOMAINS, rng)
            ),
            "internet.userName" => format!(
                "{}{}",
                pick(FIRST_NAMES, rng).to_lowercase(),
                rng.gen_range(1..1000)
            ),
            "internet.domainName" => pick(DOMAINS, rng),
            "location.city" => pick(CITIES, rng),
            "phone.number" => format!(
                "+1-{:03}-{:03}-{:04}",
                rng.gen_range(200..1000),
                rng.gen_range(200..1000),
                rng.gen_range(0..10000)
            ),
            "lorem.word" => word(rng).to_string(),
            "lorem.sentence" => {
                let count = rng.gen_range(5..=9);
                let mut words: Vec<&str> = (0..count).map(|_| word(rng)).collect();
                let mut sentence = String::new();
                let first = words.remove(0);
                let mut chars = first.chars();
                if let Some(c) = chars.next() {
                    sentence.push(c.to_ascii_uppercase());
                    sentence.push_str(chars.as_str());
                }
                for w in words {
                    sentence.push(' ');
                    sentence.push_str(w);
                }
                sentence.push('.');
                sentence
            }
            _ => return None,
        };
        Some(GeneratedValue::String(value))
    }
}
