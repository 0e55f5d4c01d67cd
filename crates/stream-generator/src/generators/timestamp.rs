//! Timestamp value generators.

use chrono::{DateTime, Utc};
use rand::Rng;
use stream_core::{GeneratedValue, Parameter};

/// Generate a timestamp uniformly distributed in the parameter's
/// `from`/`to` range.
///
/// `from` defaults to the Unix epoch and `to` to the current time; malformed
/// bounds fall back to those defaults. An inverted range collapses to `from`.
pub fn generate_date<R: Rng + ?Sized>(param: &Parameter, rng: &mut R) -> GeneratedValue {
    let from = param
        .constraint("from")
        .and_then(parse_timestamp)
        .unwrap_or_else(|| DateTime::from_timestamp(0, 0).unwrap_or_else(Utc::now));
    let to = param
        .constraint("to")
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    let from_ts = from.timestamp();
    let to_ts = to.timestamp();

    if from_ts >= to_ts {
        GeneratedValue::DateTime(from)
    } else {
        let random_ts = rng.gen_range(from_ts..=to_ts);
        let dt = DateTime::from_timestamp(random_ts, 0).unwrap_or(from);
        GeneratedValue::DateTime(dt)
    }
}

/// Parse a timestamp string in various formats.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try common date-only format
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
