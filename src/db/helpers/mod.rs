use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{types::ValueRef, Row};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// Accepts RFC 3339 text and falls back to naive ISO-8601, which is read as UTC.
pub fn parse_iso8601(value: &str, field: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow!("{field} holds unrecognised timestamp '{value}'"))
}

/// Reads a timestamp column regardless of how it was persisted.
///
/// Text is parsed as ISO-8601, integers are epoch milliseconds and reals are
/// epoch seconds with a fractional part.
pub fn read_timestamp(row: &Row, column: &str) -> Result<Option<DateTime<Utc>>> {
    let value = row
        .get_ref(column)
        .with_context(|| format!("missing column {column}"))?;

    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .with_context(|| format!("{column} is not valid UTF-8"))?;
            parse_iso8601(text, column).map(Some)
        }
        ValueRef::Integer(millis) => DateTime::from_timestamp_millis(millis)
            .map(Some)
            .ok_or_else(|| anyhow!("{column} epoch millis {millis} out of range")),
        ValueRef::Real(seconds) => {
            if !seconds.is_finite() {
                bail!("{column} holds non-finite epoch seconds");
            }
            let micros = (seconds * 1_000_000.0).round() as i64;
            DateTime::from_timestamp_micros(micros)
                .map(Some)
                .ok_or_else(|| anyhow!("{column} epoch seconds {seconds} out of range"))
        }
        ValueRef::Blob(_) => bail!("{column} holds a blob, expected a timestamp"),
    }
}

pub fn read_required_timestamp(row: &Row, column: &str) -> Result<DateTime<Utc>> {
    read_timestamp(row, column)?.ok_or_else(|| anyhow!("{column} is unexpectedly NULL"))
}
