//! Checks shared by every route that takes a record id from a path or body.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidId {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid ID format: {0}")]
    Malformed(String),
}

/// Trims `value` and requires a UUID. `field` names the id in the
/// missing-value message.
pub fn validate_id<'a>(value: &'a str, field: &'static str) -> Result<&'a str, InvalidId> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InvalidId::Missing(field));
    }
    Uuid::parse_str(value).map_err(|_| InvalidId::Malformed(value.to_string()))?;
    Ok(value)
}
