use chrono::{DateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Custom deserializer for card due dates.
///
/// Trello sends `null` for cards without a due date and an RFC3339 string
/// (`2018-01-04T17:00:00.000Z`) otherwise. Integer milliseconds are accepted
/// as well so fixtures can use either form.
pub fn deserialize_due<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .parse::<DateTime<Utc>>()
            .map(Some)
            .map_err(|e| Error::custom(format!("invalid due date: {}", e))),
        Value::Number(n) => {
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid due date"))?;
            DateTime::from_timestamp_millis(ms)
                .map(Some)
                .ok_or_else(|| Error::custom("due date out of range"))
        }
        _ => Err(Error::custom("due date must be null, a string or a number")),
    }
}

/// Treats a JSON `null` the same as a missing string field
pub fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
