//! Calendar dates on the wire: `YYYY-MM-DD`, or a full RFC 3339 timestamp
//! from endpoints that return stored documents.

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%Y-%m-%d";

pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format(FORMAT).to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
}

fn parse(raw: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    // Handle both "YYYY-MM-DD" and "YYYY-MM-DDTHH:MM:SS" without offset
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, FORMAT).ok()
}
