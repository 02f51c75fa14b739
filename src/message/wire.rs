use std::fmt;

use serde_json::{Map, Value};

use super::Topic;
use crate::utils::{PubSubError, Result};

/// The payload of one broadcast: string keys to arbitrary JSON values, in
/// insertion order. No schema is imposed.
pub type Record = Map<String, Value>;

const MICROS_PER_SEC: u64 = 1_000_000;

/// One published record as it travels over the wire.
///
/// The text form is a single line of three space-separated fields:
///
/// ```text
/// <topic> <seconds>.<micros> <json-object>
/// ```
///
/// for example `sensor 1725000000.250000 {"temp":25}`. The timestamp always
/// carries six fractional digits and the record is compact JSON, so
/// [`WireMessage::parse`] recovers exactly what [`Display`](fmt::Display)
/// wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct WireMessage {
    topic: Topic,
    timestamp_micros: i64,
    record: Record,
}

impl WireMessage {
    pub fn new(topic: Topic, timestamp_micros: i64, record: Record) -> Self {
        Self {
            topic,
            timestamp_micros,
            record,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Microseconds since the Unix epoch.
    pub fn timestamp_micros(&self) -> i64 {
        self.timestamp_micros
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> f64 {
        self.timestamp_micros as f64 / MICROS_PER_SEC as f64
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut fields = text.splitn(3, ' ');
        let topic = fields.next().unwrap_or_default();
        let timestamp = fields
            .next()
            .ok_or_else(|| PubSubError::MalformedMessage("missing timestamp field".into()))?;
        let body = fields
            .next()
            .ok_or_else(|| PubSubError::MalformedMessage("missing record field".into()))?;

        let topic = Topic::new(topic)
            .map_err(|e| PubSubError::MalformedMessage(e.to_string()))?;
        let timestamp_micros = parse_timestamp(timestamp)?;
        let record = serde_json::from_str::<Record>(body)
            .map_err(|e| PubSubError::MalformedMessage(format!("record is not a JSON object: {e}")))?;

        Ok(Self::new(topic, timestamp_micros, record))
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = serde_json::to_string(&self.record).map_err(|_| fmt::Error)?;
        write!(
            f,
            "{} {} {}",
            self.topic,
            format_timestamp(self.timestamp_micros),
            body
        )
    }
}

fn format_timestamp(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let magnitude = micros.unsigned_abs();
    format!(
        "{sign}{}.{:06}",
        magnitude / MICROS_PER_SEC,
        magnitude % MICROS_PER_SEC
    )
}

fn parse_timestamp(field: &str) -> Result<i64> {
    let malformed = || PubSubError::MalformedMessage(format!("bad timestamp {field:?}"));

    let (negative, digits) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field),
    };
    let (secs, frac) = digits.split_once('.').ok_or_else(malformed)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(secs) || frac.len() != 6 || !all_digits(frac) {
        return Err(malformed());
    }

    let secs: i64 = secs.parse().map_err(|_| malformed())?;
    let frac: i64 = frac.parse().map_err(|_| malformed())?;
    let magnitude = secs
        .checked_mul(MICROS_PER_SEC as i64)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(malformed)?;

    Ok(if negative { -magnitude } else { magnitude })
}

