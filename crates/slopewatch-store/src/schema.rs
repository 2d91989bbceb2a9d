//! Persisted record schema for the reading log
//!
//! # Versions
//!
//! - **v0** (legacy): a bare JSON array of records, as written by the first
//!   mobile client. Still read; rewritten as v1 on the next append.
//! - **v1**: an envelope `{ "version": 1, "readings": [ ... ] }`.
//!
//! Each record has the shape
//!
//! ```json
//! { "id": "…", "timestamp": "2024-03-01T12:00:00Z", "soilMoisture": 42.0,
//!   "slopeAngle": 12.5, "observation": "…" }
//! ```
//!
//! with `observation` omitted when absent. Unknown fields, missing fields,
//! out-of-range measurements and repeated ids all make the blob corrupt.
//! Adding a field means bumping [`SCHEMA_VERSION`] and teaching
//! [`decode_log`] to upgrade the previous version.

use crate::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slopewatch_domain::{Reading, ReadingId};
use std::collections::HashSet;

/// Schema version written by this crate
pub const SCHEMA_VERSION: u32 = 1;

/// On-disk form of one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReadingRecord {
    /// Hyphenated UUID
    pub id: String,
    /// ISO-8601 instant
    pub timestamp: DateTime<Utc>,
    /// Percent
    pub soil_moisture: f64,
    /// Degrees
    pub slope_angle: f64,
    /// Free text, omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl From<&Reading> for ReadingRecord {
    fn from(reading: &Reading) -> Self {
        Self {
            id: reading.id.to_string(),
            timestamp: reading.timestamp,
            soil_moisture: reading.soil_moisture,
            slope_angle: reading.slope_angle,
            observation: reading.observation.clone(),
        }
    }
}

impl TryFrom<ReadingRecord> for Reading {
    type Error = String;

    fn try_from(record: ReadingRecord) -> Result<Self, Self::Error> {
        let id = ReadingId::from_string(&record.id)?;
        // Older clients stored "" for a blank observation field
        let observation = record.observation.filter(|o| !o.trim().is_empty());
        let reading = Reading::new(
            id,
            record.timestamp,
            record.soil_moisture,
            record.slope_angle,
            observation,
        );

        if !reading.has_valid_measurements() {
            return Err(format!(
                "reading {} has out-of-range measurements (moisture {}, angle {})",
                record.id, record.soil_moisture, record.slope_angle
            ));
        }

        Ok(reading)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    readings: &'a [ReadingRecord],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    version: u32,
    readings: Vec<ReadingRecord>,
}

/// A log decoded from its blob
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    /// Schema version the blob was written with
    pub version: u32,
    /// Readings in log order
    pub readings: Vec<Reading>,
}

/// Serialize a log as a v1 envelope
pub fn encode_log(readings: &[Reading]) -> Result<String, StoreError> {
    let records: Vec<ReadingRecord> = readings.iter().map(ReadingRecord::from).collect();
    let envelope = EnvelopeRef {
        version: SCHEMA_VERSION,
        readings: &records,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse a blob in any supported schema version
///
/// There is no best-effort recovery: a single bad record fails the whole
/// blob with [`StoreError::CorruptData`].
pub fn decode_log(blob: &str) -> Result<DecodedLog, StoreError> {
    let value: serde_json::Value = serde_json::from_str(blob)
        .map_err(|e| StoreError::CorruptData(format!("log is not valid JSON: {}", e)))?;

    let (version, records) = match value {
        serde_json::Value::Array(_) => {
            let records: Vec<ReadingRecord> = serde_json::from_value(value)
                .map_err(|e| StoreError::CorruptData(format!("legacy record: {}", e)))?;
            (0, records)
        }
        serde_json::Value::Object(ref map) => {
            let version = map
                .get("version")
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| {
                    StoreError::CorruptData("log envelope has no numeric version".to_string())
                })?;
            if version > u64::from(SCHEMA_VERSION) {
                return Err(StoreError::CorruptData(format!(
                    "unsupported schema version {} (newest known is {})",
                    version, SCHEMA_VERSION
                )));
            }
            if version == 0 {
                return Err(StoreError::CorruptData(
                    "version 0 logs are bare arrays, not envelopes".to_string(),
                ));
            }
            let envelope: Envelope = serde_json::from_value(value)
                .map_err(|e| StoreError::CorruptData(format!("record: {}", e)))?;
            (envelope.version, envelope.readings)
        }
        other => {
            return Err(StoreError::CorruptData(format!(
                "expected an array or envelope, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut readings = Vec::with_capacity(records.len());
    for record in records {
        let reading = Reading::try_from(record).map_err(StoreError::CorruptData)?;
        if !seen.insert(reading.id) {
            return Err(StoreError::CorruptData(format!(
                "reading id {} appears more than once",
                reading.id
            )));
        }
        readings.push(reading);
    }

    Ok(DecodedLog { version, readings })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(moisture: f64, angle: f64, observation: Option<&str>) -> Reading {
        Reading::new(
            ReadingId::new(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            moisture,
            angle,
            observation.map(str::to_string),
        )
    }

    #[test]
    fn test_encode_shape() {
        let r = reading(42.0, 12.5, None);
        let blob = encode_log(std::slice::from_ref(&r)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

        assert_eq!(value["version"], 1);
        let record = &value["readings"][0];
        assert_eq!(record["id"], r.id.to_string());
        assert_eq!(record["soilMoisture"], 42.0);
        assert_eq!(record["slopeAngle"], 12.5);
        assert!(record["timestamp"].as_str().unwrap().starts_with("2024-03-01T12:00:00"));
        assert!(record.get("observation").is_none());
    }

    #[test]
    fn test_decode_current_version() {
        let readings = vec![reading(10.0, 5.0, Some("dry")), reading(80.0, 50.0, None)];
        let decoded = decode_log(&encode_log(&readings).unwrap()).unwrap();

        assert_eq!(decoded.version, SCHEMA_VERSION);
        assert_eq!(decoded.readings, readings);
    }

    #[test]
    fn test_decode_legacy_array() {
        let blob = r#"[
            {"id":"9b2f0c8e-6d1a-4f5e-8a77-3c2b1d0e9f41","timestamp":"2024-01-05T08:30:00.000Z",
             "soilMoisture":55,"slopeAngle":20,"observation":""},
            {"id":"1c7e4a52-0b3d-4c8f-9e21-6a5d4b3c2e10","timestamp":"2024-01-06T09:00:00.000Z",
             "soilMoisture":75.5,"slopeAngle":32,"observation":"cracks near the road"}
        ]"#;

        let decoded = decode_log(blob).unwrap();
        assert_eq!(decoded.version, 0);
        assert_eq!(decoded.readings.len(), 2);
        assert_eq!(decoded.readings[0].observation, None);
        assert_eq!(
            decoded.readings[1].observation.as_deref(),
            Some("cracks near the road")
        );
    }

    #[test]
    fn test_envelope_version_is_reported() {
        let decoded = decode_log(r#"{"version":1,"readings":[]}"#).unwrap();
        assert_eq!(decoded.version, 1);
        assert!(decoded.readings.is_empty());

        let result = decode_log(r#"{"version":1.5,"readings":[]}"#);
        assert!(matches!(result, Err(StoreError::CorruptData(_))));
    }

    #[test]
    fn test_future_version_rejected() {
        let result = decode_log(r#"{"version":2,"readings":[]}"#);
        assert!(matches!(result, Err(StoreError::CorruptData(_))));
    }

    #[test]
    fn test_malformed_blobs_rejected() {
        let cases = [
            "not json",
            "42",
            r#"{"readings":[]}"#,
            r#"{"version":1,"readings":[],"extra":true}"#,
            r#"[{"id":"9b2f0c8e-6d1a-4f5e-8a77-3c2b1d0e9f41","timestamp":"2024-01-05T08:30:00Z","soilMoisture":55}]"#,
            r#"[{"id":"nope","timestamp":"2024-01-05T08:30:00Z","soilMoisture":55,"slopeAngle":20}]"#,
            r#"[{"id":"9b2f0c8e-6d1a-4f5e-8a77-3c2b1d0e9f41","timestamp":"yesterday","soilMoisture":55,"slopeAngle":20}]"#,
            r#"[{"id":"9b2f0c8e-6d1a-4f5e-8a77-3c2b1d0e9f41","timestamp":"2024-01-05T08:30:00Z","soilMoisture":155,"slopeAngle":20}]"#,
            r#"[{"id":"9b2f0c8e-6d1a-4f5e-8a77-3c2b1d0e9f41","timestamp":"2024-01-05T08:30:00Z","soilMoisture":55,"slopeAngle":20,"risk":"High"}]"#,
        ];

        for blob in cases {
            assert!(
                matches!(decode_log(blob), Err(StoreError::CorruptData(_))),
                "blob should be rejected: {}",
                blob
            );
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let r = reading(10.0, 5.0, None);
        let blob = encode_log(&[r.clone(), r]).unwrap();
        assert!(matches!(decode_log(&blob), Err(StoreError::CorruptData(_))));
    }
}
