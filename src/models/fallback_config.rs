//! The fallback configuration document and its validation.
//!
//! The document is deserialized into a raw, fully typed shape first (every
//! field required, unknown fields rejected) and then checked for the parts
//! serde cannot express, such as the `last_updated` timestamp.

use super::area::{AreaContact, CompanyArea};
use crate::error::{FallbackError, FallbackResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire shape of the configuration blob.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFallbackConfig {
    company_areas: Vec<CompanyArea>,
    default_contact: AreaContact,
    last_updated: String,
}

/// Validated fallback configuration.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FallbackConfig {
    /// Areas in configuration order (the order decides classification ties)
    #[serde(rename = "company_areas")]
    pub areas: Vec<CompanyArea>,

    /// Contact used when no area matches
    pub default_contact: AreaContact,

    /// When the document was last edited, normalised to UTC
    pub last_updated: DateTime<Utc>,
}

impl FallbackConfig {
    /// Parse and validate a configuration document from raw bytes.
    pub fn from_json_slice(bytes: &[u8]) -> FallbackResult<Self> {
        let raw: RawFallbackConfig = serde_json::from_slice(bytes)
            .map_err(|e| FallbackError::ConfigParse(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Parse and validate a configuration document from a string.
    pub fn from_json_str(json: &str) -> FallbackResult<Self> {
        Self::from_json_slice(json.as_bytes())
    }

    fn from_raw(raw: RawFallbackConfig) -> FallbackResult<Self> {
        let last_updated = parse_timestamp(&raw.last_updated).ok_or_else(|| {
            FallbackError::ConfigParse(format!(
                "last_updated is not an ISO-8601 timestamp: {:?}",
                raw.last_updated
            ))
        })?;

        for area in &raw.company_areas {
            if area.keywords.iter().any(|k| k.is_empty()) {
                // An empty keyword is a substring of every query.
                tracing::warn!(
                    "Area {} has an empty keyword and will match every query",
                    area.area_id
                );
            }
        }

        Ok(Self {
            areas: raw.company_areas,
            default_contact: raw.default_contact,
            last_updated,
        })
    }

    /// Look up an area by its identifier.
    pub fn area(&self, area_id: &str) -> Option<&CompanyArea> {
        self.areas.iter().find(|a| a.area_id == area_id)
    }
}

/// Parse an ISO-8601 timestamp into UTC.
///
/// Accepts RFC 3339 with `Z` or a numeric offset, naive date-times (read as
/// UTC) with `T` or a space separator, and bare dates (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"{
        "company_areas": [
            {
                "area_id": "billing",
                "area_name": "Billing",
                "keywords": ["invoice", "payment"],
                "contact": {"name": "Ana Ruiz", "email": "billing@example.com", "phone": "+34 600 000 001"},
                "description": "Invoices and payments"
            },
            {
                "area_id": "it",
                "area_name": "IT Support",
                "keywords": ["password", "login"],
                "contact": {"name": "Luis Gil", "email": "it@example.com", "phone": "+34 600 000 002"},
                "description": "Accounts and devices"
            }
        ],
        "default_contact": {"name": "Front Desk", "email": "info@example.com", "phone": "+34 600 000 000"},
        "last_updated": "2024-05-01T10:30:00Z"
    }"#;

    #[test]
    fn test_parse_valid_document() {
        let config = FallbackConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.areas.len(), 2);
        assert_eq!(config.areas[0].area_id, "billing");
        assert_eq!(config.areas[1].area_name, "IT Support");
        assert_eq!(config.default_contact.name, "Front Desk");
        assert_eq!(
            config.last_updated,
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
        );
        assert_eq!(config.area("it").unwrap().contact.name, "Luis Gil");
        assert!(config.area("hr").is_none());
    }

    #[test]
    fn test_parse_empty_areas() {
        let json = r#"{
            "company_areas": [],
            "default_contact": {"name": "Front Desk", "email": "info@example.com", "phone": "0"},
            "last_updated": "2024-05-01"
        }"#;
        let config = FallbackConfig::from_json_str(json).unwrap();
        assert!(config.areas.is_empty());
    }

    #[test]
    fn test_missing_company_areas() {
        let json = r#"{
            "default_contact": {"name": "Front Desk", "email": "info@example.com", "phone": "0"},
            "last_updated": "2024-05-01T10:30:00Z"
        }"#;
        match FallbackConfig::from_json_str(json) {
            Err(FallbackError::ConfigParse(message)) => {
                assert!(message.contains("company_areas"))
            }
            other => panic!("Expected ConfigParse error, got: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        let result = FallbackConfig::from_json_slice(b"{\"company_areas\": [");
        assert!(matches!(result, Err(FallbackError::ConfigParse(_))));
    }

    #[test]
    fn test_wrongly_typed_keywords() {
        let json = SAMPLE.replace(r#"["password", "login"]"#, r#""password""#);
        let result = FallbackConfig::from_json_str(&json);
        assert!(matches!(result, Err(FallbackError::ConfigParse(_))));
    }

    #[test]
    fn test_unknown_top_level_field() {
        let json = SAMPLE.replace(
            r#""last_updated""#,
            r#""version": 2, "last_updated""#,
        );
        let result = FallbackConfig::from_json_str(&json);
        assert!(matches!(result, Err(FallbackError::ConfigParse(_))));
    }

    #[test]
    fn test_invalid_timestamp() {
        let json = SAMPLE.replace("2024-05-01T10:30:00Z", "last tuesday");
        match FallbackConfig::from_json_str(&json) {
            Err(FallbackError::ConfigParse(message)) => {
                assert!(message.contains("last_updated"))
            }
            other => panic!("Expected ConfigParse error, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T10:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:30"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert!(parse_timestamp("2024-05-01T10:30:00.250Z").is_some());
        assert!(parse_timestamp("01/05/2024").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_serializes_with_wire_key() {
        let config = FallbackConfig::from_json_str(SAMPLE).unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("company_areas").is_some());
        assert!(value.get("areas").is_none());
    }
}
