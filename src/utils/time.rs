use chrono::{DateTime, Local, NaiveDateTime};

/// Format used when writing `fecha_creacion`. Matches a naive ISO-8601
/// timestamp with optional fractional seconds.
pub const RECORD_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // Naive ISO-8601 first, that is what records carry
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, RECORD_FORMAT) {
        return Some(naive);
    }

    // Then RFC3339, converted to local wall-clock time
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    // Try common date formats
    let formats = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d/%m/%Y %H:%M:%S",
    ];

    for format in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive);
        }
    }

    // Date-only inputs land on midnight
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(RECORD_FORMAT).to_string()
}

/// Current local time, the way new templates are stamped.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Today's date in the `DD/MM/YYYY` form used by date fields.
pub fn today() -> String {
    Local::now().format("%d/%m/%Y").to_string()
}

/// Serde adapter for `fecha_creacion`.
pub mod record {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_datetime(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_datetime(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
