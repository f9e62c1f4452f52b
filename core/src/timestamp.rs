//! Timestamp source and the fixed-width text form used on the wire.
//!
//! Stored timestamps and pagination cursors are RFC 3339 with exactly six
//! fractional digits and a `Z` suffix. At that width lexicographic order is
//! chronological order, which is what lets the document store sort by them.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Current UTC time truncated to microseconds, the precision the store keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn format(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse any RFC 3339 timestamp, normalizing the offset to UTC.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// `#[serde(with = "...")]` adapter for the fixed-width form.
pub mod micros {
    use chrono::{DateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_always_has_six_fraction_digits() {
        let whole = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(format(&whole), "2026-10-18T09:30:00.000000Z");
    }

    #[test]
    fn formatted_order_matches_time_order() {
        let earlier = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        let later = earlier + chrono::Duration::microseconds(500_000);
        assert!(format(&earlier) < format(&later));
    }

    #[test]
    fn parse_accepts_offsets_and_normalizes_to_utc() {
        let parsed = parse("2026-10-18T11:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage_and_naive_times() {
        assert!(parse("yesterday").is_none());
        assert!(parse("2026-10-18T09:30:00").is_none());
    }

    #[test]
    fn now_has_no_sub_microsecond_part() {
        use chrono::Timelike;
        assert_eq!(now().nanosecond() % 1_000, 0);
    }
}
