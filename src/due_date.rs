use chrono::{DateTime, FixedOffset, SecondsFormat, Timelike};

/// Parse a collaborator-supplied due date. Missing or malformed input
/// yields None rather than an error; a bad date must never abort the
/// pipeline.
pub fn parse_incoming(raw: Option<&str>) -> Option<DateTime<FixedOffset>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

/// A date-only picker or the generation step naturally produces
/// midnight; midnight is reinterpreted as "due by end of that day".
/// Any other instant is assumed intentional and passed through.
pub fn adjust_to_end_of_day(date: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let midnight = date.hour() == 0
        && date.minute() == 0
        && date.second() == 0
        && date.nanosecond() == 0;
    if !midnight {
        return date;
    }
    date.with_hour(23)
        .and_then(|d| d.with_minute(59))
        .and_then(|d| d.with_second(59))
        .and_then(|d| d.with_nanosecond(999_000_000))
        .unwrap_or(date)
}

/// Inverse of parse_incoming for the commit payload; None maps to null.
pub fn format_for_commit(date: Option<DateTime<FixedOffset>>) -> Option<String> {
    date.map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(parse_incoming(None), None);
        assert_eq!(parse_incoming(Some("")), None);
        assert_eq!(parse_incoming(Some("yesterday")), None);
        assert_eq!(parse_incoming(Some("2024-03-01")), None);
    }

    #[test]
    fn test_midnight_becomes_end_of_day() {
        let date = parse_incoming(Some("2024-03-01T00:00:00Z")).unwrap();
        let adjusted = adjust_to_end_of_day(date);
        assert_eq!(
            format_for_commit(Some(adjusted)).unwrap(),
            "2024-03-01T23:59:59.999Z"
        );
    }

    #[test]
    fn test_midnight_keeps_its_offset() {
        let date = parse_incoming(Some("2024-03-01T00:00:00+05:30")).unwrap();
        let adjusted = adjust_to_end_of_day(date);
        assert_eq!(
            format_for_commit(Some(adjusted)).unwrap(),
            "2024-03-01T23:59:59.999+05:30"
        );
    }

    #[test]
    fn test_non_midnight_passes_through() {
        let date = parse_incoming(Some("2024-03-01T09:15:00Z")).unwrap();
        assert_eq!(adjust_to_end_of_day(date), date);
    }

    #[test]
    fn test_round_trip_for_non_midnight_instants() {
        let raw = "2024-03-01T09:15:00.250Z";
        let parsed = parse_incoming(Some(raw)).unwrap();
        assert_eq!(format_for_commit(Some(parsed)).unwrap(), raw);
    }

    #[test]
    fn test_none_formats_as_null() {
        assert_eq!(format_for_commit(None), None);
    }
}
