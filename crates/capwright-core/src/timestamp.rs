use chrono::{DateTime, FixedOffset, SecondsFormat, Timelike, Utc};

/// Formats a timestamp the way CAP expects it. CAP deviates from RFC 3339
/// for zero UTC offsets: `+00:00` is written `-00:00`.
pub fn format_cap(dt: &DateTime<FixedOffset>) -> String {
    let formatted = dt.to_rfc3339_opts(SecondsFormat::Secs, false);
    if dt.offset().local_minus_utc() == 0 {
        formatted.replace("+00:00", "-00:00")
    } else {
        formatted
    }
}

pub fn format_cap_utc(dt: &DateTime<Utc>) -> String {
    format_cap(&dt.fixed_offset())
}

/// Drops seconds and sub-second precision. Locally authored alerts stamp
/// `sent` to the publication minute.
pub fn truncate_to_minute(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_offset_sign_is_flipped() {
        let dt = DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
        assert_eq!(format_cap(&dt), "2024-01-01T00:00:00-00:00");
    }

    #[test]
    fn nonzero_offset_is_untouched() {
        let dt = DateTime::parse_from_rfc3339("2024-01-01T03:00:00+03:00").unwrap();
        assert_eq!(format_cap(&dt), "2024-01-01T03:00:00+03:00");
    }

    #[test]
    fn truncation_drops_seconds() {
        let dt = DateTime::parse_from_rfc3339("2024-06-15T10:30:45.123Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            format_cap_utc(&truncate_to_minute(dt)),
            "2024-06-15T10:30:00-00:00"
        );
    }
}
