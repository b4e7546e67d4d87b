use chrono::{DateTime, SecondsFormat, Utc};

/// Format a `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
///
/// The GraphQL DTOs expose timestamps as strings in this exact shape.
pub fn to_rfc3339_ms(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_format_datetime_as_rfc3339_with_millis() {
        let dt = Utc.with_ymd_and_hms(2026, 2, 11, 11, 9, 0).unwrap();
        assert_eq!(to_rfc3339_ms(dt), "2026-02-11T11:09:00.000Z");
    }
}
