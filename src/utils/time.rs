use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone name such as `US/Pacific`
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Current instant expressed in the given timezone
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Format a zoned instant as RFC 3339 with its numeric offset, e.g.
/// `2023-09-05T09:00:00.000000-07:00`
pub fn to_query_timestamp<Z: TimeZone>(time: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    time.to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("US/Pacific"), Some(chrono_tz::US::Pacific));
        assert_eq!(
            parse_timezone(" America/Los_Angeles "),
            Some(chrono_tz::America::Los_Angeles)
        );
        assert_eq!(parse_timezone("Pacific Standard Time"), None);
        assert_eq!(parse_timezone(""), None);
    }

    #[test]
    fn test_query_timestamp_uses_zone_offset() {
        let tz = chrono_tz::US::Pacific;

        // Daylight saving time
        let summer = tz.with_ymd_and_hms(2023, 9, 5, 9, 0, 0).unwrap();
        assert_eq!(to_query_timestamp(&summer), "2023-09-05T09:00:00.000000-07:00");

        // Standard time
        let winter = tz.with_ymd_and_hms(2023, 12, 5, 9, 0, 0).unwrap();
        assert_eq!(to_query_timestamp(&winter), "2023-12-05T09:00:00.000000-08:00");
    }

    #[test]
    fn test_now_in_is_current_instant() {
        let before = Utc::now();
        let now = now_in(chrono_tz::US::Pacific);
        let after = Utc::now();

        assert!(now.with_timezone(&Utc) >= before);
        assert!(now.with_timezone(&Utc) <= after);
    }
}
