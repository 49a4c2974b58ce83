//! ISO-8601 video durations as reported by the Data API.

use regex::Regex;
use std::sync::LazyLock;

/// `PT#H#M#S`, with the day component upstream uses for very long videos
static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("duration pattern is a valid regex")
});

/// Total seconds in an ISO-8601 duration, or `None` if it does not parse.
///
/// ```
/// use tubescope::services::duration::parse_duration_seconds;
///
/// assert_eq!(parse_duration_seconds("PT1H2M3S"), Some(3723));
/// assert_eq!(parse_duration_seconds("P0D"), Some(0));
/// assert_eq!(parse_duration_seconds("4:13"), None);
/// ```
pub fn parse_duration_seconds(iso: &str) -> Option<u64> {
    let iso = iso.trim();
    // A time designator must be followed by at least one component
    if iso.ends_with('T') {
        return None;
    }

    let caps = DURATION_PATTERN.captures(iso)?;
    if (1..=4).all(|index| caps.get(index).is_none()) {
        return None;
    }

    let component = |index: usize| -> Option<u64> {
        match caps.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let days = component(1)?;
    let hours = component(2)?;
    let minutes = component(3)?;
    let seconds = component(4)?;

    // Overflowing values are treated as unparseable
    days.checked_mul(86_400)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Clock-style rendering: `H:MM:SS` when an hour or more, otherwise `MM:SS`.
///
/// Input that is not an ISO-8601 duration is returned unchanged.
pub fn format_duration(iso: &str) -> String {
    match parse_duration_seconds(iso) {
        Some(total) => format_seconds(total),
        None => iso.to_string(),
    }
}

fn format_seconds(total: u64) -> String {
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_full_duration() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
    }

    #[test]
    fn test_format_seconds_only() {
        assert_eq!(format_duration("PT45S"), "00:45");
    }

    #[test]
    fn test_format_minutes_only() {
        assert_eq!(format_duration("PT5M"), "05:00");
    }

    #[test]
    fn test_format_hours_without_seconds() {
        assert_eq!(format_duration("PT2H"), "2:00:00");
        assert_eq!(format_duration("PT10H5M"), "10:05:00");
    }

    #[test]
    fn test_day_component() {
        assert_eq!(parse_duration_seconds("P1DT2H"), Some(93_600));
        assert_eq!(format_duration("P1DT2H"), "26:00:00");
    }

    #[test]
    fn test_live_stream_zero_duration() {
        assert_eq!(parse_duration_seconds("P0D"), Some(0));
        assert_eq!(format_duration("P0D"), "00:00");
    }

    #[test]
    fn test_empty_designators_rejected() {
        for input in ["P", "PT", "P1DT"] {
            assert_eq!(parse_duration_seconds(input), None, "{}", input);
            assert_eq!(format_duration(input), input);
        }
    }

    #[test]
    fn test_overflow_is_unparseable() {
        assert_eq!(parse_duration_seconds("P999999999999999999D"), None);
        assert_eq!(parse_duration_seconds("PT99999999999999999999S"), None);
        assert_eq!(
            format_duration("P999999999999999999D"),
            "P999999999999999999D"
        );
        assert_eq!(
            parse_duration_seconds(&format!("PT{}S", u64::MAX)),
            Some(u64::MAX)
        );
        assert_eq!(parse_duration_seconds(&format!("PT1M{}S", u64::MAX)), None);
    }

    #[test]
    fn test_unparseable_is_passed_through() {
        assert_eq!(parse_duration_seconds("ten minutes"), None);
        assert_eq!(format_duration("ten minutes"), "ten minutes");
        assert_eq!(parse_duration_seconds(""), None);
    }
}
