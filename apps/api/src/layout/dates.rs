//! Year-month formatting for entry date ranges.

/// Shown instead of an end date for current roles and degrees.
pub const ONGOING_MARKER: &str = "Present";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `""` → ongoing marker, `"2021-03"` → `"Mar 2021"`, anything else unchanged.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return ONGOING_MARKER.to_string();
    }
    match parse_year_month(value) {
        Some((year, month)) => format!("{} {}", MONTH_ABBREVIATIONS[month - 1], year),
        None => value.to_string(),
    }
}

/// `start – end`, where end is the ongoing marker for current entries
/// regardless of the stored end date.
pub fn date_range(start: &str, end: &str, is_current: bool) -> String {
    let end = if is_current {
        ONGOING_MARKER.to_string()
    } else {
        format_date(end)
    };
    format!("{} \u{2013} {}", format_date(start), end)
}

fn parse_year_month(value: &str) -> Option<(&str, usize)> {
    let (year, month) = value.split_once('-')?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: usize = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_year_month() {
        assert_eq!(format_date("2021-03"), "Mar 2021");
        assert_eq!(format_date("1999-12"), "Dec 1999");
        assert_eq!(format_date("2000-01"), "Jan 2000");
    }

    #[test]
    fn test_empty_formats_as_ongoing() {
        assert_eq!(format_date(""), ONGOING_MARKER);
    }

    #[test]
    fn test_unexpected_shapes_pass_through() {
        assert_eq!(format_date("2021"), "2021");
        assert_eq!(format_date("2021-13"), "2021-13");
        assert_eq!(format_date("March 2021"), "March 2021");
        assert_eq!(format_date("2021-03-15"), "2021-03-15");
    }

    #[test]
    fn test_current_entry_ends_with_marker_regardless_of_end_date() {
        for end in ["", "2019-05", "garbage"] {
            let range = date_range("2018-01", end, true);
            assert!(
                range.ends_with(ONGOING_MARKER),
                "expected ongoing marker for end={end:?}, got {range}"
            );
        }
    }

    #[test]
    fn test_finished_entry_range() {
        assert_eq!(date_range("2018-01", "2020-06", false), "Jan 2018 \u{2013} Jun 2020");
        assert_eq!(date_range("2018-01", "", false), "Jan 2018 \u{2013} Present");
    }
}
