//! Normalisation of the date text printed on council pages.

use chrono::NaiveDate;

use crate::ports::ScrapeError;

/// Only accepted shape of a collection date, e.g. `24 December 2024`.
pub const PAGE_DATE_FORMAT: &str = "%d %B %Y";

/// Format used when showing a canonical date to people, e.g. `24/12/2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse `DD Month YYYY` text into a calendar date.
///
/// Surrounding whitespace is ignored. Weekday prefixes are not: callers strip the
/// `Tuesday, ` part before calling.
///
/// # Errors
///
/// Returns [`ScrapeError::DateFormat`] with the text verbatim when it does not match
/// [`PAGE_DATE_FORMAT`].
pub fn normalize_date(text: &str) -> Result<NaiveDate, ScrapeError> {
    NaiveDate::parse_from_str(text.trim(), PAGE_DATE_FORMAT)
        .map_err(|_err| ScrapeError::DateFormat(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn parses_day_month_year() {
        assert_eq!(
            normalize_date("24 December 2024").ok(),
            Some(date(2024, 12, 24)),
            "plain date"
        );
        assert_eq!(
            normalize_date("7 January 2025").ok(),
            Some(date(2025, 1, 7)),
            "single digit day"
        );
    }

    #[test]
    fn weekday_suffix_and_whitespace_give_the_same_day() {
        let line = "Tuesday, 24 December 2024";
        let (_weekday, suffix) = line.split_once(", ").expect("weekday separator");

        let from_suffix = normalize_date(suffix).ok();
        assert_eq!(from_suffix, normalize_date("24 December 2024").ok(), "suffix");
        assert_eq!(from_suffix, normalize_date("  24 December 2024\n").ok(), "padded");
    }

    #[test]
    fn rejects_other_shapes_verbatim() {
        for text in [
            "2024-12-24",
            "garbage",
            "",
            "24/12/2024",
            "Tuesday, 24 December 2024",
            "31 February 2024",
        ] {
            match normalize_date(text) {
                Err(ScrapeError::DateFormat(found)) => assert_eq!(found, text, "text kept"),
                other => panic!("expected DateFormat for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn display_format_is_day_first() {
        assert_eq!(
            date(2025, 1, 7).format(DISPLAY_DATE_FORMAT).to_string(),
            "07/01/2025",
            "display"
        );
    }
}
