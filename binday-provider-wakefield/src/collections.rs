//! Collection schedule extraction from a property page.

use chrono::NaiveDate;
use tracing::{debug, info};
use url::Url;

use binday_core::{
    date::normalize_date,
    document::{Document, Element},
    model::{BinType, CollectionRecord},
    ports::ScrapeError,
};

use crate::{WHERE_I_LIVE_MARKER, expect_title, optional, required};

const CONTENT_BODY: &str = "div.c-content-section_body";
const BIN_SECTION: &str = "div.u-mb-8";
const REVEAL_CONTROL: &str = "a.futurecolldates";
const BIN_LABEL: &str = "div.u-mb-4";
const SUMMARY_LINE: &str = "div.u-mb-2";
const FUTURE_DATES: &str = "div.colldates";
const FUTURE_DATES_LIST: &str = "ul.u-mt-4";
const FUTURE_DATE_ITEM: &str = "li";

/// Extract one record per waste stream from the property page at `url`.
///
/// Streams without a "future collection dates" control are skipped. Records keep page order
/// and dates keep the order the page lists them in.
///
/// # Errors
///
/// Returns [`ScrapeError::UnexpectedPage`] when `url` is not a property page,
/// [`ScrapeError::UnknownBinType`] for an unrecognised stream label, and
/// [`ScrapeError::DateFormat`] or [`ScrapeError::MalformedText`] for date text that does not
/// parse. Any of them discards the records extracted so far.
pub async fn extract(
    document: &mut dyn Document,
    url: &Url,
) -> Result<Vec<CollectionRecord>, ScrapeError> {
    document.load(url).await?;
    expect_title(document, WHERE_I_LIVE_MARKER).await?;

    let body = required(document.find_one(None, CONTENT_BODY).await)?;
    let sections = document.find_all(Some(body), BIN_SECTION).await?;

    let mut records = Vec::with_capacity(sections.len());
    for section in sections {
        if let Some(record) = extract_section(document, section).await? {
            records.push(record);
        }
    }

    info!(%url, streams = records.len(), "extracted collection schedule");
    Ok(records)
}

async fn extract_section(
    document: &mut dyn Document,
    section: Element,
) -> Result<Option<CollectionRecord>, ScrapeError> {
    let Some(reveal) = optional(document.find_one(Some(section), REVEAL_CONTROL).await)? else {
        debug!("section has no future collection dates, skipping");
        return Ok(None);
    };

    let label_element = required(document.find_one(Some(section), BIN_LABEL).await)?;
    let label = document.text_of(label_element).await?;
    let bin_type = BinType::from_label(&label)?;

    // First line is the last collection, second the next one.
    let summaries = document.find_all(Some(section), SUMMARY_LINE).await?;
    let next_line = summaries.get(1).copied().ok_or_else(|| {
        ScrapeError::MissingElement(format!("next collection line of {label:?}"))
    })?;
    let next_text = document.text_of(next_line).await?;
    let mut record = CollectionRecord::new(bin_type, next_collection_date(&next_text)?);

    document.click(reveal).await?;
    let future = required(document.find_one(Some(section), FUTURE_DATES).await)?;
    let list = required(document.find_one(Some(future), FUTURE_DATES_LIST).await)?;

    for item in document.find_all(Some(list), FUTURE_DATE_ITEM).await? {
        let text = document.text_of(item).await?;
        let date = future_date(&text)?;
        if !record.push_date(date) {
            // Seen for household waste: the next collection is listed again.
            debug!(%bin_type, %date, "dropping repeated collection date");
        }
    }

    debug!(%bin_type, dates = record.collection_dates.len(), "extracted stream");
    Ok(Some(record))
}

/// `Next collection - Tuesday, 24 December 2024` → 24/12/2024.
fn next_collection_date(text: &str) -> Result<NaiveDate, ScrapeError> {
    let (_heading, dated) = split_pair(text, " - ")?;
    let (_weekday, date) = split_pair(dated.trim(), ", ")?;
    normalize_date(date)
}

/// `Tue, 7 January 2025` → 07/01/2025.
fn future_date(text: &str) -> Result<NaiveDate, ScrapeError> {
    let (_weekday, date) = split_pair(text, ", ")?;
    normalize_date(date)
}

fn split_pair<'text>(
    text: &'text str,
    separator: &'static str,
) -> Result<(&'text str, &'text str), ScrapeError> {
    text.split_once(separator)
        .ok_or_else(|| ScrapeError::MalformedText {
            separator,
            text: text.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn next_line_yields_trailing_date() {
        assert_eq!(
            next_collection_date("Next collection - Tuesday, 24 December 2024").ok(),
            Some(date(2024, 12, 24)),
            "next line"
        );
    }

    #[test]
    fn future_item_drops_weekday() {
        assert_eq!(
            future_date("Tue, 7 January 2025").ok(),
            Some(date(2025, 1, 7)),
            "future item"
        );
    }

    #[test]
    fn missing_separators_are_malformed() {
        assert!(
            matches!(
                next_collection_date("Next collection Tuesday 24 December 2024"),
                Err(ScrapeError::MalformedText {
                    separator: " - ",
                    ..
                })
            ),
            "dash separator"
        );
        assert!(
            matches!(
                next_collection_date("Next collection - 24 December 2024"),
                Err(ScrapeError::MalformedText {
                    separator: ", ",
                    ..
                })
            ),
            "weekday separator"
        );
        assert!(
            matches!(
                future_date("7 January 2025"),
                Err(ScrapeError::MalformedText { .. })
            ),
            "future item without weekday"
        );
    }

    #[test]
    fn unparseable_suffix_is_a_date_format_error() {
        match future_date("Tue, 2025-01-07") {
            Err(ScrapeError::DateFormat(text)) => assert_eq!(text, "2025-01-07", "suffix kept"),
            other => panic!("expected DateFormat, got {other:?}"),
        }
    }
}
