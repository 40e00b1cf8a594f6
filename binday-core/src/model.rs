//! Domain data structures for councils, addresses, and collection schedules.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ports::ScrapeError;

/// Built-in councils supported by the application.
pub enum Councils {
    /// Wakefield Council, West Yorkshire.
    Wakefield,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a council known to binday.
pub struct CouncilId(pub String);

impl fmt::Display for Councils {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Councils::Wakefield => "wakefield",
        };
        write!(formatter, "{slug}")
    }
}

impl From<Councils> for CouncilId {
    fn from(council: Councils) -> Self {
        CouncilId(council.to_string())
    }
}

impl fmt::Display for CouncilId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a council and its human-friendly name.
pub struct CouncilMeta {
    /// Unique identifier.
    pub id: CouncilId,
    /// Display name.
    pub name: String,
}

/// Page labels mapped to the stream they announce. Matching is exact.
const BIN_TYPE_LABELS: [(&str, BinType); 3] = [
    ("Household waste", BinType::HouseholdWaste),
    ("Mixed recycling", BinType::Recycling),
    ("Garden waste recycling", BinType::GardenWaste),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Waste streams with their own collection schedule.
pub enum BinType {
    /// General household waste.
    HouseholdWaste,
    /// Mixed recycling.
    Recycling,
    /// Garden waste recycling.
    GardenWaste,
}

impl BinType {
    /// Classify a section label exactly as printed on the council page.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::UnknownBinType`] carrying the label when it is not one of the
    /// known stream labels. Unknown labels mean the page layout changed, so there is no fallback.
    pub fn from_label(label: &str) -> Result<Self, ScrapeError> {
        BIN_TYPE_LABELS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, bin_type)| *bin_type)
            .ok_or_else(|| ScrapeError::UnknownBinType(label.to_owned()))
    }

    /// Label used by the council page for this stream.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BinType::HouseholdWaste => "Household waste",
            BinType::Recycling => "Mixed recycling",
            BinType::GardenWaste => "Garden waste recycling",
        }
    }
}

impl fmt::Display for BinType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            BinType::HouseholdWaste => "household_waste",
            BinType::Recycling => "recycling",
            BinType::GardenWaste => "garden_waste",
        };
        formatter.write_str(slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Upcoming collections for one waste stream at one property.
///
/// Dates are unique and kept in the order the page lists them, next collection first.
/// The page is trusted to list them chronologically; they are never re-sorted here.
pub struct CollectionRecord {
    /// Stream the dates belong to.
    pub bin_type: BinType,
    /// Collection days, earliest first.
    pub collection_dates: Vec<NaiveDate>,
}

impl CollectionRecord {
    /// Start a record from the next collection date announced for a stream.
    #[must_use]
    pub fn new(bin_type: BinType, next_collection: NaiveDate) -> Self {
        Self {
            bin_type,
            collection_dates: vec![next_collection],
        }
    }

    /// Append a date unless the record already holds the same day.
    ///
    /// Returns `false` when the date was a duplicate and got dropped.
    pub fn push_date(&mut self, date: NaiveDate) -> bool {
        if self.collection_dates.contains(&date) {
            return false;
        }
        self.collection_dates.push(date);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Property found by a postcode search.
pub struct AddressResult {
    /// Address as displayed by the council.
    pub address: String,
    /// Absolute URL of the property's collection page.
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Normalised postcode to search addresses for.
pub struct PostcodeQuery(String);

impl PostcodeQuery {
    /// Normalise a postcode: surrounding whitespace is trimmed, letters upper-cased.
    #[must_use]
    pub fn new<S: AsRef<str>>(postcode: S) -> Self {
        Self(postcode.as_ref().trim().to_uppercase())
    }

    /// Check if the query is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalised postcode text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostcodeQuery {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn known_labels_classify() {
        assert_eq!(
            BinType::from_label("Household waste").ok(),
            Some(BinType::HouseholdWaste),
            "household label"
        );
        assert_eq!(
            BinType::from_label("Mixed recycling").ok(),
            Some(BinType::Recycling),
            "recycling label"
        );
        assert_eq!(
            BinType::from_label("Garden waste recycling").ok(),
            Some(BinType::GardenWaste),
            "garden label"
        );
    }

    #[test]
    fn unknown_labels_fail_with_the_label() {
        for label in ["Food waste", "household waste", "Household waste ", ""] {
            match BinType::from_label(label) {
                Err(ScrapeError::UnknownBinType(found)) => assert_eq!(found, label, "label kept"),
                other => panic!("expected UnknownBinType for {label:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn label_round_trips_through_classification() {
        for (_, bin_type) in BIN_TYPE_LABELS {
            assert_eq!(
                BinType::from_label(bin_type.label()).ok(),
                Some(bin_type),
                "label of {bin_type}"
            );
        }
    }

    #[test]
    fn record_drops_repeated_days_and_keeps_first_order() {
        let mut record = CollectionRecord::new(BinType::HouseholdWaste, date(2024, 12, 24));

        assert!(!record.push_date(date(2024, 12, 24)), "repeat of next date");
        assert!(record.push_date(date(2025, 1, 7)), "new date");
        assert!(!record.push_date(date(2025, 1, 7)), "repeat of future date");

        assert_eq!(
            record.collection_dates,
            vec![date(2024, 12, 24), date(2025, 1, 7)],
            "dates"
        );
    }

    #[test]
    fn record_serializes_with_snake_case_stream_and_iso_dates() {
        let record = CollectionRecord::new(BinType::GardenWaste, date(2025, 3, 4));
        let json = serde_json::to_string(&record).expect("serializable record");
        assert_eq!(
            json, r#"{"bin_type":"garden_waste","collection_dates":["2025-03-04"]}"#,
            "json shape"
        );
    }

    #[test]
    fn postcode_is_normalised() {
        let query = PostcodeQuery::new("  wf1 2hq ");
        assert_eq!(query.as_str(), "WF1 2HQ", "normalised");
        assert!(!query.is_empty(), "not empty");
        assert!(PostcodeQuery::new("   ").is_empty(), "blank is empty");
    }
}
