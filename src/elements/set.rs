use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ElementsError;

/// A persisted two-line element set. Immutable once stored; a newer set
/// with a later epoch supersedes it, nothing ever mutates it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ElementSet {
    pub name: String,
    pub line1: String,
    pub line2: String,
    /// Element reference time, used only for freshness ordering.
    pub epoch: DateTime<Utc>,
}

impl ElementSet {
    /// Parse the publication source's response body: a satellite name line
    /// followed by the two fixed-width element lines. Checksum validation
    /// is the propagation model's job; the parsed set is rejected if the
    /// model cannot ingest it.
    pub fn from_source_text(text: &str) -> Result<Self, ElementsError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        let (name, line1, line2) = match lines.len() {
            2 => (None, lines[0], lines[1]),
            3 => (Some(lines[0]), lines[1], lines[2]),
            _ => return Err(ElementsError::MalformedText),
        };

        let elements = sgp4::Elements::from_tle(
            name.map(String::from),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| ElementsError::InvalidTle(e.to_string()))?;

        sgp4::Constants::from_elements(&elements)
            .map_err(|e| ElementsError::InvalidTle(e.to_string()))?;

        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

        Ok(Self {
            name,
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch: DateTime::from_naive_utc_and_offset(elements.datetime, Utc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const ISS_TLE: &str = "ISS (ZARYA)\n\
        1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927\n\
        2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537\n";

    #[test]
    fn parses_named_three_line_set() {
        let set = ElementSet::from_source_text(ISS_TLE).unwrap();
        assert_eq!(set.name, "ISS (ZARYA)");
        assert!(set.line1.starts_with("1 25544U"));
        assert!(set.line2.starts_with("2 25544"));
        assert_eq!(set.epoch.year(), 2008);
    }

    #[test]
    fn epoch_comes_from_the_element_lines() {
        let set = ElementSet::from_source_text(ISS_TLE).unwrap();
        // Day-of-year 264.51782528 of 2008.
        assert_eq!(set.epoch.ordinal(), 264);
    }

    #[test]
    fn rejects_garbage_text() {
        assert!(matches!(
            ElementSet::from_source_text("not a tle"),
            Err(ElementsError::MalformedText)
        ));
    }

    #[test]
    fn rejects_corrupted_lines() {
        let corrupted = ISS_TLE.replace("51.6416", "91.6416");
        assert!(matches!(
            ElementSet::from_source_text(&corrupted),
            Err(ElementsError::InvalidTle(_))
        ));
    }
}
