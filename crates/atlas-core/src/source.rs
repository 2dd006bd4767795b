//! Decoding of data-source payloads.
//!
//! The events API is paginated: each response is a page envelope
//! `{ count, next, previous, results }`. Callers fetch every page and hand
//! the concatenation to the pipeline. Payloads here may be a list of pages,
//! a single page, or a bare list of records.

use std::path::Path;

use atlas_types::{Category, Event};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Errors that can occur while decoding source payloads.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Failed to read a payload file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The payload is not valid JSON for any accepted shape.
    #[error("failed to decode payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of records across all pages, if reported.
    #[serde(default)]
    pub count: Option<u64>,
    /// URL of the next page.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Records on this page.
    pub results: Vec<T>,
}

/// A page of events.
pub type EventPage = Page<Event>;

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    Pages(Vec<Page<T>>),
    Page(Page<T>),
    Records(Vec<T>),
}

impl<T> Payload<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            Self::Pages(pages) => concat_pages(pages),
            Self::Page(page) => page.results,
            Self::Records(records) => records,
        }
    }
}

/// Concatenate page results in page order.
pub fn concat_pages<T>(pages: Vec<Page<T>>) -> Vec<T> {
    pages.into_iter().flat_map(|page| page.results).collect()
}

fn decode<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, SourceError> {
    let payload: Payload<T> = serde_json::from_str(json)?;
    Ok(payload.into_records())
}

/// Decode events from a list of pages, a single page, or a bare list.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the payload matches none of the shapes.
pub fn decode_events(json: &str) -> Result<Vec<Event>, SourceError> {
    let events: Vec<Event> = decode(json)?;
    tracing::debug!(count = events.len(), "decoded events");
    Ok(events)
}

/// Decode categories from a list of pages, a single page, or a bare list.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the payload matches none of the shapes.
pub fn decode_categories(json: &str) -> Result<Vec<Category>, SourceError> {
    let categories: Vec<Category> = decode(json)?;
    tracing::debug!(count = categories.len(), "decoded categories");
    Ok(categories)
}

/// Read and decode an events file.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read, or
/// [`SourceError::Json`] if its content cannot be decoded.
pub fn load_events(path: &Path) -> Result<Vec<Event>, SourceError> {
    decode_events(&read(path)?)
}

/// Read and decode a categories file.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be read, or
/// [`SourceError::Json`] if its content cannot be decoded.
pub fn load_categories(path: &Path) -> Result<Vec<Category>, SourceError> {
    decode_categories(&read(path)?)
}

fn read(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use atlas_types::{CategoryId, EventId};

    use super::*;

    const PAGE_ONE: &str = r#"{
        "count": 3,
        "next": "https://atlas.example/api/events/?page=2",
        "previous": null,
        "results": [
            {"id": 1, "title": "a", "point_in_time": {"value": "1066-10-14", "resolution": "day"}},
            {"id": 2, "title": "b"}
        ]
    }"#;

    const PAGE_TWO: &str = r#"{
        "count": 3,
        "next": null,
        "previous": "https://atlas.example/api/events/?page=1",
        "results": [{"id": 3, "title": "c", "category_id": 4}]
    }"#;

    fn ids(events: &[Event]) -> Vec<EventId> {
        events.iter().map(|e| e.id).collect()
    }

    #[test]
    fn pages_are_concatenated_in_order() {
        let json = format!("[{PAGE_ONE}, {PAGE_TWO}]");
        let events = decode_events(&json);
        assert!(events.is_ok(), "decode failed: {events:?}");
        let events = events.unwrap_or_default();
        assert_eq!(ids(&events), vec![EventId(1), EventId(2), EventId(3)]);
        assert_eq!(events.get(2).and_then(|e| e.category_id), Some(CategoryId(4)));
    }

    #[test]
    fn single_page_is_accepted() {
        let events = decode_events(PAGE_TWO).unwrap_or_default();
        assert_eq!(ids(&events), vec![EventId(3)]);
    }

    #[test]
    fn bare_list_is_accepted() {
        let events = decode_events(r#"[{"id": 9, "title": "x"}]"#).unwrap_or_default();
        assert_eq!(ids(&events), vec![EventId(9)]);
        assert!(decode_events("[]").is_ok_and(|e| e.is_empty()));
    }

    #[test]
    fn categories_decode() {
        let json = r#"{"results": [{"id": 1, "name": "World War II", "wikidata_id": "Q362"}]}"#;
        let categories = decode_categories(json).unwrap_or_default();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories.first().map(|c| c.name.as_str()), Some("World War II"));
    }

    #[test]
    fn api_fallback_fields_feed_labels() {
        let json = r#"{"results": [{"id": 7, "name": "", "wikidata_id": "Q362"}]}"#;
        let categories = decode_categories(json).unwrap_or_default();
        assert_eq!(categories.first().map(|c| c.alternate_label.as_str()), Some("Q362"));
        assert_eq!(
            categories.first().map(crate::groups::category_label),
            Some("Q362".to_owned())
        );

        let json = r#"{"results": [{"id": 8, "title": " ", "wikidata_id": "Q1",
            "wikipedia_title": "Siege_of_Alesia"}]}"#;
        let events = decode_events(json).unwrap_or_default();
        assert_eq!(
            events.first().map(Event::display_title),
            Some("Siege_of_Alesia".to_owned())
        );
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(matches!(decode_events("{\"results\": 3}"), Err(SourceError::Json(_))));
        assert!(matches!(decode_events("not json"), Err(SourceError::Json(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_events(Path::new("/nonexistent/events.json"));
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }
}
