//! Detail pages: record extraction and batch collection

use crate::config::SelectorConfig;
use crate::crawler::fetcher::PageSource;
use crate::crawler::gate::FetchGate;
use crate::crawler::parser::{Document, HtmlDocument};
use futures::future::join_all;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Key under which a record stores the page it was scraped from
pub const URL_FIELD: &str = "url";

/// Flat label → value mapping scraped from one detail page
///
/// Labels keep the order in which they were first inserted. Inserting an
/// existing label replaces its value in place. Serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApartmentRecord {
    fields: Vec<(String, String)>,
}

impl ApartmentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `label` to `value`
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();

        match self.fields.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value.as_str())
    }

    /// The source page of this record, if recorded
    pub fn url(&self) -> Option<&str> {
        self.get(URL_FIELD)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_str()))
    }
}

impl Serialize for ApartmentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (label, value) in &self.fields {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ApartmentRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = ApartmentRecord;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of string labels to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut record = ApartmentRecord::new();
                while let Some((label, value)) = access.next_entry::<String, String>()? {
                    record.insert(label, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Builds a record from a detail page
///
/// Label and value texts are paired by position. When one list is longer
/// its extra entries are dropped. `source_url` is stored under `url`.
pub fn extract_details(
    doc: &impl Document,
    selectors: &SelectorConfig,
    source_url: &str,
) -> ApartmentRecord {
    let labels = doc.select_text(&selectors.detail_label);
    let values = doc.select_text(&selectors.detail_value);

    let mut record = ApartmentRecord::new();
    for (label, value) in labels.into_iter().zip(values) {
        record.insert(label, value);
    }
    record.insert(URL_FIELD, source_url);
    record
}

/// Removes repeated links, keeping the first occurrence of each
pub fn dedup_links(links: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|link| seen.insert(link.as_str()))
        .cloned()
        .collect()
}

/// Scrapes every distinct link, at most `gate.capacity()` at a time
///
/// Links that fail to fetch are logged and left out, so the result may be
/// shorter than the input. Records come back in first-seen link order.
pub async fn collect_details<S: PageSource>(
    source: &S,
    gate: &FetchGate,
    selectors: &SelectorConfig,
    links: &[String],
) -> Vec<ApartmentRecord> {
    let links = dedup_links(links);
    tracing::info!(
        "Scraping {} apartment details ({} at a time)",
        links.len(),
        gate.capacity()
    );

    let results = join_all(
        links
            .iter()
            .map(|link| scrape_apartment(source, gate, selectors, link)),
    )
    .await;

    let records: Vec<ApartmentRecord> = results.into_iter().flatten().collect();
    tracing::info!(
        "Successfully scraped {} of {} apartments",
        records.len(),
        links.len()
    );
    records
}

/// Fetches and extracts a single detail page
///
/// The gate is held only while the request is in flight; parsing happens
/// after the permit is released.
async fn scrape_apartment<S: PageSource>(
    source: &S,
    gate: &FetchGate,
    selectors: &SelectorConfig,
    url: &str,
) -> Option<ApartmentRecord> {
    let body = {
        let _permit = gate.acquire().await?;
        source.fetch(url).await
    };

    match body {
        Ok(body) => {
            let doc = HtmlDocument::parse(&body);
            Some(extract_details(&doc, selectors, url))
        }
        Err(e) => {
            tracing::warn!("Failed to fetch apartment page {}: {}", url, e);
            None
        }
    }
}
