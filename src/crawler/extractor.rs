//! Record extraction and next-page resolution
//!
//! Both operations are pure: the same page content and schema always
//! produce the same output.

use crate::config::{FieldSchema, FieldSelector};
use scraper::{ElementRef, Html, Selector};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One structured result pulled out of a record block
///
/// Scalar fields hold the trimmed text of their first match, or `None`.
/// List fields hold the trimmed text of every match, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
    lists: Vec<(String, Vec<String>)>,
}

impl Record {
    /// Value of a scalar field, `None` if it was not matched or not defined
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Values of a list field, empty if none matched or not defined
    pub fn list(&self, name: &str) -> &[String] {
        self.lists
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Scalar fields in schema order
    pub fn fields(&self) -> &[(String, Option<String>)] {
        &self.fields
    }

    /// List fields in schema order
    pub fn lists(&self) -> &[(String, Vec<String>)] {
        &self.lists
    }
}

// Serialized as a flat object: scalars first, then lists.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + self.lists.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        for (name, values) in &self.lists {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// Extracts every record on a page
///
/// # Arguments
///
/// * `content` - Raw HTML of the page
/// * `schema` - The compiled field schema of the site
///
/// # Returns
///
/// One record per element matching `schema.record_block`, in document
/// order. A page without matches yields an empty vector.
///
/// Field text is the element's visible text with leading and trailing
/// whitespace removed and interior whitespace runs (indentation, line
/// breaks) collapsed to a single space.
///
/// # Example
///
/// ```
/// use harvest::config::parse_config;
/// use harvest::crawler::extract_records;
///
/// let config = parse_config(r#"
/// output_file = "out.json"
/// [[sites]]
/// url = "https://example.com/"
/// [sites.parsing_rules]
/// quote_block = ".q"
/// quote = ".text"
/// "#).unwrap();
/// let site = &config.site_specs().unwrap()[0];
///
/// let html = r#"<div class="q"><span class="text"> Hi </span></div>"#;
/// let records = extract_records(html, &site.schema);
/// assert_eq!(records[0].field("quote"), Some("Hi"));
/// ```
pub fn extract_records(content: &str, schema: &FieldSchema) -> Vec<Record> {
    let document = Html::parse_document(content);
    records_from_document(&document, schema)
}

/// Resolves the URL of the page following this one
///
/// Returns `base_url` followed by the raw `href` of the first element
/// matching `next_page`. No selector, no match, or no `href` all mean the
/// crawl stops here.
pub fn resolve_next_page(
    content: &str,
    next_page: Option<&Selector>,
    base_url: &str,
) -> Option<String> {
    let next_page = next_page?;
    let document = Html::parse_document(content);
    next_page_from_document(&document, next_page, base_url)
}

/// Same as [`extract_records`] over an already parsed document
pub fn records_from_document(document: &Html, schema: &FieldSchema) -> Vec<Record> {
    document
        .select(&schema.record_block)
        .map(|block| build_record(block, schema))
        .collect()
}

/// Same as [`resolve_next_page`] over an already parsed document
pub fn next_page_from_document(
    document: &Html,
    next_page: &Selector,
    base_url: &str,
) -> Option<String> {
    let href = document.select(next_page).next()?.value().attr("href")?;
    Some(format!("{}{}", base_url, href))
}

fn build_record(block: ElementRef<'_>, schema: &FieldSchema) -> Record {
    let fields = schema
        .scalars
        .iter()
        .map(|field| (field.name.clone(), first_text(block, field)))
        .collect();

    let lists = schema
        .lists
        .iter()
        .map(|field| (field.name.clone(), all_texts(block, field)))
        .collect();

    Record { fields, lists }
}

fn first_text(block: ElementRef<'_>, field: &FieldSelector) -> Option<String> {
    let selector = field.selector.as_ref()?;
    block.select(selector).next().map(element_text)
}

fn all_texts(block: ElementRef<'_>, field: &FieldSelector) -> Vec<String> {
    match &field.selector {
        Some(selector) => block.select(selector).map(element_text).collect(),
        None => Vec::new(),
    }
}

// Text nodes are joined, then every whitespace run collapses to one space.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
