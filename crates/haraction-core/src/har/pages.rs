use super::reader::log_array;
use super::timestamp::parse_timestamp;
use crate::Result;
use crate::record::FieldValue;
use serde_json::Value;

/// A page (top-level navigation) from `log.pages`
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Only textual ids can be referenced by an entry's `pageref`
    pub id: Option<String>,
    pub title: FieldValue,
    pub started_date_time: FieldValue,
    pub start_ms: i64,
}

/// Extract the pages of a HAR document in source order
pub fn extract_pages(har: &Value) -> Result<Vec<Page>> {
    log_array(har, "pages")?.iter().map(extract_page).collect()
}

fn extract_page(raw: &Value) -> Result<Page> {
    let started_date_time = FieldValue::from(raw.get("startedDateTime"));
    let start_ms = parse_timestamp(&started_date_time.to_string())?;

    Ok(Page {
        id: raw.get("id").and_then(Value::as_str).map(str::to_string),
        title: FieldValue::from(raw.get("title")),
        started_date_time,
        start_ms,
    })
}

/// First page whose id equals `page_ref`
pub(crate) fn find_page<'a>(pages: &'a [Page], page_ref: &str) -> Option<&'a Page> {
    pages.iter().find(|page| page.id.as_deref() == Some(page_ref))
}
