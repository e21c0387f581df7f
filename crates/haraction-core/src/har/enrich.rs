use super::pages::{Page, find_page};
use crate::record::{FieldValue, Record, fields};

/// Attach page details and the source file name to each entry.
///
/// An entry whose `pageref` resolves to no page gets only the `file` field.
pub fn enrich_entries(pages: &[Page], entries: &mut [Record], file_name: &str) {
    for entry in entries.iter_mut() {
        let page = entry
            .get(fields::PAGE_REF)
            .and_then(FieldValue::as_str)
            .and_then(|page_ref| find_page(pages, page_ref))
            .cloned();

        if let Some(page) = page {
            entry.set(fields::PAGE_STARTED_DATE_TIME, page.started_date_time);
            entry.set(fields::PAGE_START_MS, page.start_ms);
            entry.set(fields::PAGE_TITLE, page.title);
        } else {
            tracing::debug!("No page found for entry in {}", file_name);
        }

        entry.set(fields::FILE, file_name);
    }
}
