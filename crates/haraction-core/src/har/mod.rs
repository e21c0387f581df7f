mod capture;
mod enrich;
mod entries;
mod pages;
mod reader;
mod timestamp;

pub use capture::CaptureFile;
pub use enrich::enrich_entries;
pub use entries::extract_entries;
pub use pages::{Page, extract_pages};
pub use reader::HarReader;
pub use timestamp::parse_timestamp;
