pub mod actions;
pub mod batch;
pub mod error;
pub mod export;
pub mod har;
pub mod record;
pub mod timeline;

pub use batch::{Batch, discover_captures};
pub use error::{Error, Result};
pub use record::{FieldValue, Record};
