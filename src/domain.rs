//! Domain module - listing value objects and output records
//!
//! Everything here is a plain value: created by the parsers or the
//! reconciler and never mutated afterwards.

pub mod format;
pub mod listing;
pub mod record;

pub use format::BookFormat;
pub use listing::{Identifier, ListingDescriptor, Observation, PageSource, Price, PriceMapping};
pub use record::{InputRow, OutputRecord};
