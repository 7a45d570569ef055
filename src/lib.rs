//! Listing Scout - marketplace price reconciliation for book listings
//!
//! Reads a table of items, visits each item's search page and product page,
//! extracts the per-format prices from both and writes them side by side.

pub mod application;
pub mod domain;
pub mod infrastructure;
