//! Jewelry design catalog
//!
//! Loads design records, filters and marks them, and exports the marked
//! designs as an A4 PDF catalog (and optionally a spreadsheet).

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod logging;

pub use jewelry_catalog_common as common;
