//! Export core modules shared by every export backend.

pub mod pdf_core;

#[cfg(feature = "excel")]
pub mod excel_core;
