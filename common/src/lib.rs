//! Jewelry Catalog Common Library
//!
//! Pure domain code shared by the CLI: records, filtering, selection,
//! page geometry and the text that goes on every exported card.

pub mod types;
pub mod store;
pub mod filter;
pub mod selection;
pub mod session;
pub mod layout;
pub mod error;
pub mod export;

pub use types::{CatalogPayload, DesignRecord};
pub use store::RecordStore;
pub use filter::{Facet, FilterCriteria};
pub use selection::SelectionSet;
pub use session::CatalogSession;
pub use layout::{CardPlacement, CardRegions, PageGeometry, Rect};
pub use error::{Error, Result};
