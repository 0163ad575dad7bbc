use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load design masters: {0}")]
    DataLoad(String),

    #[error("No designs selected. Mark at least one design before exporting")]
    EmptySelection,

    #[error("Export failed: {0}. Please try again")]
    Export(String),

    #[error("Excel generation error: {0}")]
    ExcelGeneration(String),

    #[error("Unknown design id: {0}")]
    UnknownDesign(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] jewelry_catalog_common::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
