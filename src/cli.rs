use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jewelry-catalog")]
#[command(about = "Browse a jewelry design catalog and export marked designs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where to load the catalog from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// JSON file, .xlsx workbook or http(s) URL (overrides config and env)
    #[arg(long)]
    pub source: Option<String>,
}

/// Filter criteria; an omitted flag places no constraint
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Exact category
    #[arg(long)]
    pub category: Option<String>,

    /// Exact supplier name
    #[arg(long)]
    pub supplier: Option<String>,

    /// Case-insensitive text over design number, parent design and design code
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the designs visible under the given filters
    List {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show categories and suppliers with design counts
    Facets {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Mark designs and export them as PDF and/or Excel
    Export {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Toggle a design id (repeatable, applied in order)
        #[arg(long = "select", value_name = "ID")]
        select: Vec<String>,

        /// Select-all / deselect-all over the visible designs
        #[arg(long)]
        all: bool,

        /// Pick designs from a multi-select prompt
        #[arg(short, long)]
        interactive: bool,

        /// Output format (pdf/excel/both)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// PDF image quality (high/medium/low), defaults to config
        #[arg(long)]
        pdf_quality: Option<PdfQuality>,

        /// Parallel image fetches, defaults to config
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Show or edit settings
    Config {
        /// Store the default catalog source
        #[arg(long)]
        set_source: Option<String>,

        /// Store the default output directory
        #[arg(long)]
        set_output: Option<PathBuf>,

        /// Print settings
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, excel, or both", s)),
        }
    }
}

impl ExportFormat {
    pub fn includes_pdf(&self) -> bool {
        matches!(self, ExportFormat::Pdf | ExportFormat::Both)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::Both)
    }
}

/// PDF image quality
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfQuality {
    /// 1400px, 85%
    High,
    /// 800px, 75% (default)
    #[default]
    Medium,
    /// 500px, 60%
    Low,
}

impl PdfQuality {
    /// Maximum pixel width
    pub fn max_width(&self) -> u32 {
        match self {
            PdfQuality::High => 1400,
            PdfQuality::Medium => 800,
            PdfQuality::Low => 500,
        }
    }

    /// JPEG quality (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PdfQuality::High => 85,
            PdfQuality::Medium => 75,
            PdfQuality::Low => 60,
        }
    }
}

impl std::str::FromStr for PdfQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(PdfQuality::High),
            "medium" | "med" | "m" => Ok(PdfQuality::Medium),
            "low" | "l" => Ok(PdfQuality::Low),
            _ => Err(format!("Unknown quality: {}. Use high, medium, or low", s)),
        }
    }
}

impl std::fmt::Display for PdfQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfQuality::High => write!(f, "high"),
            PdfQuality::Medium => write!(f, "medium"),
            PdfQuality::Low => write!(f, "low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::parse_from([
            "jewelry-catalog",
            "export",
            "--source",
            "designs.json",
            "--category",
            "Necklace",
            "--select",
            "a",
            "--select",
            "b",
            "--format",
            "both",
            "--pdf-quality",
            "low",
        ]);

        match cli.command {
            Commands::Export { source, filters, select, format, pdf_quality, all, .. } => {
                assert_eq!(source.source.as_deref(), Some("designs.json"));
                assert_eq!(filters.category.as_deref(), Some("Necklace"));
                assert_eq!(select, vec!["a", "b"]);
                assert_eq!(format, ExportFormat::Both);
                assert_eq!(pdf_quality, Some(PdfQuality::Low));
                assert!(!all);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("docx".parse::<ExportFormat>().is_err());
        assert!(ExportFormat::Both.includes_pdf() && ExportFormat::Both.includes_excel());
        assert!(!ExportFormat::Pdf.includes_excel());
    }

    #[test]
    fn test_quality_settings() {
        assert_eq!("h".parse::<PdfQuality>().unwrap(), PdfQuality::High);
        assert_eq!(PdfQuality::High.max_width(), 1400);
        assert_eq!(PdfQuality::Low.jpeg_quality(), 60);
        assert_eq!(PdfQuality::default().to_string(), "medium");
    }

    #[test]
    fn test_quality_serde() {
        let json = serde_json::to_string(&PdfQuality::Low).unwrap();
        assert_eq!(json, "\"low\"");
        let parsed: PdfQuality = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, PdfQuality::High);
    }
}
