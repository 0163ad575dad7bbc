pub mod pdf;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::{CatalogError, Result};
use crate::fetcher::ImageFetcher;
use chrono::{DateTime, Local};
use jewelry_catalog_common::export::pdf_core::export_file_name;
use jewelry_catalog_common::{CatalogSession, DesignRecord};
use self::pdf::{CardReport, DocumentAssembler};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// File or directory; a path without extension is a directory
    pub output: PathBuf,
    pub concurrency: usize,
    pub show_progress: bool,
    /// Fixed generation time, mainly for reproducible output
    pub generated_at: Option<DateTime<Local>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Pdf,
            output: PathBuf::from("."),
            concurrency: pdf::DEFAULT_CONCURRENCY,
            show_progress: false,
            generated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub count: usize,
    pub page_count: Option<usize>,
    pub pdf_path: Option<PathBuf>,
    pub excel_path: Option<PathBuf>,
    pub cards: Vec<CardReport>,
}

fn treat_as_dir(output: &Path) -> bool {
    output.is_dir() || output.extension().is_none()
}

fn output_path_for_format(output: &Path, file_name: &str) -> PathBuf {
    if treat_as_dir(output) {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, pdf_name: &str, excel_name: &str) -> (PathBuf, PathBuf) {
    if treat_as_dir(output) {
        (output.join(pdf_name), output.join(excel_name))
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("jewelry-designs");
        (parent.join(format!("{}.pdf", stem)), parent.join(format!("{}.xlsx", stem)))
    }
}

/// A payload written next to its target, waiting to be renamed into place.
struct StagedFile {
    part: PathBuf,
    path: PathBuf,
}

fn export_error(path: &Path, e: std::io::Error) -> CatalogError {
    CatalogError::Export(format!("{}: {}", path.display(), e))
}

fn stage_file(path: &Path, bytes: &[u8]) -> Result<StagedFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| export_error(path, e))?;
    }

    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    if let Err(e) = std::fs::write(&part, bytes) {
        let _ = std::fs::remove_file(&part);
        return Err(export_error(path, e));
    }
    Ok(StagedFile {
        part,
        path: path.to_path_buf(),
    })
}

fn discard(staged: &[StagedFile]) {
    for file in staged {
        let _ = std::fs::remove_file(&file.part);
    }
}

/// Stages every payload, then renames them all into place. If any step fails,
/// staged files are removed and targets already renamed are deleted again.
fn write_all(files: &[(&Path, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        match stage_file(path, bytes) {
            Ok(file) => staged.push(file),
            Err(e) => {
                discard(&staged);
                return Err(e);
            }
        }
    }

    for (i, file) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(&file.part, &file.path) {
            discard(&staged[i..]);
            for done in &staged[..i] {
                let _ = std::fs::remove_file(&done.path);
            }
            return Err(export_error(&file.path, e));
        }
    }
    Ok(())
}

/// Writes via a sibling `.part` file and a rename, so a failed write never
/// leaves a truncated document at `path`.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    write_all(&[(path, bytes)])
}

fn output_paths(
    format: ExportFormat,
    output: &Path,
    pdf_name: &str,
    excel_name: &str,
) -> (Option<PathBuf>, Option<PathBuf>) {
    if format.includes_pdf() && format.includes_excel() {
        let (pdf, excel) = output_paths_for_both(output, pdf_name, excel_name);
        return (Some(pdf), Some(excel));
    }
    let pdf = format
        .includes_pdf()
        .then(|| output_path_for_format(output, pdf_name));
    let excel = format
        .includes_excel()
        .then(|| output_path_for_format(output, excel_name));
    (pdf, excel)
}

/// Exports `records` in the given order. Every payload is built before any
/// file is written.
pub async fn export_records<F: ImageFetcher>(
    records: &[&DesignRecord],
    fetcher: &F,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    if records.is_empty() {
        return Err(CatalogError::EmptySelection);
    }

    let generated_at = options.generated_at.unwrap_or_else(Local::now);
    let date = generated_at.date_naive();
    let pdf_name = export_file_name(date, "pdf");
    let excel_name = export_file_name(date, "xlsx");

    let (pdf_path, excel_path) =
        output_paths(options.format, &options.output, &pdf_name, &excel_name);

    let mut summary = ExportSummary {
        count: records.len(),
        ..Default::default()
    };

    let pdf_payload = match &pdf_path {
        Some(_) => {
            println!("- Generating PDF ({} designs)...", records.len());
            let result = DocumentAssembler::new(fetcher)
                .with_concurrency(options.concurrency)
                .with_progress(options.show_progress)
                .build_at(records, generated_at)
                .await?;
            summary.page_count = Some(result.page_count);
            summary.cards = result.cards;
            Some(result.payload)
        }
        None => None,
    };

    let excel_payload = match &excel_path {
        Some(_) => {
            println!("- Generating Excel...");
            Some(excel::generate_excel(records)?)
        }
        None => None,
    };

    let mut files: Vec<(&Path, &[u8])> = Vec::new();
    if let (Some(path), Some(bytes)) = (&pdf_path, &pdf_payload) {
        files.push((path.as_path(), bytes.as_slice()));
    }
    if let (Some(path), Some(bytes)) = (&excel_path, &excel_payload) {
        files.push((path.as_path(), bytes.as_slice()));
    }
    write_all(&files)?;

    if let (Some(path), Some(bytes)) = (&pdf_path, &pdf_payload) {
        info!(path = %path.display(), bytes = bytes.len(), "pdf written");
        println!("✔ PDF: {}", path.display());
    }
    if let (Some(path), Some(bytes)) = (&excel_path, &excel_payload) {
        info!(path = %path.display(), bytes = bytes.len(), "excel written");
        println!("✔ Excel: {}", path.display());
    }

    summary.pdf_path = pdf_path;
    summary.excel_path = excel_path;
    Ok(summary)
}

/// Exports the session's marked records, in store order.
pub async fn export_selection<F: ImageFetcher>(
    session: &CatalogSession,
    fetcher: &F,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let marked = session.marked_records();
    export_records(&marked, fetcher, options).await
}
