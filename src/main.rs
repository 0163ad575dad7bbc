use clap::Parser;
use dialoguer::MultiSelect;
use jewelry_catalog::catalog::{load_catalog, CatalogSource};
use jewelry_catalog::cli::{Cli, Commands, FilterArgs, SourceArgs};
use jewelry_catalog::common::{CatalogSession, DesignRecord, FilterCriteria};
use jewelry_catalog::config::Config;
use jewelry_catalog::error::{CatalogError, Result};
use jewelry_catalog::export::{export_selection, ExportOptions};
use jewelry_catalog::fetcher::HttpImageFetcher;
use jewelry_catalog::logging;
use jewelry_catalog::common::types::NOT_AVAILABLE;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

fn criteria_from(filters: &FilterArgs) -> FilterCriteria {
    FilterCriteria {
        category: filters.category.clone(),
        supplier: filters.supplier.clone(),
        search_text: filters.search.clone(),
    }
}

async fn open_session(config: &Config, source: &SourceArgs) -> Result<CatalogSession> {
    let source = CatalogSource::parse(&config.resolve_source(source.source.as_deref())?);
    println!("- Loading designs from {}...", source);

    let records = load_catalog(&source, Duration::from_secs(config.fetch_timeout_seconds)).await?;
    let mut session = CatalogSession::new();
    let dropped = session.load(records);
    if dropped > 0 {
        warn!(dropped, "duplicate or missing design ids ignored");
    }
    println!("✔ {} designs loaded\n", session.total_len());
    Ok(session)
}

fn describe(record: &DesignRecord) -> String {
    format!(
        "{:<10} {:<14} {:<20} {:<16} {}",
        record.id,
        record.design_number().unwrap_or(NOT_AVAILABLE),
        record.item_category().unwrap_or(NOT_AVAILABLE),
        record.design_code().unwrap_or(NOT_AVAILABLE),
        record.supplier_display(),
    )
}

fn pick_interactively(session: &mut CatalogSession) -> Result<()> {
    let visible = session.visible();
    let items: Vec<String> = visible.iter().map(|r| describe(r)).collect();
    let defaults: Vec<bool> = visible.iter().map(|r| session.is_selected(&r.id)).collect();
    let ids: Vec<String> = visible.iter().map(|r| r.id.clone()).collect();

    let chosen = MultiSelect::new()
        .with_prompt("Mark designs to export (space to toggle, enter to confirm)")
        .items(&items)
        .defaults(&defaults)
        .interact()
        .map_err(|e| CatalogError::Prompt(e.to_string()))?;

    for (i, id) in ids.iter().enumerate() {
        if chosen.contains(&i) != session.is_selected(id) {
            session.toggle(id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::List { source, filters } => {
            let mut session = open_session(&config, &source).await?;
            session.set_criteria(criteria_from(&filters));

            println!(
                "Showing {} of {} designs",
                session.visible_len(),
                session.total_len()
            );
            for record in session.visible() {
                println!("  {}", describe(record));
            }
        }

        Commands::Facets { source } => {
            let session = open_session(&config, &source).await?;

            println!("Categories:");
            for facet in session.categories() {
                println!("  {} ({})", facet.value, facet.count);
            }
            println!("Suppliers:");
            for facet in session.suppliers() {
                println!("  {} ({})", facet.value, facet.count);
            }
        }

        Commands::Export {
            source,
            filters,
            select,
            all,
            interactive,
            format,
            output,
            pdf_quality,
            concurrency,
        } => {
            println!("📄 jewelry-catalog - export\n");

            let mut session = open_session(&config, &source).await?;
            session.set_criteria(criteria_from(&filters));
            println!(
                "Showing {} of {} designs",
                session.visible_len(),
                session.total_len()
            );

            for id in &select {
                if session.toggle_known(id).is_none() {
                    return Err(CatalogError::UnknownDesign(id.clone()));
                }
            }
            if all {
                session.select_all_visible();
            }
            if interactive {
                pick_interactively(&mut session)?;
            }
            println!("✔ {} designs marked\n", session.selection().len());

            let quality = pdf_quality.unwrap_or(config.pdf_quality);
            let fetcher = HttpImageFetcher::new(
                Duration::from_secs(config.fetch_timeout_seconds),
                quality,
            )
            .map_err(|e| CatalogError::Export(e.to_string()))?;

            let options = ExportOptions {
                format,
                output: output
                    .or_else(|| config.output_dir.clone())
                    .unwrap_or_else(|| PathBuf::from(".")),
                concurrency: config.concurrency(concurrency),
                show_progress: true,
                generated_at: None,
            };

            let summary = export_selection(&session, &fetcher, &options).await?;
            match summary.page_count {
                Some(pages) => println!("\n✅ Exported {} designs on {} pages", summary.count, pages),
                None => println!("\n✅ Exported {} designs", summary.count),
            }
        }

        Commands::Config { set_source, set_output, show } => {
            let mut config = config;

            if let Some(source) = set_source {
                config.set_source(source)?;
                println!("✔ Catalog source saved");
            }

            if let Some(dir) = set_output {
                config.set_output_dir(dir)?;
                println!("✔ Output directory saved");
            }

            if show {
                println!("Settings:");
                println!(
                    "  Catalog source: {}",
                    config.catalog_source.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  Output directory: {}",
                    config
                        .output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(current directory)".into())
                );
                println!("  Fetch concurrency: {}", config.fetch_concurrency);
                println!("  Fetch timeout: {}s", config.fetch_timeout_seconds);
                println!("  PDF quality: {}", config.pdf_quality);
            }
        }
    }

    Ok(())
}
