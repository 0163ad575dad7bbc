use crate::cli::PdfQuality;
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the stored catalog source when set.
pub const SOURCE_ENV: &str = "JEWELRY_CATALOG_SOURCE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_source: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub fetch_concurrency: usize,
    pub fetch_timeout_seconds: u64,
    pub pdf_quality: PdfQuality,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_source: None,
            output_dir: None,
            fetch_concurrency: 4,
            fetch_timeout_seconds: 30,
            pdf_quality: PdfQuality::Medium,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CatalogError::Config("Home directory not found".into()))?;
        Ok(home.join(".config").join("jewelry-catalog").join("config.json"))
    }

    /// Catalog source with precedence flag > environment > stored value.
    pub fn resolve_source(&self, flag: Option<&str>) -> Result<String> {
        let env = std::env::var(SOURCE_ENV).ok();
        Self::pick_source(flag, env.as_deref(), self.catalog_source.as_deref())
    }

    fn pick_source(flag: Option<&str>, env: Option<&str>, stored: Option<&str>) -> Result<String> {
        [flag, env, stored]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CatalogError::Config(
                    "No catalog source. Pass --source or run `jewelry-catalog config --set-source <PATH|URL>`"
                        .into(),
                )
            })
    }

    /// Concurrency limit, never below 1.
    pub fn concurrency(&self, flag: Option<usize>) -> usize {
        flag.unwrap_or(self.fetch_concurrency).max(1)
    }

    pub fn set_source(&mut self, source: String) -> Result<()> {
        self.catalog_source = Some(source);
        self.save()
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.output_dir = Some(dir);
        self.save()
    }
}
