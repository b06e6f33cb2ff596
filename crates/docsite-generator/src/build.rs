//! Build-end orchestration.
//!
//! Runs after the site tool has rendered the pages: loads the page list,
//! exports site data and writes the sitemap.

use std::{path::PathBuf, time::Instant};

use docsite_core::Config;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    loader::{ContentLoader, LoaderError, Page},
    site_data::{SiteData, SiteDataError},
    sitemap::{SitemapError, write_sitemap},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Loader error.
    #[error("loader error: {0}")]
    Loader(#[from] LoaderError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Site data export error.
    #[error("site data error: {0}")]
    SiteData(#[from] SiteDataError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages loaded.
    pub pages: usize,

    /// Number of sitemap entries written.
    pub sitemap_urls: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Build-end runner.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    src_dir: PathBuf,
    out_dir: PathBuf,
    site_data: bool,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, src_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            src_dir: src_dir.into(),
            out_dir: out_dir.into(),
            site_data: true,
        }
    }

    /// Toggle the `site.json` export.
    #[must_use]
    pub fn with_site_data(mut self, enabled: bool) -> Self {
        self.site_data = enabled;
        self
    }

    /// Load the page list from the source directory.
    pub fn load_pages(&self) -> Result<Vec<Page>> {
        let pages = ContentLoader::new(&self.src_dir, &self.config.sitemap.patterns)
            .with_clean_urls(self.config.sitemap.clean_urls)
            .load()?;
        Ok(pages)
    }

    /// Run every build-end step.
    ///
    /// Returns once the sitemap is on disk.
    pub async fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            src = %self.src_dir.display(),
            out = %self.out_dir.display(),
            "starting build-end"
        );

        // 1. Ensure output directory
        self.prepare_output().await?;

        // 2. Load pages
        let pages = self.load_pages()?;
        stats.pages = pages.len();

        // 3. Export site data
        if self.site_data {
            SiteData::from_config(&self.config)
                .write(&self.out_dir)
                .await?;
        }

        // 4. Write sitemap
        stats.sitemap_urls = write_sitemap(&self.config, &pages, &self.out_dir).await?;

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            sitemap_urls = stats.sitemap_urls,
            duration_ms = stats.duration_ms,
            "build-end complete"
        );

        Ok(stats)
    }

    /// Write only the sitemap.
    pub async fn sitemap(&self) -> Result<usize> {
        self.prepare_output().await?;
        let pages = self.load_pages()?;
        Ok(write_sitemap(&self.config, &pages, &self.out_dir).await?)
    }

    async fn prepare_output(&self) -> Result<()> {
        if !self.out_dir.exists() {
            debug!(dir = %self.out_dir.display(), "creating output directory");
        }
        tokio::fs::create_dir_all(&self.out_dir).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn test_config() -> Config {
        Config::from_toml_str(
            r#"
[site]
title = "Test Site"
hostname = "https://cwebframework.tech/"

[locales.root]
label = "Русский"
lang = "ru"

[locales.en]
label = "English"
lang = "en"
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_empty_site() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let stats = Builder::new(test_config(), src.path(), out.path())
            .build()
            .await
            .unwrap();

        assert_eq!(stats.pages, 0);
        assert_eq!(stats.sitemap_urls, 0);
        assert!(out.path().join("sitemap.xml").exists());
        assert!(out.path().join("site.json").exists());
    }

    #[tokio::test]
    async fn test_build_with_content() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(src.path().join("index.md"), "# Главная").unwrap();
        fs::write(src.path().join("install.md"), "# Установка").unwrap();
        fs::create_dir(src.path().join("en")).unwrap();
        fs::write(src.path().join("en/install.md"), "# Install").unwrap();

        let stats = Builder::new(test_config(), src.path(), out.path())
            .build()
            .await
            .unwrap();

        assert_eq!(stats.pages, 3);
        assert_eq!(stats.sitemap_urls, 3);

        let xml = fs::read_to_string(out.path().join("sitemap.xml")).unwrap();
        assert!(xml.contains("<loc>https://cwebframework.tech/</loc>"));
        assert!(xml.contains("<loc>https://cwebframework.tech/install.html</loc>"));
        assert!(xml.contains("<loc>https://cwebframework.tech/en/install.html</loc>"));
    }

    #[tokio::test]
    async fn test_build_creates_output_dir() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let nested = out.path().join(".vitepress/dist");

        let stats = Builder::new(test_config(), src.path(), &nested)
            .with_site_data(false)
            .build()
            .await
            .unwrap();

        assert_eq!(stats.pages, 0);
        assert!(nested.join("sitemap.xml").exists());
        assert!(!nested.join("site.json").exists());
    }

    #[tokio::test]
    async fn test_sitemap_only_creates_output_dir() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let nested = out.path().join("dist");

        let count = Builder::new(test_config(), src.path(), &nested)
            .sitemap()
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(nested.join("sitemap.xml").exists());
        assert!(!nested.join("site.json").exists());
    }

    #[tokio::test]
    async fn test_build_missing_source_fails() {
        let out = TempDir::new().unwrap();
        let result = Builder::new(test_config(), "/nonexistent/docs", out.path())
            .build()
            .await;
        assert!(matches!(result, Err(BuildError::Loader(_))));
    }

    #[test]
    fn test_build_stats() {
        let stats = BuildStats::default();
        assert_eq!(stats.pages, 0);
        assert_eq!(stats.duration_ms, 0);
    }
}
