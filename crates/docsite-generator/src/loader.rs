//! Content loading.
//!
//! Enumerates markdown sources under the locale roots and maps each one to
//! its public URL.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use glob::{MatchOptions, Pattern};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Content loading errors.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error, including broken symlinks.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Source directory does not exist.
    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),

    /// Invalid glob pattern.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// A page discovered in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Public URL, e.g. `/en/introduction.html`.
    pub url: String,

    /// Path of the markdown source.
    pub source_path: PathBuf,

    /// Last modification time of the source.
    pub modified: Option<DateTime<Utc>>,
}

/// Loads pages matching a set of glob patterns.
#[derive(Debug)]
pub struct ContentLoader {
    src_dir: PathBuf,
    patterns: Vec<String>,
    clean_urls: bool,
}

impl ContentLoader {
    /// Create a new loader.
    #[must_use]
    pub fn new(src_dir: impl Into<PathBuf>, patterns: &[String]) -> Self {
        Self {
            src_dir: src_dir.into(),
            patterns: patterns.to_vec(),
            clean_urls: false,
        }
    }

    /// Emit URLs without the `.html` extension.
    #[must_use]
    pub fn with_clean_urls(mut self, clean_urls: bool) -> Self {
        self.clean_urls = clean_urls;
        self
    }

    /// Load all matching pages, sorted by URL.
    pub fn load(&self) -> Result<Vec<Page>> {
        if !self.src_dir.is_dir() {
            return Err(LoaderError::MissingSource(self.src_dir.clone()));
        }

        info!(dir = %self.src_dir.display(), patterns = ?self.patterns, "loading content");

        let patterns = self.compile_patterns()?;
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };

        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.src_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored(e.file_name().to_string_lossy().as_ref()))
        {
            let entry = entry?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            let relative = relative_path(path, &self.src_dir);
            if !patterns.iter().any(|p| p.matches_with(&relative, options)) {
                continue;
            }

            let url = page_url(&relative, self.clean_urls);
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from);

            debug!(path = %relative, url = %url, "found page");
            pages.push(Page {
                url,
                source_path: path.to_path_buf(),
                modified,
            });
        }

        pages.sort_by(|a, b| a.url.cmp(&b.url));
        pages.dedup_by(|a, b| a.url == b.url);

        info!(count = pages.len(), "loaded pages");
        Ok(pages)
    }

    fn compile_patterns(&self) -> Result<Vec<Pattern>> {
        self.patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| LoaderError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Directories never searched for pages.
fn is_ignored(name: &str) -> bool {
    name.starts_with('.') || name == "node_modules"
}

/// Path relative to `base`, with `/` separators.
fn relative_path(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public URL for a markdown source path relative to the source root.
///
/// `index.md` maps to its directory, other pages get an `.html` suffix unless
/// `clean_urls` is set.
pub fn page_url(relative: &str, clean_urls: bool) -> String {
    let stem = relative.strip_suffix(".md").unwrap_or(relative);

    if stem == "index" {
        return "/".to_string();
    }
    if let Some(dir) = stem.strip_suffix("/index") {
        return format!("/{dir}/");
    }

    if clean_urls {
        format!("/{stem}")
    } else {
        format!("/{stem}.html")
    }
}
