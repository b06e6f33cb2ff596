//! Sitemap generation.
//!
//! Rewrites page URLs and streams them into an XML sitemap. The file is
//! flushed, closed and synced before [`write_sitemap`] returns.

use std::{collections::BTreeMap, path::Path};

use chrono::{DateTime, Utc};
use docsite_core::{Config, normalize_link};
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncWrite, AsyncWriteExt, BufWriter},
};
use tracing::{debug, info};
use url::Url;

use crate::loader::Page;

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A page URL could not be joined to the hostname.
    #[error("invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] docsite_core::CoreError),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Remove the default document name and the documentation prefix from a URL.
///
/// The prefix only matches whole path segments, so `/docs` strips
/// `/docs/en/` but leaves `/docs-old/` alone. This is stricter than a plain
/// textual prefix match such as `^/docs`, which would turn `/docs-old/x`
/// into `-old/x`. An empty result becomes `/`.
///
/// ```
/// use docsite_generator::sitemap::rewrite_url;
///
/// assert_eq!(
///     rewrite_url("/docs/en/guide/index.html", "index.html", "/docs"),
///     "/en/guide/"
/// );
/// assert_eq!(rewrite_url("/docs-old/x", "index.html", "/docs"), "/docs-old/x");
/// ```
pub fn rewrite_url(url: &str, default_document: &str, strip_prefix: &str) -> String {
    let mut url = url;

    if !default_document.is_empty() {
        url = url.strip_suffix(default_document).unwrap_or(url);
    }

    let prefix = strip_prefix.trim_end_matches('/');
    if !prefix.is_empty()
        && let Some(rest) = url.strip_prefix(prefix)
        && (rest.is_empty() || rest.starts_with('/'))
    {
        url = rest;
    }

    if url.is_empty() {
        "/".to_string()
    } else {
        url.to_string()
    }
}

/// Alternate language link for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    /// Language tag (e.g., "ru", "en").
    pub hreflang: String,

    /// Absolute URL of this language version.
    pub href: String,
}

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// Absolute URL.
    pub loc: String,

    /// Last modification date.
    pub lastmod: Option<DateTime<Utc>>,

    /// Alternate language versions.
    pub alternates: Vec<AlternateLink>,
}

impl SitemapUrl {
    fn to_xml(&self) -> String {
        let mut xml = String::from("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&self.loc)));

        if let Some(lastmod) = &self.lastmod {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                lastmod.format("%Y-%m-%d")
            ));
        }

        for alt in &self.alternates {
            xml.push_str(&format!(
                r#"    <xhtml:link rel="alternate" hreflang="{}" href="{}" />"#,
                escape_xml(&alt.hreflang),
                escape_xml(&alt.href)
            ));
            xml.push('\n');
        }

        xml.push_str("  </url>\n");
        xml
    }
}

/// Streaming sitemap writer.
///
/// The header goes out with the first entry and [`SitemapStream::end`]
/// closes the document, flushes and shuts the writer down.
#[derive(Debug)]
pub struct SitemapStream<W> {
    writer: W,
    xhtml: bool,
    started: bool,
    count: usize,
}

impl<W: AsyncWrite + Unpin> SitemapStream<W> {
    /// Create a stream over a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            xhtml: false,
            started: false,
            count: 0,
        }
    }

    /// Declare the xhtml namespace, needed for alternate links.
    #[must_use]
    pub fn with_xhtml(mut self, xhtml: bool) -> Self {
        self.xhtml = xhtml;
        self
    }

    /// Number of entries written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Write one entry.
    pub async fn write(&mut self, url: &SitemapUrl) -> Result<()> {
        self.start().await?;
        self.writer.write_all(url.to_xml().as_bytes()).await?;
        self.count += 1;
        Ok(())
    }

    /// Close the document, flush and shut the writer down.
    ///
    /// Returns the writer once every byte has been handed to it.
    pub async fn end(mut self) -> Result<W> {
        self.start().await?;
        self.writer.write_all(b"</urlset>\n").await?;
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(self.writer)
    }

    async fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }

        let mut header = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        header.push('\n');
        header.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9""#);
        if self.xhtml {
            header.push_str(r#" xmlns:xhtml="http://www.w3.org/1999/xhtml""#);
        }
        header.push_str(">\n");

        self.writer.write_all(header.as_bytes()).await?;
        self.started = true;
        Ok(())
    }
}

/// Builds sitemap entries from pages.
#[derive(Debug)]
pub struct SitemapGenerator {
    config: Config,
    hostname: Url,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    pub fn new(config: Config) -> Result<Self> {
        let hostname = config.hostname()?;
        Ok(Self { config, hostname })
    }

    /// Rewritten, site-relative URL for a page.
    pub fn page_path(&self, page: &Page) -> String {
        rewrite_url(
            &page.url,
            &self.config.sitemap.default_document,
            &self.config.sitemap.strip_prefix,
        )
    }

    /// Build entries for pages, keeping their order.
    pub fn urls(&self, pages: &[Page]) -> Result<Vec<SitemapUrl>> {
        let paths: Vec<String> = pages.iter().map(|p| self.page_path(p)).collect();
        let translations = if self.config.sitemap.alternates {
            self.translation_groups(&paths)
        } else {
            BTreeMap::new()
        };

        let mut urls = Vec::with_capacity(pages.len());
        for (page, path) in pages.iter().zip(&paths) {
            let loc = self.absolute(path)?;

            let lastmod = if self.config.sitemap.lastmod {
                page.modified
            } else {
                None
            };

            let alternates = match translations.get(&self.canonical_key(path)) {
                Some(group) if group.len() > 1 => group
                    .iter()
                    .map(|(lang, path)| -> Result<AlternateLink> {
                        Ok(AlternateLink {
                            hreflang: lang.clone(),
                            href: self.absolute(path)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                _ => Vec::new(),
            };

            urls.push(SitemapUrl {
                loc,
                lastmod,
                alternates,
            });
        }

        Ok(urls)
    }

    /// Absolute URL for a site-relative path.
    fn absolute(&self, path: &str) -> Result<String> {
        self.hostname
            .join(path)
            .map(String::from)
            .map_err(|source| SitemapError::Url {
                url: path.to_string(),
                source,
            })
    }

    /// Locale-neutral key of a path: its locale prefix removed.
    fn canonical_key(&self, path: &str) -> String {
        let normalized = normalize_link(path);
        match self.config.locale_for_url(&normalized) {
            Some(code) => {
                let prefix = Config::locale_prefix(code);
                let rest = normalized
                    .strip_prefix(prefix.trim_end_matches('/'))
                    .unwrap_or(normalized.as_str());
                if rest.is_empty() {
                    "/".to_string()
                } else {
                    rest.to_string()
                }
            }
            None => normalized,
        }
    }

    /// Group paths by canonical key, mapping language tag to path.
    fn translation_groups(&self, paths: &[String]) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut groups: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

        for path in paths {
            let Some(code) = self.config.locale_for_url(&normalize_link(path)) else {
                continue;
            };
            let Some(locale) = self.config.locales.get(code) else {
                continue;
            };
            groups
                .entry(self.canonical_key(path))
                .or_default()
                .insert(locale.lang.clone(), path.clone());
        }

        groups
    }
}

/// Stream a sitemap for `pages` into the output directory.
///
/// Returns the number of entries written, only after the file is flushed,
/// closed and synced to disk.
pub async fn write_sitemap(config: &Config, pages: &[Page], out_dir: &Path) -> Result<usize> {
    let generator = SitemapGenerator::new(config.clone())?;
    let urls = generator.urls(pages)?;
    let path = out_dir.join(&config.sitemap.filename);

    debug!(count = urls.len(), path = %path.display(), "writing sitemap");

    let file = File::create(&path).await?;
    let mut stream = SitemapStream::new(BufWriter::new(file)).with_xhtml(config.sitemap.alternates);

    for url in &urls {
        stream.write(url).await?;
    }
    let count = stream.count();

    let file = stream.end().await?.into_inner();
    file.sync_all().await?;

    info!(path = %path.display(), count, "generated sitemap");
    Ok(count)
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
