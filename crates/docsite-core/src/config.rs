//! Site configuration management.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    error::{CoreError, Result},
    head::{AnalyticsConfig, HeadTag},
    nav::{NavItem, SidebarItem, validate_nav, validate_sidebar},
};

/// Locale key served at the site root.
pub const ROOT_LOCALE: &str = "root";

/// Main configuration structure for docsite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Extra tags injected into every page head.
    #[serde(default)]
    pub head: Vec<HeadTag>,

    /// Analytics snippets.
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Sitemap settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Locales keyed by code. `root` is served at `/`.
    #[serde(default)]
    pub locales: BTreeMap<String, LocaleConfig>,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Absolute base URL used for sitemap entries (e.g., "https://example.com/").
    pub hostname: String,

    /// Directory holding the markdown sources.
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Build output directory.
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

/// Sitemap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Glob patterns, relative to the source directory, selecting pages.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    /// Path prefix removed from every URL.
    #[serde(default = "default_strip_prefix")]
    pub strip_prefix: String,

    /// Default document name removed from the end of every URL.
    #[serde(default = "default_document")]
    pub default_document: String,

    /// Emit extensionless page URLs.
    #[serde(default)]
    pub clean_urls: bool,

    /// Emit `<lastmod>` from source modification times.
    #[serde(default)]
    pub lastmod: bool,

    /// Emit hreflang alternates between locales.
    #[serde(default)]
    pub alternates: bool,

    /// Output file name inside the output directory.
    #[serde(default = "default_sitemap_filename")]
    pub filename: String,
}

/// Per-locale configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Name shown in the language switcher.
    pub label: String,

    /// BCP 47 language tag.
    pub lang: String,

    /// Page title template, `:title` is replaced by the page title.
    #[serde(default)]
    pub title_template: Option<String>,

    /// Locale-specific description.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Theme settings for a locale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub logo: Option<String>,

    #[serde(default)]
    pub site_title: Option<String>,

    /// Heading above the in-page outline.
    #[serde(default)]
    pub outline_title: Option<String>,

    #[serde(default)]
    pub dark_mode_switch_label: Option<String>,

    #[serde(default)]
    pub nav: Vec<NavItem>,

    #[serde(default)]
    pub sidebar: Vec<SidebarItem>,

    #[serde(default)]
    pub social_links: Vec<SocialLink>,

    #[serde(default)]
    pub footer: Option<Footer>,

    #[serde(default)]
    pub doc_footer: Option<DocFooter>,
}

/// A social link in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub icon: SocialIcon,
    pub link: String,
}

/// Either a named icon or inline SVG markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SocialIcon {
    Named(String),
    Svg { svg: String },
}

/// Page footer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footer {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub copyright: Option<String>,
}

/// Labels for previous/next page links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocFooter {
    pub prev: String,
    pub next: String,
}

// Default value functions
fn default_src_dir() -> String {
    "docs".to_string()
}

fn default_out_dir() -> String {
    "docs/.vitepress/dist".to_string()
}

fn default_patterns() -> Vec<String> {
    vec!["*.md".to_string(), "en/*.md".to_string()]
}

fn default_strip_prefix() -> String {
    "/docs".to_string()
}

fn default_document() -> String {
    "index.html".to_string()
}

fn default_sitemap_filename() -> String {
    "sitemap.xml".to_string()
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            strip_prefix: default_strip_prefix(),
            default_document: default_document(),
            clean_urls: false,
            lastmod: false,
            alternates: false,
            filename: default_sitemap_filename(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `DOCSITE__` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::NotFound(path.to_path_buf()));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("DOCSITE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.trim().is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        let hostname = self.hostname()?;
        if !matches!(hostname.scheme(), "http" | "https") {
            return Err(CoreError::config(
                "site.hostname must be an http:// or https:// URL",
            ));
        }

        if self.locales.is_empty() {
            return Err(CoreError::config("at least one locale must be configured"));
        }

        if self.sitemap.patterns.is_empty() {
            return Err(CoreError::config("sitemap.patterns cannot be empty"));
        }

        if self.sitemap.filename.trim().is_empty() || self.sitemap.filename.contains('/') {
            return Err(CoreError::config(
                "sitemap.filename must be a plain file name",
            ));
        }

        for (code, locale) in &self.locales {
            if locale.label.trim().is_empty() {
                return Err(CoreError::config(format!(
                    "locales.{code}.label cannot be empty"
                )));
            }
            if locale.lang.trim().is_empty() {
                return Err(CoreError::config(format!(
                    "locales.{code}.lang cannot be empty"
                )));
            }
            validate_nav(code, &locale.theme.nav)?;
            validate_sidebar(code, &locale.theme.sidebar)?;
        }

        if !self.site.hostname.ends_with('/') {
            tracing::warn!("site.hostname has no trailing slash, paths are joined from its root");
        }

        Ok(())
    }

    /// Parsed site hostname.
    pub fn hostname(&self) -> Result<Url> {
        Url::parse(&self.site.hostname).map_err(|e| {
            CoreError::config_with_source(
                format!("site.hostname is not a valid URL: {}", self.site.hostname),
                e,
            )
        })
    }

    /// URL prefix under which a locale is served.
    pub fn locale_prefix(code: &str) -> String {
        if code == ROOT_LOCALE {
            "/".to_string()
        } else {
            format!("/{code}/")
        }
    }

    /// Locale code for a site-relative URL, by longest matching prefix.
    pub fn locale_for_url(&self, url: &str) -> Option<&str> {
        self.locales
            .keys()
            .filter(|code| {
                let prefix = Self::locale_prefix(code);
                url.starts_with(&prefix) || format!("{url}/") == prefix
            })
            .max_by_key(|code| Self::locale_prefix(code).len())
            .map(String::as_str)
    }

    /// Analytics tags followed by the configured head tags.
    pub fn resolved_head(&self) -> Vec<HeadTag> {
        let mut tags = self.analytics.head_tags();
        tags.extend(self.head.iter().cloned());
        tags
    }
}
