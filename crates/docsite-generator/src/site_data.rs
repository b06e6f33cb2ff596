//! Resolved site data for the page renderer.
//!
//! Flattens the configuration into the shape the theme consumes: head tags
//! rendered to HTML, locales with their navigation trees.

use std::{collections::BTreeMap, path::Path};

use docsite_core::{
    Config, NavItem, SidebarItem, SocialLink,
    config::{DocFooter, Footer},
    render_head,
};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Site data errors.
#[derive(Debug, Error)]
pub enum SiteDataError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for site data operations.
pub type Result<T> = std::result::Result<T, SiteDataError>;

/// File name of the exported site data.
pub const SITE_DATA_FILE: &str = "site.json";

/// Site data with everything resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rendered head markup, analytics first.
    pub head: String,

    pub locales: BTreeMap<String, LocaleData>,
}

/// One locale's resolved data.
#[derive(Debug, Clone, Serialize)]
pub struct LocaleData {
    pub label: String,
    pub lang: String,

    /// URL prefix, `/` for the root locale.
    pub prefix: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_template: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode_switch_label: Option<String>,

    pub nav: Vec<NavItem>,
    pub sidebar: Vec<SidebarItem>,
    pub social_links: Vec<SocialLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_footer: Option<DocFooter>,
}

impl SiteData {
    /// Resolve site data from configuration.
    pub fn from_config(config: &Config) -> Self {
        let locales = config
            .locales
            .iter()
            .map(|(code, locale)| {
                let theme = &locale.theme;
                let data = LocaleData {
                    label: locale.label.clone(),
                    lang: locale.lang.clone(),
                    prefix: Config::locale_prefix(code),
                    title_template: locale.title_template.clone(),
                    // Fall back to the site description.
                    description: locale
                        .description
                        .clone()
                        .or_else(|| config.site.description.clone()),
                    logo: theme.logo.clone(),
                    site_title: theme.site_title.clone(),
                    outline_title: theme.outline_title.clone(),
                    dark_mode_switch_label: theme.dark_mode_switch_label.clone(),
                    nav: theme.nav.clone(),
                    sidebar: theme.sidebar.clone(),
                    social_links: theme.social_links.clone(),
                    footer: theme.footer.clone(),
                    doc_footer: theme.doc_footer.clone(),
                };
                (code.clone(), data)
            })
            .collect();

        Self {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            head: render_head(&config.resolved_head()),
            locales,
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write `site.json` into the output directory.
    pub async fn write(&self, out_dir: &Path) -> Result<()> {
        let path = out_dir.join(SITE_DATA_FILE);
        tokio::fs::write(&path, self.to_json()?).await?;
        info!(path = %path.display(), "wrote site data");
        Ok(())
    }
}
