//! docsite Generator Library
//!
//! Build-end steps for the documentation site.
//!
//! # Modules
//!
//! - [`loader`] - Markdown page discovery and URL mapping
//! - [`sitemap`] - URL rewriting and streaming XML sitemap output
//! - [`site_data`] - Resolved configuration export for the renderer
//! - [`build`] - Build-end orchestration

pub mod build;
pub mod loader;
pub mod site_data;
pub mod sitemap;

pub use build::{BuildError, BuildStats, Builder};
pub use loader::{ContentLoader, Page};
pub use site_data::SiteData;
pub use sitemap::{SitemapGenerator, SitemapStream, SitemapUrl, rewrite_url, write_sitemap};
