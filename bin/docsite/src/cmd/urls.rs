//! Urls command - prints rewritten page URLs

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use docsite_generator::{SitemapGenerator, loader::ContentLoader};

use super::{Paths, load_config};

/// Run the urls command.
///
/// Prints one absolute URL per line, in sitemap order.
pub fn run(config_path: &Path, paths: &Paths) -> Result<()> {
    let config = load_config(config_path)?;
    let src_dir = paths.src_dir(&config);

    let pages = ContentLoader::new(&src_dir, &config.sitemap.patterns)
        .with_clean_urls(config.sitemap.clean_urls)
        .load()
        .wrap_err("Failed to load pages")?;

    let generator = SitemapGenerator::new(config).wrap_err("Invalid sitemap settings")?;
    for url in generator.urls(&pages)? {
        println!("{}", url.loc);
    }

    Ok(())
}
