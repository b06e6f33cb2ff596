//! Sitemap command - writes only the sitemap

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use docsite_generator::Builder;

use super::{Paths, load_config};

/// Run the sitemap command.
pub async fn run(config_path: &Path, paths: &Paths) -> Result<()> {
    let config = load_config(config_path)?;
    let src_dir = paths.src_dir(&config);
    let out_dir = paths.out_dir(&config);
    let filename = config.sitemap.filename.clone();

    tracing::info!(?src_dir, ?out_dir, "Writing sitemap");

    let count = Builder::new(config, &src_dir, &out_dir)
        .sitemap()
        .await
        .wrap_err("Failed to write sitemap")?;

    println!(
        "Wrote {count} URLs to {}",
        out_dir.join(filename).display()
    );

    Ok(())
}
