//! Build command - runs every build-end step

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use docsite_generator::Builder;

use super::{Paths, load_config};

/// Run the build command.
///
/// Exports site data and writes the sitemap into the output directory.
pub async fn run(config_path: &Path, paths: &Paths, hostname: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?paths, ?hostname, "Starting build-end");

    let mut config = load_config(config_path)?;

    // Override hostname if specified via CLI
    if let Some(h) = hostname {
        tracing::info!(hostname = h, "Overriding site hostname from CLI");
        config.site.hostname = h.to_string();
        config.validate().wrap_err("Invalid hostname override")?;
    }

    let src_dir = paths.src_dir(&config);
    let out_dir = paths.out_dir(&config);

    tracing::debug!(?config, "Loaded configuration");

    let stats = Builder::new(config, &src_dir, &out_dir)
        .build()
        .await
        .wrap_err("Build-end failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build-end completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Sitemap:    {} URLs", stats.sitemap_urls);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", out_dir.display());
    println!();

    tracing::info!(?stats, ?duration, "Build-end completed successfully");

    Ok(())
}
