//! Command implementations.

use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use docsite_core::Config;

pub mod build;
pub mod check;
pub mod sitemap;
pub mod urls;

/// Source and output directory overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct Paths {
    /// Markdown source directory.
    pub src: Option<PathBuf>,

    /// Build output directory.
    pub out: Option<PathBuf>,
}

impl Paths {
    /// Source directory, falling back to `site.src_dir`.
    pub fn src_dir(&self, config: &Config) -> PathBuf {
        self.src
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.site.src_dir))
    }

    /// Output directory, falling back to `site.out_dir`.
    pub fn out_dir(&self, config: &Config) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.site.out_dir))
    }
}

/// Load configuration with environment overrides.
pub(crate) fn load_config(path: &std::path::Path) -> Result<Config> {
    Config::load_with_env(path).wrap_err("Failed to load configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_fallback_to_config() {
        let config = Config::from_toml_str(
            r#"
[site]
title = "Site"
hostname = "https://example.com/"
src_dir = "site/docs"
out_dir = "site/dist"

[locales.root]
label = "English"
lang = "en"
"#,
        )
        .unwrap();

        let paths = Paths::default();
        assert_eq!(paths.src_dir(&config), PathBuf::from("site/docs"));
        assert_eq!(paths.out_dir(&config), PathBuf::from("site/dist"));

        let paths = Paths {
            src: Some(PathBuf::from("other")),
            out: None,
        };
        assert_eq!(paths.src_dir(&config), PathBuf::from("other"));
    }
}
