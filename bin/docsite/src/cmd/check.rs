//! Check command - validate configuration, navigation and links

use std::{collections::HashSet, path::Path};

use color_eyre::eyre::{Result, bail};
use docsite_core::{Config, LinkKind, ROOT_LOCALE, SocialIcon, normalize_link, sidebar_links};
use docsite_generator::{Page, SitemapGenerator, loader::ContentLoader};

use super::Paths;

/// Validation result.
#[derive(Debug, Default)]
pub(crate) struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration, navigation trees and internal links.
pub fn run(config_path: &Path, paths: &Paths, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and navigation");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking navigation...");
        check_navigation(cfg, &mut result);

        let src_dir = paths.src_dir(cfg);
        println!("\nChecking pages in {}...", src_dir.display());
        match ContentLoader::new(&src_dir, &cfg.sitemap.patterns)
            .with_clean_urls(cfg.sitemap.clean_urls)
            .load()
        {
            Ok(pages) => {
                println!("  ✓ Found {} pages", pages.len());
                check_links_against_pages(cfg, &pages, &mut result);
            }
            Err(e) => {
                result.add_error(format!("Failed to load pages: {e}"));
                println!("  ✗ Failed to load pages: {e}");
            }
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check link kinds and locale prefixes of every navigation entry.
pub(crate) fn check_navigation(config: &Config, result: &mut ValidationResult) {
    for (code, locale) in &config.locales {
        let theme = &locale.theme;
        let prefix = Config::locale_prefix(code);

        let links = theme
            .nav
            .iter()
            .map(|item| item.link.as_str())
            .chain(sidebar_links(&theme.sidebar));

        for link in links {
            match LinkKind::classify(link) {
                LinkKind::Internal => {
                    if code != ROOT_LOCALE && !link.starts_with(&prefix) {
                        result.add_warning(format!(
                            "locales.{code}: link '{link}' is outside the locale prefix '{prefix}'"
                        ));
                    }
                }
                LinkKind::External => {}
                LinkKind::Invalid => {
                    result.add_error(format!("locales.{code}: invalid link '{link}'"));
                }
            }
        }

        for social in &theme.social_links {
            if LinkKind::classify(&social.link) != LinkKind::External {
                result.add_error(format!(
                    "locales.{code}: social link '{}' must be absolute",
                    social.link
                ));
            }
            if let SocialIcon::Named(name) = &social.icon
                && name.trim().is_empty()
            {
                result.add_error(format!(
                    "locales.{code}: social link '{}' has an empty icon",
                    social.link
                ));
            }
        }
    }

    println!("  ✓ Navigation checked ({} locales)", config.locales.len());
}

/// Warn about internal navigation links that no page answers.
pub(crate) fn check_links_against_pages(
    config: &Config,
    pages: &[Page],
    result: &mut ValidationResult,
) {
    let known: HashSet<String> = match SitemapGenerator::new(config.clone()) {
        Ok(generator) => pages
            .iter()
            .map(|p| normalize_link(&generator.page_path(p)))
            .collect(),
        Err(e) => {
            result.add_error(format!("Sitemap settings invalid: {e}"));
            return;
        }
    };

    let mut dead = 0;
    for (code, locale) in &config.locales {
        let theme = &locale.theme;
        let links = theme
            .nav
            .iter()
            .map(|item| item.link.as_str())
            .chain(sidebar_links(&theme.sidebar));

        for link in links.filter(|l| LinkKind::classify(l) == LinkKind::Internal) {
            if !known.contains(&normalize_link(link)) {
                result.add_warning(format!("locales.{code}: no page for link '{link}'"));
                dead += 1;
            }
        }
    }

    if dead == 0 {
        println!("  ✓ All internal links resolve");
    } else {
        println!("  ⚠ {dead} link(s) without a page");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn test_config(en_link: &str) -> Config {
        Config::from_toml_str(&format!(
            r#"
[site]
title = "Site"
hostname = "https://cwebframework.tech/"

[locales.root]
label = "Русский"
lang = "ru"

[[locales.root.theme.nav]]
text = "Главная"
link = "/"

[[locales.root.theme.social_links]]
icon = "github"
link = "https://github.com/fraxer/C-web-framework"

[locales.en]
label = "English"
lang = "en"

[[locales.en.theme.sidebar]]
text = "Docs"
items = [{{ text = "Intro", link = "{en_link}" }}]
"#
        ))
        .unwrap()
    }

    fn page(url: &str) -> Page {
        Page {
            url: url.to_string(),
            source_path: PathBuf::from("page.md"),
            modified: None,
        }
    }

    #[test]
    fn test_navigation_clean() {
        let mut result = ValidationResult::default();
        check_navigation(&test_config("/en/introduction"), &mut result);
        assert!(!result.has_errors());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_navigation_outside_prefix() {
        let mut result = ValidationResult::default();
        check_navigation(&test_config("/introduction"), &mut result);
        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("outside the locale prefix"));
    }

    #[test]
    fn test_navigation_invalid_link() {
        let mut result = ValidationResult::default();
        check_navigation(&test_config("introduction"), &mut result);
        assert!(result.has_errors());
    }

    #[test]
    fn test_links_against_pages() {
        let config = test_config("/en/introduction");

        let mut result = ValidationResult::default();
        check_links_against_pages(
            &config,
            &[page("/"), page("/en/introduction.html")],
            &mut result,
        );
        assert!(!result.has_warnings());

        let mut result = ValidationResult::default();
        check_links_against_pages(&config, &[page("/")], &mut result);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("/en/introduction"));
    }
}
