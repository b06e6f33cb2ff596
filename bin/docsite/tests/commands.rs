//! Command-level tests against a scratch site.

use std::{fs, path::Path};

use docsite::cmd::{self, Paths};
use tempfile::TempDir;

const SITE: &str = r#"
[site]
title = "C Web Framework"
hostname = "https://cwebframework.tech/"

[locales.root]
label = "Русский"
lang = "ru"

[[locales.root.theme.nav]]
text = "Документация"
link = "/introduction"

[locales.en]
label = "English"
lang = "en"

[[locales.en.theme.nav]]
text = "Docs"
link = "/en/introduction"
"#;

fn scratch_site() -> (TempDir, Paths) {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("docs");
    fs::create_dir_all(src.join("en")).unwrap();
    fs::write(src.join("index.md"), "# Главная\n").unwrap();
    fs::write(src.join("introduction.md"), "# Введение\n").unwrap();
    fs::write(src.join("en/introduction.md"), "# Intro\n").unwrap();
    fs::write(dir.path().join("site.toml"), SITE).unwrap();

    let paths = Paths {
        src: Some(src),
        out: Some(dir.path().join("dist")),
    };
    (dir, paths)
}

fn config_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("site.toml")
}

#[tokio::test]
async fn test_build_command_writes_outputs() {
    let (dir, paths) = scratch_site();

    cmd::build::run(&config_path(&dir), &paths, None).await.unwrap();

    let out = dir.path().join("dist");
    let xml = fs::read_to_string(out.join("sitemap.xml")).unwrap();
    assert_eq!(xml.matches("<url>").count(), 3);
    assert!(out.join("site.json").exists());
}

#[tokio::test]
async fn test_build_command_hostname_override() {
    let (dir, paths) = scratch_site();

    cmd::build::run(&config_path(&dir), &paths, Some("https://docs.example.org/"))
        .await
        .unwrap();

    let xml = fs::read_to_string(dir.path().join("dist/sitemap.xml")).unwrap();
    assert!(xml.contains("<loc>https://docs.example.org/en/introduction.html</loc>"));
}

#[tokio::test]
async fn test_build_command_rejects_bad_hostname() {
    let (dir, paths) = scratch_site();
    let result = cmd::build::run(&config_path(&dir), &paths, Some("not a url")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_sitemap_command() {
    let (dir, paths) = scratch_site();
    cmd::sitemap::run(&config_path(&dir), &paths).await.unwrap();

    let out = dir.path().join("dist");
    assert!(out.join("sitemap.xml").exists());
    assert!(!out.join("site.json").exists());
}

#[test]
fn test_check_command_passes_strict() {
    let (dir, paths) = scratch_site();
    cmd::check::run(&config_path(&dir), &paths, true).unwrap();
}

#[test]
fn test_check_command_dead_link_fails_strict() {
    let (dir, paths) = scratch_site();
    fs::remove_file(paths.src.as_ref().unwrap().join("en/introduction.md")).unwrap();

    assert!(cmd::check::run(&config_path(&dir), &paths, false).is_ok());
    assert!(cmd::check::run(&config_path(&dir), &paths, true).is_err());
}

#[test]
fn test_check_command_missing_config() {
    let result = cmd::check::run(Path::new("/nonexistent/site.toml"), &Paths::default(), false);
    assert!(result.is_err());
}

#[test]
fn test_check_command_missing_source_fails() {
    let (dir, mut paths) = scratch_site();
    paths.src = Some(dir.path().join("missing"));

    let err = cmd::check::run(&config_path(&dir), &paths, false).unwrap_err();
    assert!(err.to_string().contains("1 error"));
}

#[test]
fn test_urls_command() {
    let (dir, paths) = scratch_site();
    cmd::urls::run(&config_path(&dir), &paths).unwrap();
}
