//! Navigation bar and sidebar trees.
//!
//! Trees are plain owned values, so a sidebar cannot refer back to one of its
//! ancestors.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A top navigation bar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Display label.
    pub text: String,

    /// Target link.
    pub link: String,
}

/// A sidebar entry: either a leaf link or a group of nested entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarItem {
    /// Display label. Optional for untitled top-level groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Target link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Whether the group starts collapsed. `None` means not collapsible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,

    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SidebarItem>,
}

impl SidebarItem {
    /// Create a leaf entry.
    pub fn leaf(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            link: Some(link.into()),
            ..Self::default()
        }
    }

    /// Create a group entry.
    pub fn group(text: Option<&str>, items: Vec<SidebarItem>) -> Self {
        Self {
            text: text.map(str::to_string),
            items,
            ..Self::default()
        }
    }

    /// Whether this entry has nested entries.
    pub fn is_group(&self) -> bool {
        !self.items.is_empty()
    }

    /// All links in this subtree, depth-first in tree order.
    pub fn links(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_links(&mut out);
        out
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(link) = &self.link {
            out.push(link);
        }
        for item in &self.items {
            item.collect_links(out);
        }
    }
}

/// All links of a sidebar, depth-first in tree order.
pub fn sidebar_links(items: &[SidebarItem]) -> Vec<&str> {
    items.iter().flat_map(SidebarItem::links).collect()
}

/// Check that a sidebar tree is well formed.
///
/// Every entry needs a link or children, leaves need a label, and links must
/// not be blank.
pub fn validate_sidebar(locale: &str, items: &[SidebarItem]) -> Result<()> {
    for item in items {
        validate_item(locale, item, 0)?;
    }
    Ok(())
}

fn validate_item(locale: &str, item: &SidebarItem, depth: usize) -> Result<()> {
    let label = item.text.as_deref().unwrap_or("<untitled>");

    if item.link.is_none() && item.items.is_empty() {
        return Err(CoreError::navigation(
            locale,
            format!("sidebar entry '{label}' has neither a link nor items"),
        ));
    }

    if !item.is_group() && item.text.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Err(CoreError::navigation(
            locale,
            format!("sidebar link at depth {depth} has no text"),
        ));
    }

    if let Some(link) = &item.link
        && link.trim().is_empty()
    {
        return Err(CoreError::navigation(
            locale,
            format!("sidebar entry '{label}' has an empty link"),
        ));
    }

    for child in &item.items {
        validate_item(locale, child, depth + 1)?;
    }

    Ok(())
}

/// Check that navigation bar entries are well formed.
pub fn validate_nav(locale: &str, items: &[NavItem]) -> Result<()> {
    for item in items {
        if item.text.trim().is_empty() {
            return Err(CoreError::navigation(locale, "nav entry has no text"));
        }
        if item.link.trim().is_empty() {
            return Err(CoreError::navigation(
                locale,
                format!("nav entry '{}' has an empty link", item.text),
            ));
        }
    }
    Ok(())
}

/// Classification of a navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Site-relative link, e.g. `/en/introduction`.
    Internal,
    /// Absolute link to another site or a `mailto:` address.
    External,
    /// Anything else (relative paths, unknown schemes).
    Invalid,
}

impl LinkKind {
    /// Classify a link.
    pub fn classify(link: &str) -> Self {
        if link.starts_with('/') && !link.starts_with("//") {
            Self::Internal
        } else if link.starts_with("http://")
            || link.starts_with("https://")
            || link.starts_with("mailto:")
        {
            Self::External
        } else {
            Self::Invalid
        }
    }
}

/// Reduce a link or page URL to a comparable form.
///
/// Drops query strings and fragments, `.html`/`.md` extensions and a trailing
/// `index`, so `/en/index.html`, `/en/index` and `/en/` compare equal.
pub fn normalize_link(link: &str) -> String {
    let path = link.split(['#', '?']).next().unwrap_or_default();
    let path = path
        .strip_suffix(".html")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(path);
    // `index` only counts as a whole segment: `/en/reindex` stays as is.
    let path = if path == "index" {
        ""
    } else {
        path.strip_suffix("/index")
            .map_or(path, |dir| &path[..dir.len() + 1])
    };

    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
