//! docsite Core Library
//!
//! Configuration, navigation trees and head rendering for the documentation site.

pub mod config;
pub mod error;
pub mod head;
pub mod nav;

pub use config::{Config, LocaleConfig, ROOT_LOCALE, SitemapConfig, SocialIcon, SocialLink};
pub use error::{CoreError, Result};
pub use head::{AnalyticsConfig, HeadTag, YandexMetrika, render_head};
pub use nav::{LinkKind, NavItem, SidebarItem, normalize_link, sidebar_links};
