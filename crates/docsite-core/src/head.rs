//! Head tag rendering and analytics snippets.

use std::{collections::BTreeMap, fmt::Write};

use serde::{Deserialize, Serialize};

/// Elements rendered without content or a closing tag.
const VOID_ELEMENTS: &[&str] = &["base", "link", "meta"];

/// Yandex Metrika loader script.
const METRIKA_TAG_URL: &str = "https://mc.yandex.ru/metrika/tag.js";

/// Yandex Metrika tracking pixel base URL.
const METRIKA_WATCH_URL: &str = "https://mc.yandex.ru/watch";

/// A tag injected into every page's `<head>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadTag {
    /// Element name, e.g. `link` or `script`.
    pub tag: String,

    /// Attributes, emitted in key order.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,

    /// Inner markup. Written verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl HeadTag {
    /// Create a tag with no attributes or content.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            content: None,
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set the inner markup.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Whether this is a void element.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.to_ascii_lowercase().as_str())
    }

    /// Render the tag as HTML.
    pub fn to_html(&self) -> String {
        let mut html = format!("<{}", self.tag);
        for (key, value) in &self.attrs {
            let _ = write!(html, r#" {key}="{}""#, escape_attr(value));
        }
        html.push('>');

        if self.is_void() {
            return html;
        }

        if let Some(content) = &self.content {
            html.push_str(content);
        }
        let _ = write!(html, "</{}>", self.tag);
        html
    }
}

/// Render a list of head tags, one per line.
pub fn render_head(tags: &[HeadTag]) -> String {
    tags.iter()
        .map(HeadTag::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Analytics providers injected into the head.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Yandex Metrika counter.
    #[serde(default)]
    pub yandex_metrika: Option<YandexMetrika>,
}

impl AnalyticsConfig {
    /// Head tags for every configured provider.
    pub fn head_tags(&self) -> Vec<HeadTag> {
        self.yandex_metrika
            .as_ref()
            .map(YandexMetrika::head_tags)
            .unwrap_or_default()
    }
}

/// Yandex Metrika counter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YandexMetrika {
    /// Counter identifier.
    pub counter_id: u64,

    #[serde(default = "default_true")]
    pub clickmap: bool,

    #[serde(default = "default_true")]
    pub track_links: bool,

    #[serde(default = "default_true")]
    pub accurate_track_bounce: bool,

    /// Session replay.
    #[serde(default = "default_true")]
    pub webvisor: bool,
}

fn default_true() -> bool {
    true
}

impl YandexMetrika {
    /// Create counter settings with all tracking options enabled.
    pub fn new(counter_id: u64) -> Self {
        Self {
            counter_id,
            clickmap: true,
            track_links: true,
            accurate_track_bounce: true,
            webvisor: true,
        }
    }

    /// The loader script followed by the tracking pixel.
    pub fn head_tags(&self) -> Vec<HeadTag> {
        let script = HeadTag::new("script")
            .attr("id", "mtrk")
            .content(self.loader_script());

        let pixel = HeadTag::new("div").content(format!(
            r#"<img src="{METRIKA_WATCH_URL}/{}" style="position:absolute; left:-9999px;" alt="" />"#,
            self.counter_id
        ));

        vec![script, pixel]
    }

    fn loader_script(&self) -> String {
        format!(
            r#"
(function(m,e,t,r,i,k,a){{m[i]=m[i]||function(){{(m[i].a=m[i].a||[]).push(arguments)}};
m[i].l=1*new Date();
for (var j = 0; j < document.scripts.length; j++) {{if (document.scripts[j].src === r) {{ return; }}}}
k=e.createElement(t),a=e.getElementsByTagName(t)[0],k.async=1,k.src=r,a.parentNode.insertBefore(k,a)}})
(window, document, "script", "{METRIKA_TAG_URL}", "ym");

ym({id}, "init", {{
    clickmap:{clickmap},
    trackLinks:{track_links},
    accurateTrackBounce:{bounce},
    webvisor:{webvisor}
}});
"#,
            id = self.counter_id,
            clickmap = self.clickmap,
            track_links = self.track_links,
            bounce = self.accurate_track_bounce,
            webvisor = self.webvisor,
        )
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_tag() {
        let tag = HeadTag::new("link")
            .attr("rel", "icon")
            .attr("type", "image/x-icon")
            .attr("href", "/favicon.ico");

        assert_eq!(
            tag.to_html(),
            r#"<link href="/favicon.ico" rel="icon" type="image/x-icon">"#
        );
    }

    #[test]
    fn test_content_tag() {
        let tag = HeadTag::new("script").attr("id", "x").content("let a = 1;");
        assert_eq!(tag.to_html(), r#"<script id="x">let a = 1;</script>"#);
    }

    #[test]
    fn test_attr_escaping() {
        let tag = HeadTag::new("meta").attr("content", r#"a "quoted" & <b>"#);
        assert!(tag.to_html().contains("a &quot;quoted&quot; &amp; &lt;b&gt;"));
    }

    #[test]
    fn test_metrika_tags() {
        let tags = YandexMetrika::new(94252971).head_tags();
        assert_eq!(tags.len(), 2);

        let script = tags[0].to_html();
        assert!(script.starts_with(r#"<script id="mtrk">"#));
        assert!(script.contains("https://mc.yandex.ru/metrika/tag.js"));
        assert!(script.contains(r#"ym(94252971, "init""#));
        assert!(script.contains("webvisor:true"));

        let pixel = tags[1].to_html();
        assert!(pixel.contains("https://mc.yandex.ru/watch/94252971"));
    }

    #[test]
    fn test_metrika_options() {
        let mut metrika = YandexMetrika::new(1);
        metrika.webvisor = false;
        let script = metrika.head_tags()[0].to_html();
        assert!(script.contains("webvisor:false"));
        assert!(script.contains("clickmap:true"));
    }

    #[test]
    fn test_empty_analytics() {
        assert!(AnalyticsConfig::default().head_tags().is_empty());
    }

    #[test]
    fn test_render_head() {
        let tags = vec![
            HeadTag::new("meta").attr("name", "a"),
            HeadTag::new("meta").attr("name", "b"),
        ];
        assert_eq!(
            render_head(&tags),
            "<meta name=\"a\">\n<meta name=\"b\">"
        );
    }
}
