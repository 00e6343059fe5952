//! HTML helper functions

use super::url::{is_external, url_for};
use crate::config::SiteConfig;

/// Generate an anchor tag
///
/// `text` is inserted as-is; escape it first if it is plain text.
///
/// # Examples
/// ```ignore
/// link_to(&config, "/about/", "About", false) // -> <a href="/about/">About</a>
/// ```
pub fn link_to(config: &SiteConfig, path: &str, text: &str, external: bool) -> String {
    let href = url_for(config, path);

    if external || is_external(path) {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_html(&href),
            text
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, escape_html(&href), text)
    }
}

/// Generate an image tag
///
/// # Examples
/// ```ignore
/// image_tag(&config, "/images/cover.png", Some("Cover")) // -> <img src="/images/cover.png" alt="Cover">
/// ```
pub fn image_tag(config: &SiteConfig, path: &str, alt: Option<&str>) -> String {
    format!(
        r#"<img src="{}" alt="{}" loading="lazy">"#,
        escape_html(&url_for(config, path)),
        escape_html(alt.unwrap_or(""))
    )
}

/// Generate Open Graph meta tags
pub fn open_graph(
    title: &str,
    description: &str,
    url: &str,
    image: Option<&str>,
    site_name: &str,
    kind: &str,
) -> String {
    let mut tags = vec![
        format!(r#"<meta property="og:type" content="{}">"#, kind),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            escape_html(title)
        ),
        format!(r#"<meta property="og:url" content="{}">"#, escape_html(url)),
        format!(
            r#"<meta property="og:site_name" content="{}">"#,
            escape_html(site_name)
        ),
    ];

    if !description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            escape_html(description)
        ));
    }

    if let Some(img) = image {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            escape_html(img)
        ));
    }

    tags.join("\n")
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="liminal {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Truncate a string to at most `length` characters
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
