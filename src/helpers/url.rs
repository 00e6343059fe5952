//! URL helper functions
//!
//! These are the only place where slugs become URLs.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use crate::content::CollectionKind;

/// Characters left unescaped in query values
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/site/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/site/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_external(path) {
        return path.to_string();
    }
    format!("{}{}", config.url.trim_end_matches('/'), url_for(config, path))
}

/// Site-relative path of an item's page
pub fn item_path(config: &SiteConfig, kind: CollectionKind, slug: &str) -> String {
    match kind {
        CollectionKind::Posts => format!("{}/{}/", config.blog_dir, slug),
        CollectionKind::Projects => format!("{}/{}/", config.projects_dir, slug),
    }
}

/// Site-relative path of a blog post
pub fn post_path(config: &SiteConfig, slug: &str) -> String {
    item_path(config, CollectionKind::Posts, slug)
}

/// Site-relative path of a project page
pub fn project_path(config: &SiteConfig, slug: &str) -> String {
    item_path(config, CollectionKind::Projects, slug)
}

/// Site-relative path of a collection's index page
pub fn collection_path(config: &SiteConfig, kind: CollectionKind) -> String {
    match kind {
        CollectionKind::Posts => format!("{}/", config.blog_dir),
        CollectionKind::Projects => format!("{}/", config.projects_dir),
    }
}

/// Link to the blog index filtered by one tag
pub fn tag_filter_path(config: &SiteConfig, tag: &str) -> String {
    format!("{}/?tag={}", config.blog_dir, encode_query(tag))
}

/// Link to the blog index filtered by a category
pub fn category_filter_path(config: &SiteConfig, category: &str) -> String {
    format!("{}/?category={}", config.blog_dir, encode_query(category))
}

/// Percent-encode a query value
pub fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

pub fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/site/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/site/css/style.css");
        assert_eq!(url_for(&config, "blog/"), "/site/blog/");
        assert_eq!(url_for(&config, ""), "/site/");
        assert_eq!(url_for(&config, "https://x.dev/a"), "https://x.dev/a");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/blog/hello/"),
            "https://example.com/site/blog/hello/"
        );
    }

    #[test]
    fn test_item_paths() {
        let config = SiteConfig::default();
        assert_eq!(item_path(&config, CollectionKind::Posts, "hello"), "blog/hello/");
        assert_eq!(
            item_path(&config, CollectionKind::Projects, "loom"),
            "projects/loom/"
        );
        assert_eq!(collection_path(&config, CollectionKind::Posts), "blog/");
        assert_eq!(post_path(&config, "hello"), "blog/hello/");
        assert_eq!(project_path(&config, "loom"), "projects/loom/");
    }

    #[test]
    fn test_filter_paths_are_encoded() {
        let config = SiteConfig::default();
        assert_eq!(tag_filter_path(&config, "web dev"), "blog/?tag=web%20dev");
        assert_eq!(
            category_filter_path(&config, "R&D"),
            "blog/?category=R%26D"
        );
    }
}
