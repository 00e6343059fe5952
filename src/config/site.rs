//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::RelatedWeights;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// Color scheme name exposed to pages as `data-theme`
    pub theme: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub blog_dir: String,
    pub projects_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Writing
    #[serde(default)]
    pub reading: ReadingConfig,
    #[serde(default)]
    pub related: RelatedConfig,
    pub other_projects_limit: usize,
    pub recent_posts_limit: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Navigation
    pub menu: Vec<MenuItem>,

    // Date format (chrono strftime)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Liminal".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            theme: "dark".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            blog_dir: "blog".to_string(),
            projects_dir: "projects".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            reading: ReadingConfig::default(),
            related: RelatedConfig::default(),
            other_projects_limit: 3,
            recent_posts_limit: 3,
            highlight: HighlightConfig::default(),

            menu: vec![
                MenuItem::new("Home", "/"),
                MenuItem::new("Blog", "/blog/"),
                MenuItem::new("Projects", "/projects/"),
            ],

            date_format: "%B %-d, %Y".to_string(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reading.words_per_minute == 0 {
            anyhow::bail!("reading.words_per_minute must be greater than zero");
        }
        if self.blog_dir == self.projects_dir {
            anyhow::bail!(
                "blog_dir and projects_dir must differ (both are '{}')",
                self.blog_dir
            );
        }
        Ok(())
    }
}

/// Reading-time estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
        }
    }
}

/// Related-post suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedConfig {
    pub tag_weight: usize,
    pub category_weight: usize,
    pub limit: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        let weights = RelatedWeights::default();
        Self {
            tag_weight: weights.tag,
            category_weight: weights.category,
            limit: 3,
        }
    }
}

impl RelatedConfig {
    pub fn weights(&self) -> RelatedWeights {
        RelatedWeights {
            tag: self.tag_weight,
            category: self.category_weight,
        }
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Header navigation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

impl MenuItem {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Liminal");
        assert_eq!(config.reading.words_per_minute, 200);
        assert_eq!(config.related.weights(), RelatedWeights { tag: 2, category: 3 });
        assert_eq!(config.related.limit, 3);
        assert_eq!(config.menu.len(), 3);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Test User
blog_dir: writing
related:
  category_weight: 5
reading:
  words_per_minute: 250
menu:
  - name: Home
    path: /
  - name: About
    path: /about/
analytics_id: abc
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.blog_dir, "writing");
        assert_eq!(config.projects_dir, "projects");
        assert_eq!(config.related.tag_weight, 2);
        assert_eq!(config.related.category_weight, 5);
        assert_eq!(config.reading.words_per_minute, 250);
        assert_eq!(config.menu[1], MenuItem::new("About", "/about/"));
        assert!(config.extra.contains_key("analytics_id"));
    }

    #[test]
    fn test_load_rejects_zero_reading_speed() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        fs::write(tmp.path(), "reading:\n  words_per_minute: 0\n").unwrap();
        assert!(SiteConfig::load(tmp.path()).is_err());
    }
}
