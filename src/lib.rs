//! liminal: a portfolio and blog generator
//!
//! Blog posts and projects are written as front-matter text files. This crate
//! loads them into ordered collections, derives reading times, outlines and
//! related-post suggestions, and renders the whole site to static HTML.

pub mod commands;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod render;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::CollectionKind;

/// The main portfolio application
#[derive(Clone)]
pub struct Portfolio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Root of the content collections
    pub content_dir: PathBuf,
    /// Static assets copied verbatim
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Portfolio {
    /// Create a new Portfolio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            static_dir,
            public_dir,
        })
    }

    /// Directory holding one collection
    pub fn collection_dir(&self, kind: CollectionKind) -> PathBuf {
        match kind {
            CollectionKind::Posts => self.content_dir.join(&self.config.blog_dir),
            CollectionKind::Projects => self.content_dir.join(&self.config.projects_dir),
        }
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::init_site(&self.base_dir)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<generator::GenerateStats> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post or project
    pub fn new_item(&self, kind: CollectionKind, title: &str) -> Result<PathBuf> {
        commands::new::create_item(self, kind, title, None)
    }
}
