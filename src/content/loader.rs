//! Content loader - loads blog posts and projects from their collection directories

use std::fs;
use std::path::{Path, PathBuf};

use super::{
    Body, CollectionKind, ContentItem, FrontMatter, ItemKind, PostMeta, ProjectLinks, ProjectMeta,
    ReadingTime,
};
use crate::error::{ContentError, ContentResult};
use crate::Portfolio;

/// File extensions recognised as content, in lookup priority order
pub const CONTENT_EXTENSIONS: [&str; 3] = ["mdx", "md", "markdown"];

/// Loads content items fresh from disk on every call
pub struct ContentLoader<'a> {
    portfolio: &'a Portfolio,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(portfolio: &'a Portfolio) -> Self {
        Self { portfolio }
    }

    /// Load all blog posts, newest first
    pub fn load_posts(&self) -> ContentResult<Vec<ContentItem>> {
        self.load_collection(CollectionKind::Posts)
    }

    /// Load all projects, featured first
    pub fn load_projects(&self) -> ContentResult<Vec<ContentItem>> {
        self.load_collection(CollectionKind::Projects)
    }

    /// Load a whole collection from its configured directory
    pub fn load_collection(&self, kind: CollectionKind) -> ContentResult<Vec<ContentItem>> {
        self.load_collection_at(kind, &self.portfolio.collection_dir(kind))
    }

    /// Load a single item from its configured directory
    pub fn load_item(&self, kind: CollectionKind, slug: &str) -> ContentResult<ContentItem> {
        self.load_item_at(kind, &self.portfolio.collection_dir(kind), slug)
    }

    /// Load every item in `dir` for listing.
    ///
    /// Items that fail to load are logged and left out. Listing items carry
    /// an elided body.
    pub fn load_collection_at(
        &self,
        kind: CollectionKind,
        dir: &Path,
    ) -> ContentResult<Vec<ContentItem>> {
        if !dir.exists() {
            tracing::debug!("Collection directory {:?} does not exist", dir);
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        for slug in list_slugs(dir)? {
            match self.load_stem(kind, dir, &slug) {
                Ok(item) => items.push(item.elided()),
                Err(e) => {
                    tracing::warn!("Failed to load {} '{}': {}", kind.label(), slug, e);
                }
            }
        }

        sort_collection(kind, &mut items);
        tracing::debug!("Loaded {} {}s from {:?}", items.len(), kind.label(), dir);

        Ok(items)
    }

    /// Load a single item with its full body.
    ///
    /// The slug is tried as a file stem first, so `notes.md` finds
    /// `notes.md.mdx`. Failing that, a content extension on it is dropped.
    pub fn load_item_at(
        &self,
        kind: CollectionKind,
        dir: &Path,
        slug: &str,
    ) -> ContentResult<ContentItem> {
        match self.load_stem(kind, dir, slug) {
            Err(e) if e.is_not_found() => {
                let stripped = strip_content_extension(slug);
                if stripped == slug {
                    return Err(e);
                }
                self.load_stem(kind, dir, stripped)
            }
            result => result,
        }
    }

    /// Load the item whose file stem is exactly `stem`
    fn load_stem(
        &self,
        kind: CollectionKind,
        dir: &Path,
        stem: &str,
    ) -> ContentResult<ContentItem> {
        let path = resolve_item_path(dir, stem).ok_or_else(|| ContentError::NotFound {
            collection: dir.to_path_buf(),
            slug: stem.to_string(),
        })?;

        self.load_file(kind, &path, stem)
    }

    fn load_file(&self, kind: CollectionKind, path: &Path, slug: &str) -> ContentResult<ContentItem> {
        let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| ContentError::parse(path, e.0))?;

        let title = required(fm.title.as_deref(), "title", path)?;
        let summary = required(fm.summary.as_deref(), "summary", path)?;
        let date_string = required(fm.date.as_deref(), "date", path)?;
        let date = fm.parse_date().ok_or_else(|| {
            ContentError::parse(path, format!("unrecognised date '{}'", date_string))
        })?;

        let kind = match kind {
            CollectionKind::Posts => ItemKind::Post(PostMeta {
                category: fm.category.filter(|c| !c.trim().is_empty()),
                reading_time: ReadingTime::estimate(
                    body,
                    self.portfolio.config.reading.words_per_minute,
                ),
            }),
            CollectionKind::Projects => ItemKind::Project(ProjectMeta {
                tech_stack: fm.tech_stack,
                links: ProjectLinks {
                    repository: fm.github_url,
                    live: fm.live_url,
                },
                featured: fm.featured,
                image: fm.image,
            }),
        };

        Ok(ContentItem {
            id: fm.id.unwrap_or_else(|| slug.to_string()),
            slug: slug.to_string(),
            title,
            summary,
            date,
            date_string,
            tags: fm.tags,
            body: Body::Source(body.to_string()),
            source: path.to_path_buf(),
            kind,
            extra: fm.extra,
        })
    }
}

/// Order a collection: posts newest first, projects featured first then newest.
/// The sort is stable so equal keys keep their listing order.
pub fn sort_collection(kind: CollectionKind, items: &mut [ContentItem]) {
    match kind {
        CollectionKind::Posts => items.sort_by(|a, b| b.date.cmp(&a.date)),
        CollectionKind::Projects => items.sort_by(|a, b| {
            b.is_featured()
                .cmp(&a.is_featured())
                .then_with(|| b.date.cmp(&a.date))
        }),
    }
}

/// Slugs of all content files in `dir`, in file-name order
fn list_slugs(dir: &Path) -> ContentResult<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| ContentError::io(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_content_file(p))
        .collect();
    files.sort();

    let mut slugs: Vec<String> = Vec::new();
    for file in files {
        if let Some(stem) = file.file_stem().and_then(|s| s.to_str()) {
            if !slugs.iter().any(|s| s == stem) {
                slugs.push(stem.to_string());
            }
        }
    }

    Ok(slugs)
}

/// Find the backing file for a slug
fn resolve_item_path(dir: &Path, slug: &str) -> Option<PathBuf> {
    if slug.is_empty() || slug.starts_with('.') || slug.contains(['/', '\\']) {
        return None;
    }

    CONTENT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", slug, ext)))
        .find(|path| path.is_file())
}

fn strip_content_extension(slug: &str) -> &str {
    CONTENT_EXTENSIONS
        .iter()
        .find_map(|ext| slug.strip_suffix(&format!(".{}", ext)))
        .unwrap_or(slug)
}

/// Check if a file is a content file
pub fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CONTENT_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

fn required(value: Option<&str>, field: &str, path: &Path) -> ContentResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ContentError::parse(
            path,
            format!("missing required field '{}'", field),
        )),
    }
}
