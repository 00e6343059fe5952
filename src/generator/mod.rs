//! Generator module - writes the static site from the content collections

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{
    aggregate, archive, other_items, related_items, CollectionKind, ContentItem, ContentLoader,
    Field,
};
use crate::context::SiteContext;
use crate::helpers::{item_path, url_for};
use crate::render::{ComponentRegistry, MarkdownRenderer};
use crate::templates;
use crate::Portfolio;

/// What one generation pass produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub posts: usize,
    pub projects: usize,
    /// Items listed in a collection whose detail page could not be built
    pub skipped: usize,
}

/// Static site generator
pub struct Generator {
    portfolio: Portfolio,
    ctx: SiteContext,
    renderer: MarkdownRenderer,
    components: ComponentRegistry,
}

impl Generator {
    /// Create a new generator with the built-in components
    pub fn new(portfolio: &Portfolio) -> Self {
        Self {
            portfolio: portfolio.clone(),
            ctx: SiteContext::new(portfolio.config.clone()),
            renderer: MarkdownRenderer::from_config(&portfolio.config.highlight),
            components: ComponentRegistry::with_builtins(),
        }
    }

    /// Replace the component registry used for bodies
    pub fn with_components(mut self, components: ComponentRegistry) -> Self {
        self.components = components;
        self
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<GenerateStats> {
        fs::create_dir_all(&self.portfolio.public_dir)?;

        let loader = ContentLoader::new(&self.portfolio);
        let posts = loader.load_posts()?;
        let projects = loader.load_projects()?;
        tracing::info!("Loaded {} posts and {} projects", posts.len(), projects.len());

        self.copy_static_assets()?;

        let mut stats = GenerateStats::default();
        self.generate_item_pages(&loader, CollectionKind::Posts, &posts, &mut stats)?;
        self.generate_item_pages(&loader, CollectionKind::Projects, &projects, &mut stats)?;

        self.write_page("", &templates::home(&self.ctx.at("/"), &posts, &projects))?;
        self.generate_blog_index(&posts)?;
        self.generate_project_index(&projects)?;

        fs::write(
            self.portfolio.public_dir.join("404.html"),
            templates::not_found(&self.ctx.at("/404.html")),
        )?;

        self.generate_search_index(&posts, &projects)?;

        Ok(stats)
    }

    fn generate_blog_index(&self, posts: &[ContentItem]) -> Result<()> {
        let path = format!("{}/", self.portfolio.config.blog_dir);
        let html = templates::blog_index(
            &self.page_context(&path),
            posts,
            &aggregate(posts, Field::Tags),
            &aggregate(posts, Field::Category),
            &archive(posts),
        );
        self.write_page(&path, &html)
    }

    fn generate_project_index(&self, projects: &[ContentItem]) -> Result<()> {
        let path = format!("{}/", self.portfolio.config.projects_dir);
        let html = templates::project_index(
            &self.page_context(&path),
            projects,
            &aggregate(projects, Field::TechStack),
        );
        self.write_page(&path, &html)
    }

    /// Detail pages re-read each item so bodies never come from a listing
    fn generate_item_pages(
        &self,
        loader: &ContentLoader<'_>,
        kind: CollectionKind,
        listing: &[ContentItem],
        stats: &mut GenerateStats,
    ) -> Result<()> {
        let config = &self.portfolio.config;

        for entry in listing {
            let item = match loader.load_item(kind, &entry.slug) {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!("Skipping {} '{}': {}", kind.label(), entry.slug, e);
                    stats.skipped += 1;
                    continue;
                }
            };
            let rendered = match self.renderer.render_item(&item, &self.components) {
                Ok(rendered) => rendered,
                Err(e) => {
                    tracing::warn!("Failed to render {} '{}': {}", kind.label(), item.slug, e);
                    stats.skipped += 1;
                    continue;
                }
            };

            let path = item_path(config, kind, &item.slug);
            let ctx = self.page_context(&path);
            let html = match kind {
                CollectionKind::Posts => {
                    let related = related_items(
                        &item,
                        listing,
                        config.related.limit,
                        &config.related.weights(),
                    );
                    templates::post_page(
                        &ctx,
                        &item,
                        &rendered,
                        &related,
                        item.prev(listing),
                        item.next(listing),
                    )
                }
                CollectionKind::Projects => {
                    let others = other_items(&item, listing, config.other_projects_limit);
                    templates::project_page(&ctx, &item, &rendered, &others)
                }
            };

            self.write_page(&path, &html)?;
            tracing::debug!("Generated {}: {}", kind.label(), path);

            match kind {
                CollectionKind::Posts => stats.posts += 1,
                CollectionKind::Projects => stats.projects += 1,
            }
        }

        Ok(())
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, posts: &[ContentItem], projects: &[ContentItem]) -> Result<()> {
        let config = &self.portfolio.config;
        let search_data: Vec<serde_json::Value> = posts
            .iter()
            .chain(projects)
            .map(|item| {
                serde_json::json!({
                    "kind": item.collection().label(),
                    "title": item.title,
                    "url": url_for(config, &item_path(config, item.collection(), &item.slug)),
                    "summary": item.summary,
                    "tags": item.tags,
                    "category": item.category(),
                    "techStack": item.tech_stack(),
                    "date": item.date.format("%Y-%m-%d").to_string(),
                })
            })
            .collect();

        let output_path = self.portfolio.public_dir.join("search.json");
        let json = serde_json::to_string_pretty(&search_data)?;
        fs::write(&output_path, json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Copy everything under the static directory as-is
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.portfolio.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.portfolio.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }

    fn page_context(&self, path: &str) -> SiteContext {
        self.ctx.at(&format!("/{}", path.trim_start_matches('/')))
    }

    /// Write `html` as the index page of a site-relative directory
    fn write_page(&self, path: &str, html: &str) -> Result<()> {
        let dir = self.portfolio.public_dir.join(path.trim_matches('/'));
        write_file(&dir.join("index.html"), html)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, contents).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn site() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(
            root,
            "content/blog/first.mdx",
            "---\ntitle: First\ndate: 2024-01-01\nsummary: One\ntags: [rust, web]\ncategory: eng\n---\n# Intro\n\nHello.\n",
        );
        write(
            root,
            "content/blog/second.md",
            "---\ntitle: Second\ndate: 2024-02-01\nsummary: Two\ntags: [rust]\ncategory: eng\n---\n<Callout variant=\"tip\">Hi</Callout>\n",
        );
        write(root, "content/blog/broken.md", "---\ntitle: [unclosed\n---\n");
        write(
            root,
            "content/projects/loom.mdx",
            "---\ntitle: Loom\ndate: 2023-05-01\nsummary: A loom\ntechStack: [Rust]\nfeatured: true\ngithubUrl: https://github.com/x/loom\n---\nBody\n",
        );
        write(root, "static/css/extra.css", "body{}");
        tmp
    }

    #[test]
    fn test_generate_site() {
        let tmp = site();
        let portfolio = Portfolio::new(tmp.path()).unwrap();
        let stats = Generator::new(&portfolio).generate().unwrap();

        assert_eq!(
            stats,
            GenerateStats {
                posts: 2,
                projects: 1,
                skipped: 0
            }
        );

        let public = tmp.path().join("public");
        for page in [
            "index.html",
            "404.html",
            "search.json",
            "blog/index.html",
            "blog/first/index.html",
            "blog/second/index.html",
            "projects/index.html",
            "projects/loom/index.html",
            "css/extra.css",
        ] {
            assert!(public.join(page).exists(), "missing {}", page);
        }
        assert!(!public.join("blog/broken").exists());
    }

    #[test]
    fn test_post_page_contents() {
        let tmp = site();
        let portfolio = Portfolio::new(tmp.path()).unwrap();
        Generator::new(&portfolio).generate().unwrap();

        let first = fs::read_to_string(tmp.path().join("public/blog/first/index.html")).unwrap();
        assert!(first.contains(r#"<h1 id="intro">Intro</h1>"#));
        assert!(first.contains(r##"href="#intro""##));
        assert!(first.contains("Related posts"));
        assert!(first.contains(r#"<a class="prev" href="/blog/second/">"#));

        let second = fs::read_to_string(tmp.path().join("public/blog/second/index.html")).unwrap();
        assert!(second.contains("callout-tip"));
    }

    #[test]
    fn test_search_index() {
        let tmp = site();
        let portfolio = Portfolio::new(tmp.path()).unwrap();
        Generator::new(&portfolio).generate().unwrap();

        let json = fs::read_to_string(tmp.path().join("public/search.json")).unwrap();
        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["title"], "Second");
        assert_eq!(entries[0]["url"], "/blog/second/");
        assert_eq!(entries[2]["kind"], "project");
        assert_eq!(entries[2]["techStack"][0], "Rust");
    }

    #[test]
    fn test_empty_site() {
        let tmp = TempDir::new().unwrap();
        let portfolio = Portfolio::new(tmp.path()).unwrap();
        let stats = Generator::new(&portfolio).generate().unwrap();
        assert_eq!(stats, GenerateStats::default());
        assert!(tmp.path().join("public/index.html").exists());
    }
}
