//! Show one item with its outline and suggestions

use anyhow::Result;
use std::fmt::Write;

use crate::content::{other_items, related_items, CollectionKind, ContentItem, ContentLoader};
use crate::helpers::{format_date, item_path, url_for};
use crate::render::{ComponentRegistry, MarkdownRenderer};
use crate::Portfolio;

/// Print the details of one item
pub fn run(portfolio: &Portfolio, kind: CollectionKind, slug: &str) -> Result<()> {
    print!("{}", describe(portfolio, kind, slug)?);
    Ok(())
}

/// Build the text `run` prints.
///
/// A slug without a backing file is an error.
pub fn describe(portfolio: &Portfolio, kind: CollectionKind, slug: &str) -> Result<String> {
    let config = &portfolio.config;
    let loader = ContentLoader::new(portfolio);
    let item = loader.load_item(kind, slug)?;
    let collection = loader.load_collection(kind)?;

    let mut out = String::new();
    writeln!(out, "{}", item.title)?;
    writeln!(out, "  slug:    {}", item.slug)?;
    writeln!(out, "  url:     {}", url_for(config, &item_path(config, kind, &item.slug)))?;
    writeln!(out, "  date:    {}", format_date(&item.date, &config.date_format))?;
    writeln!(out, "  summary: {}", item.summary)?;
    if !item.tags.is_empty() {
        writeln!(out, "  tags:    {}", item.tags.join(", "))?;
    }

    if let Some(post) = item.as_post() {
        if let Some(category) = &post.category {
            writeln!(out, "  category: {}", category)?;
        }
        writeln!(out, "  reading: {} ({} words)", post.reading_time, post.reading_time.words)?;
    }
    if let Some(project) = item.as_project() {
        if !project.tech_stack.is_empty() {
            writeln!(out, "  stack:   {}", project.tech_stack.join(", "))?;
        }
        if let Some(repo) = &project.links.repository {
            writeln!(out, "  source:  {}", repo)?;
        }
        if let Some(live) = &project.links.live {
            writeln!(out, "  live:    {}", live)?;
        }
        if project.featured {
            writeln!(out, "  featured")?;
        }
    }

    // Same outline the generated page links to
    let headings = MarkdownRenderer::from_config(&config.highlight)
        .render_item(&item, &ComponentRegistry::with_builtins())?
        .headings;
    if !headings.is_empty() {
        writeln!(out, "\nContents:")?;
        for heading in &headings {
            let indent = "  ".repeat(heading.level as usize);
            writeln!(out, "{}{} (#{})", indent, heading.text, heading.id)?;
        }
    }

    let (label, suggestions): (&str, Vec<&ContentItem>) = match kind {
        CollectionKind::Posts => (
            "Related posts",
            related_items(
                &item,
                &collection,
                config.related.limit,
                &config.related.weights(),
            ),
        ),
        CollectionKind::Projects => (
            "Other projects",
            other_items(&item, &collection, config.other_projects_limit),
        ),
    };
    if !suggestions.is_empty() {
        writeln!(out, "\n{}:", label)?;
        for other in suggestions {
            writeln!(out, "  {} [{}]", other.title, other.slug)?;
        }
    }

    Ok(out)
}
