//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::{aggregate, filter, CollectionKind, ContentLoader, Field, ItemFilter};
use crate::Portfolio;

/// Print a listing of `content_type`
pub fn run(portfolio: &Portfolio, content_type: &str, item_filter: &ItemFilter) -> Result<()> {
    print!("{}", listing(portfolio, content_type, item_filter)?);
    Ok(())
}

/// Build the text `run` prints
pub fn listing(
    portfolio: &Portfolio,
    content_type: &str,
    item_filter: &ItemFilter,
) -> Result<String> {
    let loader = ContentLoader::new(portfolio);
    let mut out = String::new();

    match content_type {
        "post" | "posts" | "project" | "projects" => {
            let kind: CollectionKind = content_type.parse()?;
            let items = loader.load_collection(kind)?;
            let shown = filter(&items, item_filter);

            writeln!(out, "{}s ({}):", capitalize(kind.label()), shown.len())?;
            for item in shown {
                let marker = if item.is_featured() { " *" } else { "" };
                writeln!(
                    out,
                    "  {} - {}{} [{}]",
                    item.date.format("%Y-%m-%d"),
                    item.title,
                    marker,
                    item.slug
                )?;
            }
        }
        "tag" | "tags" | "category" | "categories" | "tech" => {
            let field: Field = content_type.parse()?;
            let pool = match field {
                Field::TechStack => loader.load_projects()?,
                _ => loader.load_posts()?,
            };
            let terms = aggregate(&pool, field);

            let heading = match field {
                Field::Tags => "Tags",
                Field::Category => "Categories",
                Field::TechStack => "Tech",
            };
            writeln!(out, "{} ({}):", heading, terms.len())?;
            for term in terms {
                writeln!(out, "  {} ({})", term.name, term.count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, projects, tags, categories, tech",
                content_type
            );
        }
    }

    Ok(out)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, Portfolio) {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("content/blog");
        let projects = tmp.path().join("content/projects");
        fs::create_dir_all(&blog).unwrap();
        fs::create_dir_all(&projects).unwrap();
        fs::write(
            blog.join("a.md"),
            "---\ntitle: Alpha\ndate: 2024-01-01\nsummary: s\ntags: [rust, web]\ncategory: eng\n---\n",
        )
        .unwrap();
        fs::write(
            blog.join("b.md"),
            "---\ntitle: Beta\ndate: 2024-02-01\nsummary: s\ntags: [rust]\n---\n",
        )
        .unwrap();
        fs::write(
            projects.join("p.md"),
            "---\ntitle: Proj\ndate: 2023-01-01\nsummary: s\ntechStack: [Rust, Axum]\nfeatured: true\n---\n",
        )
        .unwrap();
        let portfolio = Portfolio::new(tmp.path()).unwrap();
        (tmp, portfolio)
    }

    #[test]
    fn test_list_posts_with_filter() {
        let (_tmp, portfolio) = site();
        let all = listing(&portfolio, "posts", &ItemFilter::default()).unwrap();
        assert_eq!(
            all,
            "Posts (2):\n  2024-02-01 - Beta [b]\n  2024-01-01 - Alpha [a]\n"
        );

        let web = ItemFilter {
            tags: vec!["web".to_string()],
            ..ItemFilter::default()
        };
        let out = listing(&portfolio, "posts", &web).unwrap();
        assert!(out.starts_with("Posts (1):"));
        assert!(out.contains("Alpha"));
    }

    #[test]
    fn test_list_projects_marks_featured() {
        let (_tmp, portfolio) = site();
        let out = listing(&portfolio, "projects", &ItemFilter::default()).unwrap();
        assert!(out.contains("2023-01-01 - Proj * [p]"));
    }

    #[test]
    fn test_list_terms() {
        let (_tmp, portfolio) = site();
        let tags = listing(&portfolio, "tags", &ItemFilter::default()).unwrap();
        assert_eq!(tags, "Tags (2):\n  rust (2)\n  web (1)\n");

        let tech = listing(&portfolio, "tech", &ItemFilter::default()).unwrap();
        assert!(tech.contains("Axum (1)"));
    }

    #[test]
    fn test_unknown_type() {
        let (_tmp, portfolio) = site();
        assert!(listing(&portfolio, "drafts", &ItemFilter::default()).is_err());
    }
}
