//! Create a new post or project

use anyhow::Result;
use indexmap::IndexMap;
use serde_yaml::Value;
use std::fs;
use std::path::PathBuf;

use crate::content::CollectionKind;
use crate::Portfolio;

/// Write a scaffold for a new item and return its path.
///
/// The file name is the slugified title unless `slug` is given. Existing
/// files are never overwritten.
pub fn create_item(
    portfolio: &Portfolio,
    kind: CollectionKind,
    title: &str,
    slug: Option<&str>,
) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = portfolio.collection_dir(kind);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.mdx", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, scaffold(kind, title)?)?;
    tracing::info!("Created {}: {:?}", kind.label(), file_path);

    Ok(file_path)
}

fn scaffold(kind: CollectionKind, title: &str) -> Result<String> {
    let now = chrono::Local::now();

    let mut fields: IndexMap<&str, Value> = IndexMap::new();
    fields.insert("title", Value::from(title));
    fields.insert("date", Value::from(now.format("%Y-%m-%d").to_string()));
    fields.insert("summary", Value::from(""));
    fields.insert("tags", Value::Sequence(Vec::new()));
    match kind {
        CollectionKind::Posts => {
            fields.insert("category", Value::Null);
        }
        CollectionKind::Projects => {
            fields.insert("techStack", Value::Sequence(Vec::new()));
            fields.insert("githubUrl", Value::Null);
            fields.insert("liveUrl", Value::Null);
            fields.insert("featured", Value::Bool(false));
        }
    }

    let yaml = serde_yaml::to_string(&fields)?;
    Ok(format!("---\n{}---\n\n", yaml))
}
