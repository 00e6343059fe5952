//! Content item models shared by blog posts and projects

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// The two content classes of a portfolio site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Posts,
    Projects,
}

impl CollectionKind {
    /// Singular label used in messages and scaffolds
    pub fn label(&self) -> &'static str {
        match self {
            CollectionKind::Posts => "post",
            CollectionKind::Projects => "project",
        }
    }
}

impl FromStr for CollectionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" | "posts" | "blog" => Ok(CollectionKind::Posts),
            "project" | "projects" => Ok(CollectionKind::Projects),
            _ => anyhow::bail!("Unknown content type: {}. Available: post, project", s),
        }
    }
}

/// Item body text.
///
/// Only single-item fetches carry the source; collection listings replace it
/// with `Elided` so nothing downstream can render it by accident.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Source(String),
    Elided,
}

impl Body {
    pub fn source(&self) -> Option<&str> {
        match self {
            Body::Source(text) => Some(text),
            Body::Elided => None,
        }
    }

    pub fn is_elided(&self) -> bool {
        matches!(self, Body::Elided)
    }
}

impl Serialize for Body {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.source().unwrap_or(""))
    }
}

/// Estimated reading time of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingTime {
    pub words: usize,
    pub minutes: usize,
}

impl ReadingTime {
    /// `ceil(words / words_per_minute)`
    pub fn estimate(text: &str, words_per_minute: usize) -> Self {
        let words = count_words(text);
        Self {
            words,
            minutes: words.div_ceil(words_per_minute.max(1)),
        }
    }
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

/// Count words, treating each CJK ideograph as one word
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if ('\u{4E00}'..='\u{9FFF}').contains(&c) {
            count += 1;
            in_word = false;
        } else if c.is_alphanumeric() || (in_word && (c == '\'' || c == '-')) {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else {
            in_word = false;
        }
    }

    count
}

/// Attributes only blog posts have
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMeta {
    pub category: Option<String>,
    pub reading_time: ReadingTime,
}

/// Links shown on a project page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectLinks {
    pub repository: Option<String>,
    pub live: Option<String>,
}

/// Attributes only projects have
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMeta {
    pub tech_stack: Vec<String>,
    pub links: ProjectLinks,
    pub featured: bool,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemKind {
    Post(PostMeta),
    Project(ProjectMeta),
}

/// A blog post or project loaded from a content file
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    /// Stable identifier, the slug unless the front-matter names one
    pub id: String,

    /// File stem, unique within its collection
    pub slug: String,

    pub title: String,

    pub summary: String,

    /// Date used for ordering
    pub date: NaiveDateTime,

    /// Date as written in the front-matter
    pub date_string: String,

    /// Tags in the order they were written
    pub tags: Vec<String>,

    pub body: Body,

    /// Full source file path
    pub source: PathBuf,

    #[serde(flatten)]
    pub kind: ItemKind,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl ContentItem {
    pub fn collection(&self) -> CollectionKind {
        match self.kind {
            ItemKind::Post(_) => CollectionKind::Posts,
            ItemKind::Project(_) => CollectionKind::Projects,
        }
    }

    pub fn as_post(&self) -> Option<&PostMeta> {
        match &self.kind {
            ItemKind::Post(meta) => Some(meta),
            ItemKind::Project(_) => None,
        }
    }

    pub fn as_project(&self) -> Option<&ProjectMeta> {
        match &self.kind {
            ItemKind::Project(meta) => Some(meta),
            ItemKind::Post(_) => None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.as_post().and_then(|meta| meta.category.as_deref())
    }

    pub fn is_featured(&self) -> bool {
        self.as_project().map(|meta| meta.featured).unwrap_or(false)
    }

    pub fn tech_stack(&self) -> &[String] {
        self.as_project()
            .map(|meta| meta.tech_stack.as_slice())
            .unwrap_or(&[])
    }

    pub fn reading_time(&self) -> Option<ReadingTime> {
        self.as_post().map(|meta| meta.reading_time)
    }

    /// Copy of this item for listing views, without its body
    pub fn elided(&self) -> Self {
        Self {
            body: Body::Elided,
            ..self.clone()
        }
    }

    /// Get the previous (newer) item in an ordered list
    pub fn prev<'a>(&self, items: &'a [ContentItem]) -> Option<&'a ContentItem> {
        let pos = items.iter().position(|i| i.slug == self.slug)?;
        if pos > 0 {
            Some(&items[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) item in an ordered list
    pub fn next<'a>(&self, items: &'a [ContentItem]) -> Option<&'a ContentItem> {
        let pos = items.iter().position(|i| i.slug == self.slug)?;
        items.get(pos + 1)
    }
}
