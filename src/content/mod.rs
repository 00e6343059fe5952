//! Content module - front-matter parsing, loading, indexing and suggestions

mod frontmatter;
pub mod headings;
pub(crate) mod item;
pub mod loader;
pub mod related;
pub mod taxonomy;

pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use headings::{extract_headings, slugify_heading, Heading, HeadingIds};
pub use item::{
    count_words, Body, CollectionKind, ContentItem, ItemKind, PostMeta, ProjectLinks,
    ProjectMeta, ReadingTime,
};
pub use loader::ContentLoader;
pub use related::{other_items, related_items, related_score, RelatedWeights};
pub use taxonomy::{
    aggregate, archive, filter, ArchiveMonth, ArchiveYear, Field, ItemFilter, TermCount,
};
