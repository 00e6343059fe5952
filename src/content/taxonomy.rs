//! Tag, category and archive indexes over a collection

use chrono::Datelike;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use super::ContentItem;

/// The item attribute to aggregate over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Tags,
    Category,
    TechStack,
}

impl Field {
    fn values<'a>(&self, item: &'a ContentItem) -> Vec<&'a str> {
        match self {
            Field::Tags => item.tags.iter().map(String::as_str).collect(),
            Field::Category => item.category().into_iter().collect(),
            Field::TechStack => item.tech_stack().iter().map(String::as_str).collect(),
        }
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag" | "tags" => Ok(Field::Tags),
            "category" | "categories" => Ok(Field::Category),
            "tech" | "techStack" | "tech-stack" => Ok(Field::TechStack),
            _ => anyhow::bail!("Unknown field: {}. Available: tags, category, tech", s),
        }
    }
}

/// A term and the number of items carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub name: String,
    pub count: usize,
}

/// Count how many items carry each value of `field`.
///
/// Most frequent first; equal counts keep the order in which the values
/// were first seen. A value repeated within one item counts once.
pub fn aggregate(pool: &[ContentItem], field: Field) -> Vec<TermCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();

    for item in pool {
        let mut seen = HashSet::new();
        for value in field.values(item) {
            if seen.insert(value) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
    }

    let mut terms: Vec<TermCount> = counts
        .into_iter()
        .map(|(name, count)| TermCount {
            name: name.to_string(),
            count,
        })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count));
    terms
}

/// Listing filters, all of which must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Case-insensitive substring of the title or summary
    pub search: Option<String>,
    /// Every one of these must be among the item's tags (or tech stack)
    pub tags: Vec<String>,
    pub category: Option<String>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.tags.is_empty()
            && self.category.is_none()
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !item.title.to_lowercase().contains(&term)
                && !item.summary.to_lowercase().contains(&term)
            {
                return false;
            }
        }

        let has = |tag: &String| item.tags.contains(tag) || item.tech_stack().contains(tag);
        if !self.tags.iter().all(has) {
            return false;
        }

        match &self.category {
            Some(category) => item.category() == Some(category.as_str()),
            None => true,
        }
    }
}

/// Items of `pool` accepted by `filter`, in pool order
pub fn filter<'a>(pool: &'a [ContentItem], filter: &ItemFilter) -> Vec<&'a ContentItem> {
    pool.iter().filter(|item| filter.matches(item)).collect()
}

/// Items published in one month
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveMonth<'a> {
    pub month: u32,
    pub items: Vec<&'a ContentItem>,
}

/// Months of one year that have items, newest first
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveYear<'a> {
    pub year: i32,
    pub months: Vec<ArchiveMonth<'a>>,
}

/// Group items into a year → month tree, newest first at every level
pub fn archive(pool: &[ContentItem]) -> Vec<ArchiveYear<'_>> {
    let mut by_month: BTreeMap<(i32, u32), Vec<&ContentItem>> = BTreeMap::new();
    for item in pool {
        by_month
            .entry((item.date.year(), item.date.month()))
            .or_default()
            .push(item);
    }

    let mut years: Vec<ArchiveYear> = Vec::new();
    for ((year, month), mut items) in by_month.into_iter().rev() {
        items.sort_by(|a, b| b.date.cmp(&a.date));
        let entry = ArchiveMonth { month, items };
        match years.last_mut() {
            Some(last) if last.year == year => last.months.push(entry),
            _ => years.push(ArchiveYear {
                year,
                months: vec![entry],
            }),
        }
    }

    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::item::fixtures::{post, project};

    fn counts(terms: &[TermCount]) -> Vec<(&str, usize)> {
        terms.iter().map(|t| (t.name.as_str(), t.count)).collect()
    }

    #[test]
    fn test_tag_counts_with_encounter_tiebreak() {
        let pool = vec![
            post("1", "2024-01-01", &["a", "b"], None),
            post("2", "2024-01-01", &["a"], None),
            post("3", "2024-01-01", &["b", "c"], None),
        ];
        assert_eq!(
            counts(&aggregate(&pool, Field::Tags)),
            vec![("a", 2), ("b", 2), ("c", 1)]
        );
    }

    #[test]
    fn test_higher_count_moves_ahead() {
        let pool = vec![
            post("1", "2024-01-01", &["early"], None),
            post("2", "2024-01-01", &["late"], None),
            post("3", "2024-01-01", &["late", "late"], None),
        ];
        assert_eq!(
            counts(&aggregate(&pool, Field::Tags)),
            vec![("late", 2), ("early", 1)]
        );
    }

    #[test]
    fn test_category_and_tech_counts() {
        let posts = vec![
            post("1", "2024-01-01", &[], Some("Eng")),
            post("2", "2024-01-01", &[], None),
            post("3", "2024-01-01", &[], Some("Life")),
            post("4", "2024-01-01", &[], Some("Eng")),
        ];
        assert_eq!(
            counts(&aggregate(&posts, Field::Category)),
            vec![("Eng", 2), ("Life", 1)]
        );

        let projects = vec![
            project("a", "2024-01-01", false, &["Rust", "React"]),
            project("b", "2024-01-01", false, &["Rust"]),
        ];
        assert_eq!(
            counts(&aggregate(&projects, Field::TechStack)),
            vec![("Rust", 2), ("React", 1)]
        );
        assert!(aggregate(&[], Field::Tags).is_empty());
    }

    #[test]
    fn test_filter() {
        let mut first = post("1", "2024-01-01", &["rust", "cli"], Some("Eng"));
        first.title = "Writing a CLI".to_string();
        let mut second = post("2", "2024-01-01", &["rust"], Some("Life"));
        second.summary = "Notes on cli ergonomics".to_string();
        let pool = vec![first, second];

        let by_search = ItemFilter {
            search: Some("CLI".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&pool, &by_search).len(), 2);

        let by_tags = ItemFilter {
            tags: vec!["rust".to_string(), "cli".to_string()],
            ..Default::default()
        };
        assert_eq!(filter(&pool, &by_tags)[0].slug, "1");
        assert_eq!(filter(&pool, &by_tags).len(), 1);

        let by_category = ItemFilter {
            category: Some("Life".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&pool, &by_category)[0].slug, "2");

        assert!(ItemFilter::default().is_empty());
        assert_eq!(filter(&pool, &ItemFilter::default()).len(), 2);
    }

    #[test]
    fn test_archive_tree() {
        let pool = vec![
            post("a", "2024-03-10", &[], None),
            post("b", "2023-12-01", &[], None),
            post("c", "2024-03-20", &[], None),
            post("d", "2024-01-05", &[], None),
        ];

        let tree = archive(&pool);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].year, 2024);
        assert_eq!(tree[0].months.len(), 2);
        assert_eq!(tree[0].months[0].month, 3);
        let march: Vec<_> = tree[0].months[0].items.iter().map(|i| &i.slug).collect();
        assert_eq!(march, vec!["c", "a"]);
        assert_eq!(tree[0].months[1].month, 1);
        assert_eq!(tree[1].year, 2023);
        assert_eq!(tree[1].months[0].items[0].slug, "b");
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("tags".parse::<Field>().unwrap(), Field::Tags);
        assert_eq!("categories".parse::<Field>().unwrap(), Field::Category);
        assert_eq!("tech".parse::<Field>().unwrap(), Field::TechStack);
        assert!("authors".parse::<Field>().is_err());
    }
}
