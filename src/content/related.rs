//! Related-content suggestions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ContentItem;

/// Weights of the related-post score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedWeights {
    /// Points per tag shared with the target
    pub tag: usize,
    /// Points when the category equals the target's
    pub category: usize,
}

impl Default for RelatedWeights {
    fn default() -> Self {
        Self {
            tag: 2,
            category: 3,
        }
    }
}

/// Score `candidate` against `target`
pub fn related_score(
    target: &ContentItem,
    candidate: &ContentItem,
    weights: &RelatedWeights,
) -> usize {
    let target_tags: HashSet<&str> = target.tags.iter().map(String::as_str).collect();
    let shared = candidate
        .tags
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&target_tags)
        .count();

    let same_category = match (target.category(), candidate.category()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    weights.tag * shared + if same_category { weights.category } else { 0 }
}

/// Rank the posts of `pool` by how much they share with `target`.
///
/// The target itself (matched by id) and non-post items are never returned.
/// Ties are broken by date, newest first. At most `limit` items come back;
/// a smaller pool just yields fewer.
pub fn related_items<'a>(
    target: &ContentItem,
    pool: &'a [ContentItem],
    limit: usize,
    weights: &RelatedWeights,
) -> Vec<&'a ContentItem> {
    if target.as_post().is_none() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &ContentItem)> = pool
        .iter()
        .filter(|candidate| candidate.as_post().is_some() && candidate.id != target.id)
        .map(|candidate| (related_score(target, candidate, weights), candidate))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.date.cmp(&a.1.date)));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, item)| item)
        .collect()
}

/// The first `limit` items of an ordered collection other than `target`
pub fn other_items<'a>(
    target: &ContentItem,
    collection: &'a [ContentItem],
    limit: usize,
) -> Vec<&'a ContentItem> {
    collection
        .iter()
        .filter(|item| item.id != target.id)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::item::fixtures::{post, project};

    fn slugs(items: &[&ContentItem]) -> Vec<String> {
        items.iter().map(|i| i.slug.clone()).collect()
    }

    #[test]
    fn test_score_weights() {
        let target = post("t", "2024-01-01", &["rust", "web", "cli"], Some("Eng"));
        let close = post("close", "2024-01-01", &["rust", "web"], Some("Eng"));
        let far = post("far", "2024-01-01", &["cooking"], Some("Life"));
        let w = RelatedWeights::default();

        assert_eq!(related_score(&target, &close, &w), 7);
        assert_eq!(related_score(&target, &far, &w), 0);

        let custom = RelatedWeights { tag: 1, category: 10 };
        assert_eq!(related_score(&target, &close, &custom), 12);
    }

    #[test]
    fn test_missing_categories_do_not_match() {
        let target = post("t", "2024-01-01", &[], None);
        let other = post("o", "2024-01-01", &[], None);
        assert_eq!(related_score(&target, &other, &RelatedWeights::default()), 0);
    }

    #[test]
    fn test_duplicate_tags_count_once() {
        let target = post("t", "2024-01-01", &["a"], None);
        let other = post("o", "2024-01-01", &["a", "a"], None);
        assert_eq!(related_score(&target, &other, &RelatedWeights::default()), 2);
    }

    #[test]
    fn test_ranking_excludes_target() {
        let target = post("t", "2024-01-01", &["rust", "web"], Some("Eng"));
        let pool = vec![
            post("unrelated", "2024-05-01", &["baking"], Some("Life")),
            target.clone(),
            post("close", "2023-01-01", &["rust", "web"], Some("Eng")),
            post("partial", "2022-01-01", &["rust"], None),
        ];

        let related = related_items(&target, &pool, 3, &RelatedWeights::default());
        assert_eq!(slugs(&related), vec!["close", "partial", "unrelated"]);
        assert!(related.iter().all(|i| i.id != target.id));
    }

    #[test]
    fn test_ties_broken_by_date() {
        let target = post("t", "2024-01-01", &["rust"], None);
        let pool = vec![
            post("older", "2021-01-01", &["rust"], None),
            post("newer", "2023-01-01", &["rust"], None),
            post("newest-unrelated", "2024-06-01", &[], None),
        ];

        let related = related_items(&target, &pool, 3, &RelatedWeights::default());
        assert_eq!(slugs(&related), vec!["newer", "older", "newest-unrelated"]);
    }

    #[test]
    fn test_limit_and_short_pool() {
        let target = post("t", "2024-01-01", &["x"], None);
        let pool: Vec<_> = (0..6)
            .map(|i| post(&format!("p{}", i), "2024-01-01", &["x"], None))
            .collect();

        let w = RelatedWeights::default();
        assert_eq!(related_items(&target, &pool, 3, &w).len(), 3);
        assert_eq!(related_items(&target, &pool[..2], 3, &w).len(), 2);
        assert!(related_items(&target, &pool, 0, &w).is_empty());
        assert!(related_items(&target, &[], 3, &w).is_empty());
    }

    #[test]
    fn test_projects_are_not_related() {
        let target = post("t", "2024-01-01", &[], None);
        let pool = vec![project("proj", "2024-01-01", true, &[])];
        assert!(related_items(&target, &pool, 3, &RelatedWeights::default()).is_empty());

        let as_target = project("proj", "2024-01-01", true, &[]);
        let posts = vec![post("p", "2024-01-01", &[], None)];
        assert!(related_items(&as_target, &posts, 3, &RelatedWeights::default()).is_empty());
    }

    #[test]
    fn test_other_items() {
        let projects = vec![
            project("a", "2024-01-01", true, &[]),
            project("b", "2023-01-01", true, &[]),
            project("c", "2022-01-01", false, &[]),
            project("d", "2021-01-01", false, &[]),
        ];
        let others = other_items(&projects[1], &projects, 2);
        assert_eq!(slugs(&others), vec!["a", "c"]);
    }
}
