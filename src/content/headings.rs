//! Table-of-contents extraction from body text

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref HEADING_RE: Regex =
        Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").unwrap();
    static ref FENCE_RE: Regex = Regex::new(r"^ {0,3}(`{3,}|~{3,})").unwrap();
    static ref LINK_RE: Regex = Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap();
    static ref ATTRS_RE: Regex = Regex::new(r"[ \t]*\{([^{}]*)\}$").unwrap();
    static ref ENTITY_RE: Regex =
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]+);").unwrap();
}

/// One entry of a flat table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Scan `#`-style heading lines in document order.
///
/// Lines inside fenced code blocks are skipped. A trailing `{#id}` sets
/// the id, as it does when rendering. Nesting is left to the consumer,
/// which can indent by `level`.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    let mut ids = HeadingIds::default();
    let mut headings = Vec::new();
    let mut fence: Option<(char, usize)> = None;

    for line in body.lines() {
        let line = line.trim_end();

        if let Some(caps) = FENCE_RE.captures(line) {
            let marker = &caps[1];
            let ch = marker.chars().next().unwrap_or('`');
            match fence {
                None => fence = Some((ch, marker.len())),
                Some((open, len)) if open == ch && marker.len() >= len => fence = None,
                Some(_) => {}
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            let (raw, explicit) = split_attributes(&caps[2]);
            let text = strip_inline_markup(raw);
            if text.is_empty() {
                continue;
            }
            let id = match explicit {
                Some(id) => {
                    ids.reserve(&id);
                    id
                }
                None => ids.assign(&text),
            };
            headings.push(Heading {
                id,
                level: caps[1].len() as u8,
                text,
            });
        }
    }

    headings
}

/// Lowercase, strip punctuation, join words with single hyphens
pub fn slugify_heading(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_hyphen = true;
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        }
    }

    slug
}

/// Assigns unique anchor ids, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct HeadingIds {
    used: HashSet<String>,
    counts: HashMap<String, usize>,
}

impl HeadingIds {
    pub fn assign(&mut self, text: &str) -> String {
        let mut base = slugify_heading(text);
        if base.is_empty() {
            base = "section".to_string();
        }

        let count = self.counts.entry(base.clone()).or_insert(0);
        let mut id = base.clone();
        while self.used.contains(&id) {
            *count += 1;
            id = format!("{}-{}", base, count);
        }

        self.used.insert(id.clone());
        id
    }

    /// Mark an explicitly chosen id as taken
    pub fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }
}

/// Split a trailing `{#id .class}` block off heading text
fn split_attributes(text: &str) -> (&str, Option<String>) {
    let Some(caps) = ATTRS_RE.captures(text) else {
        return (text, None);
    };
    let id = caps[1]
        .split_whitespace()
        .filter_map(|token| token.strip_prefix('#'))
        .filter(|id| !id.is_empty())
        .last()
        .map(str::to_string);
    let end = caps.get(0).map_or(text.len(), |m| m.start());
    (text[..end].trim_end(), id)
}

/// Reduce links to their text, drop emphasis/code markers, decode entities
fn strip_inline_markup(text: &str) -> String {
    let text = LINK_RE.replace_all(text, "$1");
    let chars: Vec<char> = text.chars().collect();

    let mut plain = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '*' | '`' => {}
            // `_` only delimits emphasis at a word boundary
            '_' => {
                let before = chars[..i].iter().rev().find(|c| **c != '_');
                let after = chars[i + 1..].iter().find(|c| **c != '_');
                if before.is_some_and(|c| c.is_alphanumeric())
                    && after.is_some_and(|c| c.is_alphanumeric())
                {
                    plain.push(c);
                }
            }
            c => plain.push(c),
        }
    }

    decode_entities(plain.trim())
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(level: u8, text: &str, id: &str) -> Heading {
        Heading {
            id: id.to_string(),
            text: text.to_string(),
            level,
        }
    }

    #[test]
    fn test_flat_outline_in_order() {
        assert_eq!(
            extract_headings("# A\n## B\ntext\n### C"),
            vec![h(1, "A", "a"), h(2, "B", "b"), h(3, "C", "c")]
        );
    }

    #[test]
    fn test_ids_are_slugified() {
        let headings = extract_headings("## Hello, World!\n#### Why Rust? (Part 2)");
        assert_eq!(headings[0].id, "hello-world");
        assert_eq!(headings[0].text, "Hello, World!");
        assert_eq!(headings[1].id, "why-rust-part-2");
        assert_eq!(headings[1].level, 4);
    }

    #[test]
    fn test_non_headings_are_ignored() {
        let body = "#hashtag\n    # indented code\n####### seven\nplain # text\n#\n";
        assert!(extract_headings(body).is_empty());
    }

    #[test]
    fn test_fenced_code_is_skipped() {
        let body = "# Setup\n```bash\n# install deps\n~~~\n# still code\n```\n## Usage\n~~~~\n# tilde fence\n~~~~\n";
        let headings = extract_headings(body);
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Setup", "Usage"]);
    }

    #[test]
    fn test_closing_hashes_and_markup() {
        let headings = extract_headings(
            "## Closing ##\n## The `async` **story**\n## See [the docs](https://docs.rs)\n## C#",
        );
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Closing", "The async story", "See the docs", "C#"]);
        assert_eq!(headings[3].id, "c");
    }

    #[test]
    fn test_repeated_headings_get_suffixes() {
        let headings = extract_headings("## Example\n## Example\n## Example-1\n## Example");
        let ids: Vec<_> = headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["example", "example-1", "example-1-1", "example-2"]);
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(
            extract_headings("# Title\r\nbody\r\n"),
            vec![h(1, "Title", "title")]
        );
    }

    #[test]
    fn test_explicit_ids_are_kept_and_reserved() {
        let headings = extract_headings("## Custom {#here}\n## One\n## Two {#one-1 .wide}\n## One");
        assert_eq!(headings[0], h(2, "Custom", "here"));
        let ids: Vec<_> = headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["here", "one", "one-1", "one-2"]);
        assert_eq!(headings[2].text, "Two");
    }

    #[test]
    fn test_underscore_emphasis_and_entities() {
        let headings = extract_headings("## _Why_ Rust\n## Tom &amp; Jerry\n## snake_case __bold__");
        assert_eq!(headings[0], h(2, "Why Rust", "why-rust"));
        assert_eq!(headings[1], h(2, "Tom & Jerry", "tom-jerry"));
        assert_eq!(headings[2], h(2, "snake_case bold", "snake_case-bold"));
        assert_eq!(decode_entities("&#65;&#x42; &bogus;"), "AB &bogus;");
    }

    #[test]
    fn test_slugify_heading() {
        assert_eq!(slugify_heading("  A  &  B "), "a-b");
        assert_eq!(slugify_heading("snake_case and-kebab"), "snake_case-and-kebab");
        assert_eq!(slugify_heading("Ünïcödé Tëxt"), "ünïcödé-tëxt");
        assert_eq!(slugify_heading("!!!"), "");
    }
}
