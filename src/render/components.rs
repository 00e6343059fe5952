//! Custom markup components embedded in content bodies
//!
//! A body may contain capitalised tags such as `<Callout variant="tip">...</Callout>`
//! or `<ImageWithCaption src="..." caption="..." />`. Each tag name is looked
//! up in a [`ComponentRegistry`] at render time and replaced by the HTML its
//! component produces. Unregistered tags are left untouched.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::helpers::escape_html;

lazy_static! {
    static ref OPEN_TAG_RE: Regex = Regex::new(
        r#"<([A-Z][A-Za-z0-9]*)((?:\s+[A-Za-z_][\w-]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|\{[^}]*\}))?)*)\s*(/?)>"#
    )
    .unwrap();
    static ref ATTR_RE: Regex = Regex::new(
        r#"([A-Za-z_][\w-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|\{([^}]*)\}))?"#
    )
    .unwrap();
    static ref FENCE_RE: Regex = Regex::new(r"^ {0,3}(`{3,}|~{3,})").unwrap();
}

/// What a component receives when rendered
#[derive(Debug, Clone)]
pub struct ComponentProps<'a> {
    /// Attributes in source order; bare attributes map to `"true"`
    pub attrs: &'a IndexMap<String, String>,
    /// Children already rendered to HTML (empty for self-closing tags)
    pub children: &'a str,
}

impl ComponentProps<'_> {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Anything that can render itself from props
pub trait Component: Send + Sync {
    fn render(&self, props: &ComponentProps<'_>) -> String;
}

impl<F> Component for F
where
    F: Fn(&ComponentProps<'_>) -> String + Send + Sync,
{
    fn render(&self, props: &ComponentProps<'_>) -> String {
        self(props)
    }
}

/// Tag name → component lookup used while rendering bodies
#[derive(Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Box<dyn Component>>,
}

impl ComponentRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `Callout`, `ImageWithCaption` and `Carousel`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("Callout", callout)
            .register("ImageWithCaption", image_with_caption)
            .register("Carousel", carousel);
        registry
    }

    /// Register (or replace) the component for a tag name
    pub fn register<C: Component + 'static>(&mut self, name: &str, component: C) -> &mut Self {
        self.components.insert(name.to_string(), Box::new(component));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Component> {
        self.components.get(name).map(|c| c.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Replace registered component tags in `source` with their HTML.
    ///
    /// `render_children` turns the markup between an opening and closing tag
    /// into HTML before the component sees it. Fenced code blocks are left
    /// alone.
    pub fn expand(&self, source: &str, render_children: &dyn Fn(&str) -> String) -> String {
        if self.components.is_empty() {
            return source.to_string();
        }

        let mut output = String::with_capacity(source.len());
        for (is_code, segment) in fenced_segments(source) {
            if is_code {
                output.push_str(segment);
            } else {
                output.push_str(&self.expand_segment(segment, render_children));
            }
        }
        output
    }

    fn expand_segment(&self, source: &str, render_children: &dyn Fn(&str) -> String) -> String {
        let mut output = String::new();
        let mut rest = source;

        loop {
            let found = OPEN_TAG_RE
                .captures_iter(rest)
                .find(|caps| self.contains(&caps[1]));
            let Some(caps) = found else {
                output.push_str(rest);
                break;
            };

            let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            let name = caps[1].to_string();
            let attrs = parse_attrs(&caps[2]);
            let self_closing = &caps[3] == "/";

            output.push_str(&rest[..whole.0]);
            let after = &rest[whole.1..];

            let closing = format!("</{}>", name);
            let (inner, consumed) = match (self_closing, after.find(&closing)) {
                (false, Some(pos)) => (&after[..pos], pos + closing.len()),
                _ => ("", 0),
            };

            let children = if inner.trim().is_empty() {
                String::new()
            } else {
                render_children(inner.trim())
            };

            if let Some(component) = self.get(&name) {
                let html = component.render(&ComponentProps {
                    attrs: &attrs,
                    children: &children,
                });
                output.push_str("\n\n");
                output.push_str(&without_blank_lines(&html));
                output.push_str("\n\n");
            }

            rest = &after[consumed..];
        }

        output
    }
}

fn parse_attrs(source: &str) -> IndexMap<String, String> {
    ATTR_RE
        .captures_iter(source)
        .map(|caps: Captures| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| "true".to_string());
            (caps[1].to_string(), value)
        })
        .collect()
}

/// Split text into alternating prose and fenced-code segments
fn fenced_segments(source: &str) -> Vec<(bool, &str)> {
    let mut segments = Vec::new();
    let mut fence: Option<(char, usize)> = None;
    let mut start = 0;
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        if let Some(caps) = FENCE_RE.captures(line.trim_end()) {
            let marker = &caps[1];
            let ch = marker.chars().next().unwrap_or('`');
            match fence {
                None => {
                    if offset > start {
                        segments.push((false, &source[start..offset]));
                    }
                    start = offset;
                    fence = Some((ch, marker.len()));
                }
                Some((open, len)) if open == ch && marker.len() >= len => {
                    let end = offset + line.len();
                    segments.push((true, &source[start..end]));
                    start = end;
                    fence = None;
                }
                Some(_) => {}
            }
        }
        offset += line.len();
    }

    if start < source.len() {
        segments.push((fence.is_some(), &source[start..]));
    }
    segments
}

/// Markdown ends an HTML block at a blank line, so component output must not contain one
fn without_blank_lines(html: &str) -> String {
    html.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn callout(props: &ComponentProps<'_>) -> String {
    let (variant, icon) = match props.attr("variant").unwrap_or("info") {
        "warning" => ("warning", "⚠"),
        "tip" => ("tip", "💡"),
        _ => ("info", "ℹ"),
    };
    format!(
        r#"<aside class="callout callout-{}"><span class="callout-icon">{}</span><div class="callout-content">{}</div></aside>"#,
        variant, icon, props.children
    )
}

fn image_with_caption(props: &ComponentProps<'_>) -> String {
    let src = escape_html(props.attr("src").unwrap_or_default());
    let alt = escape_html(props.attr("alt").unwrap_or_default());
    let caption = props
        .attr("caption")
        .map(|c| format!("<figcaption>{}</figcaption>", escape_html(c)))
        .unwrap_or_default();
    format!(
        r#"<figure class="image-with-caption"><img src="{}" alt="{}" loading="lazy">{}</figure>"#,
        src, alt, caption
    )
}

fn carousel(props: &ComponentProps<'_>) -> String {
    let images: Vec<&str> = props
        .attr("images")
        .unwrap_or_default()
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|s| !s.is_empty())
        .collect();

    let slides: String = images
        .iter()
        .enumerate()
        .map(|(i, src)| {
            format!(
                r#"<div class="carousel-slide"><img src="{}" alt="Slide {}" loading="lazy"></div>"#,
                escape_html(src),
                i + 1
            )
        })
        .collect();

    format!(r#"<div class="carousel">{}</div>"#, slides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(s: &str) -> String {
        format!("<p>{}</p>", s)
    }

    #[test]
    fn test_self_closing_component() {
        let registry = ComponentRegistry::with_builtins();
        let out = registry.expand(
            r#"Before <ImageWithCaption src="/a.png" alt="A" caption="An A" /> after"#,
            &identity,
        );
        assert!(out.starts_with("Before \n\n<figure"));
        assert!(out.contains(r#"<img src="/a.png" alt="A" loading="lazy">"#));
        assert!(out.contains("<figcaption>An A</figcaption>"));
        assert!(out.ends_with("\n\n after"));
    }

    #[test]
    fn test_component_with_children() {
        let registry = ComponentRegistry::with_builtins();
        let out = registry.expand(
            "<Callout variant=\"warning\">\nMind the gap.\n</Callout>",
            &identity,
        );
        assert!(out.contains("callout-warning"));
        assert!(out.contains("<div class=\"callout-content\"><p>Mind the gap.</p></div>"));
        assert!(!out.contains("</Callout>"));
    }

    #[test]
    fn test_unknown_variant_falls_back_to_info() {
        let registry = ComponentRegistry::with_builtins();
        let out = registry.expand("<Callout variant=\"loud\">x</Callout>", &identity);
        assert!(out.contains("callout-info"));
    }

    #[test]
    fn test_unregistered_tags_are_kept() {
        let registry = ComponentRegistry::with_builtins();
        let src = "<Chart data={points} />\n<div>plain</div>";
        assert_eq!(registry.expand(src, &identity), src);
    }

    #[test]
    fn test_custom_component_and_jsx_attrs() {
        let mut registry = ComponentRegistry::new();
        registry.register("Badge", |props: &ComponentProps<'_>| {
            format!(
                "<span class=\"badge\">{}:{}</span>",
                props.attr("label").unwrap_or("?"),
                props.attr("pill").unwrap_or("false")
            )
        });

        let out = registry.expand("<Badge label={beta} pill />", &identity);
        assert!(out.contains("<span class=\"badge\">beta:true</span>"));
    }

    #[test]
    fn test_carousel_images() {
        let registry = ComponentRegistry::with_builtins();
        let out = registry.expand(r#"<Carousel images={["/1.png", "/2.png"]} />"#, &identity);
        assert!(out.contains(r#"<img src="/1.png" alt="Slide 1""#));
        assert!(out.contains(r#"<img src="/2.png" alt="Slide 2""#));
    }

    #[test]
    fn test_fenced_code_is_not_expanded() {
        let registry = ComponentRegistry::with_builtins();
        let src = "```jsx\n<Callout>literal</Callout>\n```\n<Callout>real</Callout>\n";
        let out = registry.expand(src, &identity);
        assert!(out.starts_with("```jsx\n<Callout>literal</Callout>\n```\n"));
        assert!(out.contains("<p>real</p>"));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let registry = ComponentRegistry::with_builtins();
        let out = registry.expand(r#"<ImageWithCaption src="/a.png" alt="a <b> & c" />"#, &identity);
        assert!(out.contains(r#"alt="a &lt;b&gt; &amp; c""#));
    }
}
