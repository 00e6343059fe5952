//! Markdown rendering with syntax highlighting

use anyhow::Result;
use std::cell::RefCell;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::ComponentRegistry;
use crate::config::HighlightConfig;
use crate::content::{ContentItem, Heading, HeadingIds};
use crate::error::ContentError;
use crate::helpers::escape_html;

/// A rendered body together with its outline
#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::from_config(&HighlightConfig::default())
    }

    /// Create with the site's highlight settings
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    fn options() -> Options {
        // Front-matter is stripped before rendering, so no metadata blocks.
        // Smart punctuation stays off to keep heading ids in line with the outline.
        Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM
    }

    /// Render markdown to HTML
    ///
    /// Headings get `id` attributes from [`HeadingIds`], the assigner
    /// behind [`crate::content::extract_headings`]. An explicit `{#id}` wins.
    pub fn render(&self, markdown: &str) -> Result<String> {
        self.render_with(markdown, &ComponentRegistry::new())
    }

    /// Render markdown after expanding registered component tags
    pub fn render_with(&self, markdown: &str, components: &ComponentRegistry) -> Result<String> {
        Ok(self.render_document(markdown, components).html)
    }

    /// Render a fully loaded item's body
    ///
    /// The outline lists the headings exactly as written into the HTML,
    /// including those inside component children. Items taken from a
    /// collection listing have no body and are rejected.
    pub fn render_item(
        &self,
        item: &ContentItem,
        components: &ComponentRegistry,
    ) -> Result<Rendered> {
        let source = item
            .body
            .source()
            .ok_or_else(|| ContentError::BodyElided(item.slug.clone()))?;

        Ok(self.render_document(source, components))
    }

    fn render_document(&self, markdown: &str, components: &ComponentRegistry) -> Rendered {
        // Component children render first, so one pass state spans both.
        let pass = RefCell::new(HeadingPass::default());
        let expanded = components.expand(markdown, &|inner| self.render_events(inner, &pass));
        let html = self.render_events(&expanded, &pass);

        let mut headings = pass.into_inner().headings;
        headings.sort_by_key(|heading| heading_offset(&html, heading));
        Rendered { html, headings }
    }

    fn render_events(&self, markdown: &str, pass: &RefCell<HeadingPass>) -> String {
        let parser = Parser::new_ext(markdown, Self::options());

        let mut events: Vec<Event> = Vec::new();

        let mut code_block: Option<Option<String>> = None;
        let mut code_content = String::new();

        let mut heading: Option<Vec<Event>> = None;
        let mut heading_text = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(lang);
                    code_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    let highlighted = self.highlight_code(&code_content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if code_block.is_some() => {
                    code_content.push_str(&text);
                }
                Event::Start(Tag::Heading { .. }) => {
                    heading_text.clear();
                    heading = Some(vec![event]);
                }
                Event::End(TagEnd::Heading(_)) if heading.is_some() => {
                    let mut buffered = heading.take().unwrap_or_default();
                    if let Some(Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    })) = buffered.first().cloned()
                    {
                        let id = pass.borrow_mut().record(
                            level as u8,
                            heading_text.trim(),
                            id.as_deref(),
                        );
                        buffered[0] = Event::Start(Tag::Heading {
                            level,
                            id: Some(CowStr::from(id)),
                            classes,
                            attrs,
                        });
                    }
                    events.extend(buffered);
                    events.push(event);
                }
                event => {
                    if let Some(buffered) = heading.as_mut() {
                        if let Event::Text(text) | Event::Code(text) = &event {
                            heading_text.push_str(text);
                        }
                        buffered.push(event);
                    } else {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            )
        };

        if !self.highlight {
            return plain();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());
        let Some(theme) = theme else {
            return plain();
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.line_numbers => {
                self.add_line_numbers(&highlighted, code.lines().count(), lang)
            }
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                escape_html(lang),
                highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain()
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, highlighted: &str, line_count: usize, lang: &str) -> String {
        let gutter = (1..=line_count)
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            escape_html(lang),
            gutter,
            highlighted
        )
    }
}

/// Heading ids handed out so far and the outline they form
#[derive(Default)]
struct HeadingPass {
    ids: HeadingIds,
    headings: Vec<Heading>,
}

impl HeadingPass {
    fn record(&mut self, level: u8, text: &str, explicit: Option<&str>) -> String {
        let id = match explicit {
            Some(id) => {
                self.ids.reserve(id);
                id.to_string()
            }
            None => self.ids.assign(text),
        };
        self.headings.push(Heading {
            id: id.clone(),
            text: text.to_string(),
            level,
        });
        id
    }
}

/// Where a recorded heading's opening tag sits in the final HTML
fn heading_offset(html: &str, heading: &Heading) -> usize {
    let tag = format!(r#"<h{} id="{}""#, heading.level, escape_html(&heading.id));
    html.find(&tag).unwrap_or(usize::MAX)
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}
