//! Built-in page templates
//!
//! Every page is assembled from plain `format!` fragments around a shared
//! layout. Text from content files is escaped here; rendered bodies are
//! inserted as-is.

use crate::config::SiteConfig;
use crate::content::{ArchiveYear, CollectionKind, ContentItem, Heading, TermCount};
use crate::context::SiteContext;
use crate::helpers::{
    category_filter_path, collection_path, escape_html, full_url_for, image_tag, item_path,
    link_to, meta_generator, month_name, open_graph, tag_filter_path, time_tag, truncate,
    url_for,
};
use crate::render::Rendered;

const STYLE: &str = include_str!("style.css");

/// Head metadata of one page
#[derive(Debug, Clone, Default)]
pub struct PageMeta<'a> {
    /// Page title; the site title is used alone when empty
    pub title: &'a str,
    pub description: &'a str,
    /// Site-relative path of the page
    pub path: &'a str,
    pub image: Option<&'a str>,
    pub article: bool,
}

/// Wrap page content in the document shell
pub fn layout(ctx: &SiteContext, meta: &PageMeta<'_>, content: &str) -> String {
    let config = &ctx.config;
    let title = if meta.title.is_empty() {
        escape_html(&config.title)
    } else {
        format!("{} | {}", escape_html(meta.title), escape_html(&config.title))
    };
    let description = if meta.description.is_empty() {
        truncate(&config.description, 160, None)
    } else {
        truncate(meta.description, 160, None)
    };
    let image = meta.image.map(|img| full_url_for(config, img));

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" data-theme="{theme}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
{og}
{generator}
<style>{style}</style>
</head>
<body>
{header}
<main class="container">
{content}
</main>
<footer class="site-footer">&copy; {author}</footer>
</body>
</html>
"#,
        lang = escape_html(&config.language),
        theme = escape_html(ctx.theme()),
        title = title,
        description = escape_html(&description),
        og = open_graph(
            meta.title,
            &description,
            &full_url_for(config, meta.path),
            image.as_deref(),
            &config.title,
            if meta.article { "article" } else { "website" },
        ),
        generator = meta_generator(),
        style = STYLE,
        header = header(ctx),
        content = content,
        author = escape_html(&config.author),
    )
}

fn header(ctx: &SiteContext) -> String {
    let nav = &ctx.navigation;
    let items: String = nav
        .menu
        .iter()
        .map(|item| {
            let class = if nav.is_active(&item.path) {
                r#" class="active""#
            } else {
                ""
            };
            format!(
                r#"<li{}><a href="{}">{}</a></li>"#,
                class,
                escape_html(&url_for(&ctx.config, &item.path)),
                escape_html(&item.name)
            )
        })
        .collect();

    format!(
        r#"<header class="site-header"><a class="brand" href="{}">{}</a><nav><ul>{}</ul></nav></header>"#,
        escape_html(&url_for(&ctx.config, "/")),
        escape_html(&ctx.config.title),
        items
    )
}

/// Landing page: intro, latest posts and featured projects
pub fn home(ctx: &SiteContext, posts: &[ContentItem], projects: &[ContentItem]) -> String {
    let config = &ctx.config;
    let recent: String = posts
        .iter()
        .take(config.recent_posts_limit)
        .map(|post| item_card(ctx, post))
        .collect();
    let featured: String = projects
        .iter()
        .filter(|p| p.is_featured())
        .map(|project| item_card(ctx, project))
        .collect();

    let content = format!(
        r#"<section class="hero"><h1>{}</h1><p>{}</p></section>
<section><h2>Recent posts</h2><div class="cards">{}</div>{}</section>
<section><h2>Featured projects</h2><div class="cards">{}</div>{}</section>"#,
        escape_html(&config.title),
        escape_html(&config.subtitle),
        recent,
        link_to(
            config,
            &collection_path(config, CollectionKind::Posts),
            "All posts",
            false
        ),
        featured,
        link_to(
            config,
            &collection_path(config, CollectionKind::Projects),
            "All projects",
            false
        ),
    );

    layout(ctx, &PageMeta::default(), &content)
}

/// Blog index with its tag cloud, categories and archive
pub fn blog_index(
    ctx: &SiteContext,
    posts: &[ContentItem],
    tags: &[TermCount],
    categories: &[TermCount],
    archive: &[ArchiveYear<'_>],
) -> String {
    let config = &ctx.config;
    let cards: String = posts.iter().map(|post| item_card(ctx, post)).collect();

    let term_list = |terms: &[TermCount], path: fn(&SiteConfig, &str) -> String| {
        terms
            .iter()
            .map(|t| {
                format!(
                    r#"<li><a href="{}">{}</a> <span class="count">{}</span></li>"#,
                    escape_html(&url_for(config, &path(config, &t.name))),
                    escape_html(&t.name),
                    t.count
                )
            })
            .collect::<String>()
    };

    let years: String = archive
        .iter()
        .map(|year| {
            let months: String = year
                .months
                .iter()
                .map(|month| {
                    let links: String = month
                        .items
                        .iter()
                        .map(|item| format!("<li>{}</li>", item_link(ctx, item)))
                        .collect();
                    format!(
                        "<h4>{}</h4><ul>{}</ul>",
                        month_name(month.month),
                        links
                    )
                })
                .collect();
            format!("<h3>{}</h3>{}", year.year, months)
        })
        .collect();

    let content = format!(
        r#"<h1>Blog</h1>
<div class="cards">{}</div>
<aside class="sidebar">
<h2>Tags</h2><ul class="terms">{}</ul>
<h2>Categories</h2><ul class="terms">{}</ul>
<h2>Archive</h2><div class="archive">{}</div>
</aside>"#,
        cards,
        term_list(tags, tag_filter_path),
        term_list(categories, category_filter_path),
        years
    );

    let path = collection_path(config, CollectionKind::Posts);
    layout(
        ctx,
        &PageMeta {
            title: "Blog",
            path: &path,
            ..PageMeta::default()
        },
        &content,
    )
}

/// One blog post with its outline, related posts and neighbours
pub fn post_page(
    ctx: &SiteContext,
    post: &ContentItem,
    rendered: &Rendered,
    related: &[&ContentItem],
    prev: Option<&ContentItem>,
    next: Option<&ContentItem>,
) -> String {
    let config = &ctx.config;
    let mut info = vec![time_tag(&post.date, &config.date_format)];
    if let Some(reading_time) = post.reading_time() {
        info.push(reading_time.to_string());
    }
    if let Some(category) = post.category() {
        info.push(link_to(
            config,
            &category_filter_path(config, category),
            &escape_html(category),
            false,
        ));
    }

    let related_html = if related.is_empty() {
        String::new()
    } else {
        let cards: String = related.iter().map(|item| item_card(ctx, item)).collect();
        format!(
            r#"<section class="related"><h2>Related posts</h2><div class="cards">{}</div></section>"#,
            cards
        )
    };

    let pager = |item: Option<&ContentItem>, class: &str, label: &str| {
        item.map(|item| {
            format!(
                r#"<a class="{}" href="{}"><span>{}</span> {}</a>"#,
                class,
                escape_html(&url_for(config, &item_path(config, item.collection(), &item.slug))),
                label,
                escape_html(&item.title)
            )
        })
        .unwrap_or_default()
    };

    let content = format!(
        r#"<article class="post">
<header><h1>{title}</h1><p class="post-info">{info}</p>{tags}</header>
{toc}
<div class="post-body">{body}</div>
</article>
{related}
<nav class="pager">{prev}{next}</nav>"#,
        title = escape_html(&post.title),
        info = info.join(" · "),
        tags = tag_list(ctx, &post.tags),
        toc = toc(&rendered.headings),
        body = rendered.html,
        related = related_html,
        prev = pager(prev, "prev", "Newer"),
        next = pager(next, "next", "Older"),
    );

    let path = item_path(config, CollectionKind::Posts, &post.slug);
    layout(
        ctx,
        &PageMeta {
            title: &post.title,
            description: &post.summary,
            path: &path,
            image: None,
            article: true,
        },
        &content,
    )
}

/// Project index: featured first, then the rest, with a tech filter list
pub fn project_index(ctx: &SiteContext, projects: &[ContentItem], tech: &[TermCount]) -> String {
    let config = &ctx.config;
    let cards: String = projects
        .iter()
        .map(|project| item_card(ctx, project))
        .collect();
    let tech_list: String = tech
        .iter()
        .map(|t| {
            format!(
                r#"<li data-tech="{0}">{0} <span class="count">{1}</span></li>"#,
                escape_html(&t.name),
                t.count
            )
        })
        .collect();

    let content = format!(
        r#"<h1>Projects</h1>
<ul class="terms tech">{}</ul>
<div class="cards">{}</div>"#,
        tech_list, cards
    );

    let path = collection_path(config, CollectionKind::Projects);
    layout(
        ctx,
        &PageMeta {
            title: "Projects",
            path: &path,
            ..PageMeta::default()
        },
        &content,
    )
}

/// One project with its links, stack and a few other projects
pub fn project_page(
    ctx: &SiteContext,
    project: &ContentItem,
    rendered: &Rendered,
    others: &[&ContentItem],
) -> String {
    let config = &ctx.config;
    let meta = project.as_project();

    let cover = meta
        .and_then(|m| m.image.as_deref())
        .map(|img| image_tag(config, img, Some(&project.title)))
        .unwrap_or_default();

    let mut links = Vec::new();
    if let Some(m) = meta {
        if let Some(repo) = &m.links.repository {
            links.push(link_to(config, repo, "Source", true));
        }
        if let Some(live) = &m.links.live {
            links.push(link_to(config, live, "Live demo", true));
        }
    }

    let stack: String = project
        .tech_stack()
        .iter()
        .map(|t| format!("<li>{}</li>", escape_html(t)))
        .collect();

    let others_html = if others.is_empty() {
        String::new()
    } else {
        let cards: String = others.iter().map(|item| item_card(ctx, item)).collect();
        format!(
            r#"<section class="related"><h2>Other projects</h2><div class="cards">{}</div></section>"#,
            cards
        )
    };

    let content = format!(
        r#"<article class="project">
<header><h1>{title}</h1><p class="summary">{summary}</p>{cover}
<ul class="terms tech">{stack}</ul>
<p class="links">{links}</p></header>
{toc}
<div class="post-body">{body}</div>
</article>
{others}"#,
        title = escape_html(&project.title),
        summary = escape_html(&project.summary),
        cover = cover,
        stack = stack,
        links = links.join(" "),
        toc = toc(&rendered.headings),
        body = rendered.html,
        others = others_html,
    );

    let path = item_path(config, CollectionKind::Projects, &project.slug);
    layout(
        ctx,
        &PageMeta {
            title: &project.title,
            description: &project.summary,
            path: &path,
            image: meta.and_then(|m| m.image.as_deref()),
            article: false,
        },
        &content,
    )
}

/// The page served for unknown paths
pub fn not_found(ctx: &SiteContext) -> String {
    let content = format!(
        r#"<section class="not-found"><h1>404</h1><p>This page does not exist.</p><p>{}</p></section>"#,
        link_to(&ctx.config, "/", "Back home", false)
    );
    layout(
        ctx,
        &PageMeta {
            title: "Not found",
            path: "404.html",
            ..PageMeta::default()
        },
        &content,
    )
}

/// Nested outline; nothing for bodies without headings
fn toc(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }
    let items: String = headings
        .iter()
        .map(|h| {
            format!(
                r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
                h.level,
                escape_html(&h.id),
                escape_html(&h.text)
            )
        })
        .collect();
    format!(
        r#"<nav class="toc"><h2>Contents</h2><ol>{}</ol></nav>"#,
        items
    )
}

fn tag_list(ctx: &SiteContext, tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items: String = tags
        .iter()
        .map(|tag| {
            format!(
                "<li>{}</li>",
                link_to(
                    &ctx.config,
                    &tag_filter_path(&ctx.config, tag),
                    &escape_html(tag),
                    false
                )
            )
        })
        .collect();
    format!(r#"<ul class="tags">{}</ul>"#, items)
}

fn item_link(ctx: &SiteContext, item: &ContentItem) -> String {
    link_to(
        &ctx.config,
        &item_path(&ctx.config, item.collection(), &item.slug),
        &escape_html(&item.title),
        false,
    )
}

fn item_card(ctx: &SiteContext, item: &ContentItem) -> String {
    let config = &ctx.config;
    let extra = match item.collection() {
        CollectionKind::Posts => item
            .reading_time()
            .map(|rt| format!(r#"<span class="reading-time">{}</span>"#, rt))
            .unwrap_or_default(),
        CollectionKind::Projects => item
            .tech_stack()
            .iter()
            .map(|t| format!(r#"<span class="tech">{}</span>"#, escape_html(t)))
            .collect(),
    };
    let featured = if item.is_featured() { " featured" } else { "" };

    format!(
        r#"<article class="card{}"><h3>{}</h3><p>{}</p><p class="card-meta">{} {}</p></article>"#,
        featured,
        item_link(ctx, item),
        escape_html(&item.summary),
        time_tag(&item.date, &config.date_format),
        extra
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::item::fixtures;
    use crate::content::{aggregate, archive, Field};

    fn rendered(html: &str, headings: Vec<Heading>) -> Rendered {
        Rendered {
            html: html.to_string(),
            headings,
        }
    }

    #[test]
    fn test_layout_carries_theme_and_active_menu() {
        let ctx = SiteContext::new(SiteConfig::default()).at("/blog/");
        let html = layout(&ctx, &PageMeta::default(), "<p>x</p>");
        assert!(html.contains(r#"data-theme="dark""#));
        assert!(html.contains(r#"<li class="active"><a href="/blog/">Blog</a></li>"#));
        assert!(html.contains(r#"<li><a href="/">Home</a></li>"#));
    }

    #[test]
    fn test_blog_index_lists_terms_and_archive() {
        let ctx = SiteContext::new(SiteConfig::default());
        let posts = vec![
            fixtures::post("b", "2024-03-02", &["rust", "web dev"], Some("eng")),
            fixtures::post("a", "2023-11-20", &["rust"], None),
        ];
        let html = blog_index(
            &ctx,
            &posts,
            &aggregate(&posts, Field::Tags),
            &aggregate(&posts, Field::Category),
            &archive(&posts),
        );
        assert!(html.contains(r#"<a href="/blog/?tag=web%20dev">web dev</a>"#));
        assert!(html.contains(r#"<a href="/blog/?category=eng">eng</a>"#));
        assert!(html.contains("<h3>2024</h3><h4>March</h4>"));
        assert!(html.contains("<h3>2023</h3><h4>November</h4>"));
    }

    #[test]
    fn test_post_page() {
        let ctx = SiteContext::new(SiteConfig::default());
        let post = fixtures::post("hello", "2024-01-05", &["rust"], Some("notes"));
        let other = fixtures::post("other", "2024-01-01", &["rust"], None);
        let heading = Heading {
            id: "intro".to_string(),
            text: "Intro".to_string(),
            level: 2,
        };

        let html = post_page(
            &ctx,
            &post,
            &rendered(r#"<h2 id="intro">Intro</h2>"#, vec![heading]),
            &[&other],
            None,
            Some(&other),
        );
        assert!(html.contains(r##"<a href="#intro">Intro</a>"##));
        assert!(html.contains("Related posts"));
        assert!(html.contains(r#"<a class="next" href="/blog/other/">"#));
        assert!(!html.contains(r#"class="prev""#));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
    }

    #[test]
    fn test_project_page_links() {
        let ctx = SiteContext::new(SiteConfig::default());
        let mut project = fixtures::project("loom", "2024-01-01", true, &["Rust"]);
        if let crate::content::ItemKind::Project(meta) = &mut project.kind {
            meta.links.repository = Some("https://github.com/x/loom".to_string());
        }

        let html = project_page(&ctx, &project, &rendered("", Vec::new()), &[]);
        assert!(html.contains(r#"href="https://github.com/x/loom" target="_blank""#));
        assert!(html.contains("<li>Rust</li>"));
        assert!(!html.contains("Other projects"));
        assert!(!html.contains(r#"class="toc""#));
    }

    #[test]
    fn test_content_text_is_escaped() {
        let ctx = SiteContext::new(SiteConfig::default());
        let mut post = fixtures::post("x", "2024-01-01", &[], None);
        post.title = "<script>".to_string();
        let html = home(&ctx, &[post], &[]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
