//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: Liminal
subtitle: Notes and projects
description: ''
author: John Doe
language: en
theme: dark

# URL
url: http://example.com
root: /

# Directory
content_dir: content
blog_dir: blog
projects_dir: projects
static_dir: static
public_dir: public

# Writing
reading:
  words_per_minute: 200
related:
  tag_weight: 2
  category_weight: 3
  limit: 3
other_projects_limit: 3
recent_posts_limit: 3
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

# Navigation
menu:
  - name: Home
    path: /
  - name: Blog
    path: /blog/
  - name: Projects
    path: /projects/

# Date format (chrono strftime)
date_format: '%B %-d, %Y'
"#;

const SAMPLE_POST: &str = r#"---
title: Hello World
date: {date}
summary: The first post on this site.
tags: [meta]
category: Notes
---

Welcome! Posts live in `content/blog`, projects in `content/projects`.

## Create a new post

```bash
$ liminal new post "My New Post"
```

<Callout variant="tip">
Run `liminal server` to preview the site with live reload.
</Callout>

## Generate static files

```bash
$ liminal generate
```
"#;

const SAMPLE_PROJECT: &str = r#"---
title: Sample Project
date: {date}
summary: A project to show how project pages look.
techStack: [Rust]
githubUrl: https://github.com/example/sample
featured: true
---

## Overview

Describe what the project does and how it was built.
"#;

/// Initialize a new site in the given directory.
///
/// Files that already exist are left alone.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("content/blog"))?;
    fs::create_dir_all(target_dir.join("content/projects"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();

    write_if_missing(&target_dir.join("_config.yml"), CONFIG)?;
    write_if_missing(
        &target_dir.join("content/blog/hello-world.mdx"),
        &SAMPLE_POST.replace("{date}", &date),
    )?;
    write_if_missing(
        &target_dir.join("content/projects/sample-project.mdx"),
        &SAMPLE_PROJECT.replace("{date}", &date),
    )?;

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Skipping existing file {:?}", path);
        return Ok(());
    }
    fs::write(path, contents)?;
    Ok(())
}
