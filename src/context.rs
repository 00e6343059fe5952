//! Page-independent state shared by every rendered page

use crate::config::{MenuItem, SiteConfig};

/// Which page is being rendered and where the visitor came from
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    pub current: String,
    pub previous: Option<String>,
    pub menu: Vec<MenuItem>,
}

impl Navigation {
    pub fn new(menu: Vec<MenuItem>) -> Self {
        Self {
            current: "/".to_string(),
            previous: None,
            menu,
        }
    }

    /// Move to another page, remembering the one we left
    pub fn set_page(&mut self, path: &str) {
        let path = normalize(path);
        if path != self.current {
            self.previous = Some(std::mem::replace(&mut self.current, path));
        }
    }

    /// Whether a menu path should be highlighted for the current page.
    ///
    /// The root entry only matches the home page; other entries also match
    /// anything beneath them.
    pub fn is_active(&self, path: &str) -> bool {
        let path = normalize(path);
        if path == "/" {
            self.current == "/"
        } else {
            self.current.starts_with(&path)
        }
    }
}

/// Leading and trailing slash, no query string
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

/// Configuration plus navigation, passed by reference to every template
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub config: SiteConfig,
    pub navigation: Navigation,
}

impl SiteContext {
    pub fn new(config: SiteConfig) -> Self {
        let navigation = Navigation::new(config.menu.clone());
        Self { config, navigation }
    }

    pub fn theme(&self) -> &str {
        &self.config.theme
    }

    /// A copy of this context positioned on `path`
    pub fn at(&self, path: &str) -> Self {
        let mut ctx = self.clone();
        ctx.navigation.set_page(path);
        ctx
    }
}
