//! Body rendering: markdown, highlighting and embedded components

mod components;
mod markdown;

pub use components::{Component, ComponentProps, ComponentRegistry};
pub use markdown::{MarkdownRenderer, Rendered};
