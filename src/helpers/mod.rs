//! Helper functions for page templates
//!
//! URL routing, HTML escaping and date formatting shared by the generator
//! and the markup components.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
