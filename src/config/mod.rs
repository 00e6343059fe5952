//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::MenuItem;
pub use site::ReadingConfig;
pub use site::RelatedConfig;
pub use site::SiteConfig;
