//! Wikitext module root
//!
//! Declares the submodules and re-exports the types callers work with:
//! `Page` as the editable buffer, `Section` for the heading tree,
//! `TemplateRecord` for template invocations and `Placeholders` for the
//! markup protection session.
//!
//! Scanning patterns and the default parsing helpers live in `patterns` and
//! `parser`; they are public so custom `WikiSyntax` implementations can reuse
//! them.

pub mod enums;
pub mod errors;
pub mod page;
pub mod parameters;
pub mod parser;
pub mod patterns;
pub mod placeholders;
pub mod sections;
pub mod site;
pub mod template_record;

pub use enums::{Placeholder, PlaceholderSet};
pub use errors::{Result, WtError};
pub use page::Page;
pub use parameters::Parameters;
pub use placeholders::{PlaceholderEntry, Placeholders};
pub use sections::Section;
pub use site::{Site, SiteConfig, SiteConfigBuilder, WikiSyntax};
pub use template_record::{TemplateData, TemplateRecord};
