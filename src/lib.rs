//! Structural editing of MediaWiki wikitext.
//!
//! Protects fragile markup behind placeholders, splits a page into a tree of
//! heading sections and edits template invocations in place.

pub mod wikitext;

pub use wikitext::{
    Page, Parameters, Placeholder, PlaceholderSet, Placeholders, Section, Site, SiteConfig,
    TemplateRecord, WikiSyntax, WtError,
};
