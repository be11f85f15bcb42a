//! Site collaborators for template handling.
//!
//! A page needs four services from its wiki to work with templates:
//! enumerating invocations, parsing parameters, formatting a template back
//! into wikitext and stripping namespace prefixes from titles. They are
//! grouped in the [`WikiSyntax`] trait so a bot framework can supply its own
//! implementation. [`Site`] is the built-in one, configured by [`SiteConfig`].

use std::collections::HashMap;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::wikitext::errors::Result;
use crate::wikitext::parameters::Parameters;
use crate::wikitext::parser;

/// Namespace id of `Template:` on MediaWiki sites.
pub const TEMPLATE_NAMESPACE: i32 = 10;

/// Template syntax services used by `TemplateRecord`.
pub trait WikiSyntax {
    /// Raw bodies (outer braces excluded) of every template invocation.
    fn template_bodies(&self, text: &str) -> Vec<String>;

    /// Ordered parameters of a template body.
    fn parse_template(&self, body: &str) -> Parameters;

    /// `{{...}}` wikitext for a template. `original` is the body the template
    /// was read from, used to keep its layout.
    fn format_template(&self, title: &str, params: &Parameters, original: &str) -> String;

    /// `title` without a prefix naming namespace `namespace`.
    fn remove_ns_prefix(&self, title: &str, namespace: i32) -> String;

    /// Namespace id used for template titles.
    fn template_namespace(&self) -> i32 {
        TEMPLATE_NAMESPACE
    }
}

/// Site configuration.
///
/// ```rust,ignore
/// let config = SiteConfigBuilder::default()
///     .namespaces(HashMap::from([(10, vec!["Template".into(), "Vorlage".into()])]))
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct SiteConfig {
    /// Namespace id that holds templates.
    pub template_namespace: i32,
    /// Canonical name followed by aliases, per namespace id.
    pub namespaces: HashMap<i32, Vec<String>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_namespace: TEMPLATE_NAMESPACE,
            namespaces: HashMap::from([(TEMPLATE_NAMESPACE, vec!["Template".to_string()])]),
        }
    }
}

impl SiteConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(json)?;
        log::debug!(
            "loaded site config with {} namespace(s)",
            config.namespaces.len()
        );
        Ok(config)
    }
}

/// Built-in `WikiSyntax` implementation.
#[derive(Debug, Clone, Default)]
pub struct Site {
    config: SiteConfig,
}

impl Site {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}

impl WikiSyntax for Site {
    fn template_bodies(&self, text: &str) -> Vec<String> {
        parser::template_bodies(text)
    }

    fn parse_template(&self, body: &str) -> Parameters {
        parser::parse_parameters(body)
    }

    fn format_template(&self, title: &str, params: &Parameters, original: &str) -> String {
        parser::format_template(title, params, original)
    }

    fn remove_ns_prefix(&self, title: &str, namespace: i32) -> String {
        let Some(names) = self.config.namespaces.get(&namespace) else {
            return title.to_string();
        };
        let Some((prefix, rest)) = title.split_once(':') else {
            return title.to_string();
        };
        let prefix = prefix.trim().replace('_', " ");
        if names.iter().any(|n| n.eq_ignore_ascii_case(&prefix)) {
            rest.trim().to_string()
        } else {
            title.to_string()
        }
    }

    fn template_namespace(&self) -> i32 {
        self.config.template_namespace
    }
}
