//! Editable template invocations.
//!
//! [`TemplateRecord::extract`] reads every `{{...}}` invocation of a page into
//! a record. Records are edited in memory and written back with
//! [`TemplateRecord::save`], which replaces the first literal occurrence of
//! the body the record was read from. Two invocations with identical bodies
//! are therefore indistinguishable: saving either one patches the first.
//!
//! A record removed from the page with [`TemplateRecord::remove`] turns into
//! the `Removed` variant. It can still be inspected but every edit fails.

use regex::{NoExpand, Regex};

use crate::wikitext::errors::{Result, WtError};
use crate::wikitext::page::Page;
use crate::wikitext::parameters::Parameters;
use crate::wikitext::patterns;
use crate::wikitext::site::WikiSyntax;

/// Fields of a template invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateData {
    text: String,
    title: String,
    parameters: Parameters,
}

impl TemplateData {
    /// Read a raw body (outer braces excluded) using the site's parser.
    pub fn parse<S: Into<String>>(site: &dyn WikiSyntax, body: S) -> Self {
        let text = body.into();
        let title = site.remove_ns_prefix(
            &patterns::template_title(&text),
            site.template_namespace(),
        );
        let parameters = site.parse_template(&text);
        Self {
            text,
            title,
            parameters,
        }
    }

    /// Raw body the record is anchored to in the page.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    pub fn set_title<S: Into<String>>(&mut self, title: S) {
        self.title = title.into();
    }

    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Rename a parameter in place, keeping the order of all parameters.
    ///
    /// An absent `old_key` leaves the parameters as they are. If `new_key`
    /// is already used by another parameter, the later of the two wins.
    pub fn change_parameter_name(&mut self, old_key: &str, new_key: &str) -> Result<()> {
        if old_key.is_empty() || new_key.is_empty() {
            return Err(WtError::precondition("parameter names cannot be empty"));
        }
        self.parameters.rename(old_key, new_key);
        Ok(())
    }
}

/// A template invocation found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRecord {
    Active(TemplateData),
    Removed(TemplateData),
}

impl TemplateRecord {
    /// One active record per template body the page's site reports.
    pub fn extract(page: &Page<'_>) -> Vec<TemplateRecord> {
        let site = page.site();
        let records: Vec<TemplateRecord> = site
            .template_bodies(&page.text)
            .into_iter()
            .map(|body| TemplateRecord::Active(TemplateData::parse(site, body)))
            .collect();
        log::debug!("[{}] found {} template(s)", page.title, records.len());
        records
    }

    pub fn data(&self) -> &TemplateData {
        match self {
            TemplateRecord::Active(d) | TemplateRecord::Removed(d) => d,
        }
    }

    pub fn text(&self) -> &str {
        self.data().text()
    }

    pub fn title(&self) -> &str {
        self.data().title()
    }

    pub fn parameters(&self) -> &Parameters {
        self.data().parameters()
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, TemplateRecord::Removed(_))
    }

    /// Editable fields, or an invalid-state error once removed.
    pub fn active_mut(&mut self) -> Result<&mut TemplateData> {
        match self {
            TemplateRecord::Active(d) => Ok(d),
            TemplateRecord::Removed(d) => Err(WtError::invalid_state(format!(
                "template '{}' removed",
                d.title
            ))),
        }
    }

    pub fn set_title<S: Into<String>>(&mut self, title: S) -> Result<()> {
        self.active_mut()?.set_title(title);
        Ok(())
    }

    pub fn set_text<S: Into<String>>(&mut self, text: S) -> Result<()> {
        self.active_mut()?.set_text(text);
        Ok(())
    }

    pub fn set_parameters(&mut self, parameters: Parameters) -> Result<()> {
        self.active_mut()?.set_parameters(parameters);
        Ok(())
    }

    pub fn change_parameter_name(&mut self, old_key: &str, new_key: &str) -> Result<()> {
        self.active_mut()?.change_parameter_name(old_key, new_key)
    }

    /// Format the record through the page's site and write it over the first
    /// occurrence of `text`. The anchor is left as it is; only `set_text`
    /// moves it.
    ///
    /// Returns `Ok(false)` when the body is no longer in the page.
    pub fn save(&mut self, page: &mut Page<'_>) -> Result<bool> {
        let site = page.site();
        let data = self.active_mut()?;

        let formatted = site.format_template(&data.title, &data.parameters, &data.text);
        let body = formatted
            .strip_prefix("{{")
            .and_then(|s| s.strip_suffix("}}"))
            .ok_or_else(|| {
                WtError::other_with_source::<WtError>(
                    format!("formatter returned '{}' which is not a template", formatted),
                    None,
                )
            })?
            .to_string();

        let anchor = Regex::new(&regex::escape(&data.text))?;
        if !anchor.is_match(&page.text) {
            log::warn!(
                "[{}] template '{}' not found in page text, nothing saved",
                page.title,
                data.title
            );
            return Ok(false);
        }

        page.text = anchor.replacen(&page.text, 1, NoExpand(&body)).into_owned();
        log::debug!("[{}] saved template '{}'", page.title, data.title);
        Ok(true)
    }

    /// Delete `{{body}}` and one newline right after it from the page, then
    /// mark the record removed.
    ///
    /// Returns `Ok(false)` when the invocation was no longer in the page; the
    /// record is marked removed either way.
    pub fn remove(&mut self, page: &mut Page<'_>) -> Result<bool> {
        let data = match self {
            TemplateRecord::Active(d) => d,
            TemplateRecord::Removed(d) => {
                return Err(WtError::invalid_state(format!(
                    "template '{}' already removed",
                    d.title
                )));
            }
        };

        let pattern = Regex::new(&format!(r"\{{\{{{}\}}\}}\n?", regex::escape(&data.text)))?;
        let found = pattern.is_match(&page.text);
        if found {
            page.text = pattern.replacen(&page.text, 1, "").into_owned();
            log::debug!("[{}] removed template '{}'", page.title, data.title);
        } else {
            log::warn!(
                "[{}] template '{}' not found in page text",
                page.title,
                data.title
            );
        }

        let data = std::mem::take(data);
        *self = TemplateRecord::Removed(data);
        Ok(found)
    }
}
