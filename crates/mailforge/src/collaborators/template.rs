//! Body template rendering.

use std::collections::HashMap;

use tera::{Context, Tera};

use super::BoxError;

/// Name of the built-in body template.
pub const STANDARD_TEMPLATE: &str = "standard.html";

/// Variables passed to a template.
pub type TemplateContext = HashMap<String, serde_json::Value>;

/// Renders named templates.
pub trait TemplateRenderer: Send + Sync {
    /// Renders `template` with the given variables.
    ///
    /// # Errors
    ///
    /// Returns the engine's error for unknown templates or render failures.
    fn render(&self, template: &str, context: &TemplateContext) -> Result<String, BoxError>;
}

/// Tera-backed renderer preloaded with [`STANDARD_TEMPLATE`].
///
/// `.html` templates are autoescaped; the standard template marks
/// `content`, `footer` and `print_html` as safe since they already hold
/// HTML.
#[derive(Debug, Clone)]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Creates a renderer with the standard template registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the standard template fails to compile.
    pub fn new() -> Result<Self, BoxError> {
        let mut tera = Tera::default();
        tera.add_raw_template(
            STANDARD_TEMPLATE,
            include_str!("../../templates/standard.html"),
        )?;
        Ok(Self { tera })
    }

    /// Registers an additional template, replacing one with the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to compile.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), BoxError> {
        self.tera.add_raw_template(name, source)?;
        Ok(())
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &str, context: &TemplateContext) -> Result<String, BoxError> {
        let context = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &context)?)
    }
}
