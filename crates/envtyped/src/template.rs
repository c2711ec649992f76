//! Declaration template loading and rendering.
//!
//! The declaration file body comes from a [Handlebars](https://handlebarsjs.com/)
//! template. The built-in one is embedded at compile time via
//! [`include_str!`]; a [`TemplateSource::File`] replaces it with a file that is
//! read on first render, so a missing file fails the first generation pass.
//!
//! The compiled template is cached for the lifetime of the [`Template`].
//!
//! ## Template variables
//!
//! - `properties` - list of `{ name, type }`, in loader order
//! - `semi` - whether declarations end with `;`
//!
//! HTML escaping is disabled: `{{type}}` emits `'quoted'` literals verbatim.

use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use std::sync::OnceLock;

use handlebars::Handlebars;
use serde::Serialize;

use crate::Error;
use crate::generator::Property;

/// The built-in `import.meta.env` declaration template.
pub const BUILTIN_TEMPLATE: &str = include_str!("../templates/import_meta.d.ts.hbs");

const BUILTIN_NAME: &str = "import_meta";

/// Where the template text comes from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum TemplateSource {
    /// The embedded [`BUILTIN_TEMPLATE`].
    #[default]
    Builtin,

    /// A template file, read once on first render.
    File(PathBuf),

    /// Template text given directly.
    Inline(String),
}

impl TemplateSource {
    fn name(&self) -> String {
        match self {
            Self::Builtin => BUILTIN_NAME.to_string(),

            Self::File(path) => path.display().to_string(),

            Self::Inline(_) => "inline".to_string(),
        }
    }
}

/// Data handed to the template.
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
    /// One entry per environment variable.
    pub properties: &'a [Property],

    /// Whether declarations end with `;`.
    pub semi: bool,
}

/// A lazily compiled declaration template.
pub struct Template {
    source: TemplateSource,
    compiled: OnceLock<Handlebars<'static>>,
}

impl Template {
    /// Creates a template; nothing is read or compiled yet.
    #[must_use]
    pub const fn new(source: TemplateSource) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    /// Returns where the template text comes from.
    #[must_use]
    pub const fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Returns `true` once the template has been compiled.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// Renders the declaration file body.
    ///
    /// # Errors
    ///
    /// Fails if the template file cannot be read, does not compile, or
    /// cannot be rendered with `context`.
    pub fn render(&self, context: &RenderContext<'_>) -> Result<String, Error> {
        self.compiled()?
            .render(BUILTIN_NAME, context)
            .map_err(|e| Error::Render {
                source: Box::new(e),
            })
    }

    fn compiled(&self) -> Result<&Handlebars<'static>, Error> {
        if let Some(registry) = self.compiled.get() {
            return Ok(registry);
        }

        let registry = Self::compile(&self.source)?;
        Ok(self.compiled.get_or_init(|| registry))
    }

    fn compile(source: &TemplateSource) -> Result<Handlebars<'static>, Error> {
        let text = match source {
            TemplateSource::Builtin => BUILTIN_TEMPLATE.to_string(),

            TemplateSource::File(path) => {
                std::fs::read_to_string(path).map_err(|e| Error::TemplateRead {
                    path: path.clone(),
                    source: e,
                })?
            }

            TemplateSource::Inline(text) => text.clone(),
        };

        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(BUILTIN_NAME, text)
            .map_err(|e| Error::TemplateCompile {
                name: source.name(),
                source: Box::new(e),
            })?;

        tracing::debug!(template = %source.name(), "compiled declaration template");

        Ok(registry)
    }
}

impl Debug for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.source)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new(TemplateSource::Builtin)
    }
}
