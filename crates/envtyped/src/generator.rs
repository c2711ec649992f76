//! The declaration file generator.
//!
//! [`EnvTyped`] owns the resolved options, the injected loader and the
//! cached template. Each [`generate`](EnvTyped::generate) call is an
//! independent pass:
//!
//! 1. load the environment map
//! 2. type every entry (see [`value`](crate::value))
//! 3. render the template with `{ properties, semi }`
//! 4. overwrite the output file
//!
//! A value that is not JSON never aborts the pass; it is typed as a string
//! and reported in [`GenerateReport::fallbacks`]. Loader, template and write
//! failures abort it.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::ValueFallback;
use crate::loader::Loader;
use crate::options::{Defaults, EnvTypedOptions, ResolvedOptions, merge_options};
use crate::template::{RenderContext, Template};
use crate::{Error, value};

/// One declared environment variable.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Property {
    /// Variable name.
    pub name: String,

    /// Type name or literal type.
    #[serde(rename = "type")]
    pub ty: String,
}

impl Property {
    /// Creates a property.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Outcome of a successful generation pass.
#[derive(Debug)]
pub struct GenerateReport {
    /// The file that was written.
    pub path: PathBuf,

    /// Declared properties, in loader order.
    pub properties: Vec<Property>,

    /// Values that were not JSON and fell back to `string`.
    pub fallbacks: Vec<ValueFallback>,
}

/// Properties and fallbacks computed from one loader call.
#[derive(Debug, Default)]
pub struct Declarations {
    /// Declared properties, in loader order.
    pub properties: Vec<Property>,

    /// Values that were not JSON and fell back to `string`.
    pub fallbacks: Vec<ValueFallback>,
}

/// Generates `import.meta.env` declarations from an injected loader.
///
/// # Example
///
/// ```rust,ignore
/// use envtyped::{EnvTyped, EnvTypedOptions};
/// use envtyped::loader::SnapshotLoader;
///
/// let generator = EnvTyped::new(
///     EnvTypedOptions::new()
///         .with_env_prefix("VITE_")
///         .with_loader(SnapshotLoader::from_process_env()),
/// );
///
/// let report = generator.generate()?;
/// println!("wrote {} declarations", report.properties.len());
/// ```
pub struct EnvTyped {
    options: ResolvedOptions,
    loader: Box<dyn Loader>,
    template: Template,
}

impl EnvTyped {
    /// Creates a generator, filling missing options from [`Defaults::capture`].
    #[must_use]
    pub fn new(options: EnvTypedOptions) -> Self {
        Self::with_defaults(options, &Defaults::capture())
    }

    /// Creates a generator, filling missing options from `defaults`.
    #[must_use]
    pub fn with_defaults(options: EnvTypedOptions, defaults: &Defaults) -> Self {
        let merged = merge_options(options, defaults);

        Self {
            options: merged.options,
            loader: merged.loader,
            template: Template::new(merged.template),
        }
    }

    /// Returns the resolved options.
    #[must_use]
    pub const fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// Returns the template, compiled or not.
    #[must_use]
    pub const fn template(&self) -> &Template {
        &self.template
    }

    /// Loads the environment map and types every entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the loader fails.
    pub fn declarations(&self) -> Result<Declarations, Error> {
        let env = self
            .loader
            .load(&self.options)
            .map_err(|e| Error::load(self.loader.name(), e))?;

        tracing::debug!(loader = self.loader.name(), count = env.len(), "loaded environment");

        let mut declarations = Declarations::default();

        for (key, raw) in &env {
            let (parsed, fallback) = value::parse_value(key, raw);

            if let Some(fallback) = fallback {
                tracing::warn!(key = %key, error = %fallback.source, "{fallback}");
                declarations.fallbacks.push(fallback);
            }

            declarations.properties.push(Property::new(
                key.as_str(),
                value::type_repr(&parsed, self.options.value_in_type),
            ));
        }

        Ok(declarations)
    }

    /// Renders the declaration file body without writing it.
    ///
    /// # Errors
    ///
    /// Returns loader and template errors.
    pub fn render(&self) -> Result<(String, Declarations), Error> {
        let declarations = self.declarations()?;
        let content = self.template.render(&RenderContext {
            properties: &declarations.properties,
            semi: self.options.semi,
        })?;

        Ok((content, declarations))
    }

    /// Regenerates the declaration file.
    ///
    /// The file at `file_path` is fully overwritten; missing parent
    /// directories are created.
    ///
    /// # Errors
    ///
    /// Returns loader, template and write errors. Values that are not JSON
    /// are not errors; see [`GenerateReport::fallbacks`].
    pub fn generate(&self) -> Result<GenerateReport, Error> {
        let (content, declarations) = self.render()?;
        let path = &self.options.file_path;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::write(path, e))?;
        }

        fs::write(path, content).map_err(|e| Error::write(path, e))?;

        tracing::debug!(
            path = %path.display(),
            count = declarations.properties.len(),
            "wrote declaration file"
        );

        Ok(GenerateReport {
            path: path.clone(),
            properties: declarations.properties,
            fallbacks: declarations.fallbacks,
        })
    }
}

impl std::fmt::Debug for EnvTyped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvTyped")
            .field("options", &self.options)
            .field("loader", &self.loader.name())
            .field("template", &self.template)
            .finish()
    }
}
