//! Error types for declaration generation.
//!
//! This module contains the [`Error`] enum returned by
//! [`EnvTyped::generate`](crate::EnvTyped::generate) and the
//! [`ValueFallback`] diagnostic recorded when a single value is not JSON.
//!
//! # Error Variants
//!
//! | Variant | When It Occurs |
//! |---------|----------------|
//! | [`Error::Load`] | The injected loader failed |
//! | [`Error::TemplateRead`] | A template file could not be read |
//! | [`Error::TemplateCompile`] | The template text is not valid Handlebars |
//! | [`Error::Render`] | Rendering the compiled template failed |
//! | [`Error::Write`] | The declaration file could not be written |
//!
//! None of these are retried. A host adapter is expected to surface them as a
//! failed build step, ideally through [`miette::Report`] for the fancy output.
//!
//! # Per-value fallbacks
//!
//! A value that does not parse as JSON is not an error: it is typed as a
//! string and reported as a [`ValueFallback`] inside the
//! [`GenerateReport`](crate::GenerateReport).

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error as ThisError;

use crate::loader::LoaderError;

/// Errors that abort a generation pass.
#[derive(Debug, ThisError, Diagnostic)]
pub enum Error {
    /// The injected loader returned an error.
    #[error("loader '{loader}' failed to load environment variables")]
    #[diagnostic(
        code(envtyped::load_error),
        help("check the environment directory, mode and .env files")
    )]
    Load {
        /// Name of the loader that failed.
        loader: String,

        /// The underlying loader error.
        #[source]
        #[diagnostic_source]
        source: LoaderError,
    },

    /// A template file could not be read.
    #[error("failed to read template: {}", .path.display())]
    #[diagnostic(
        code(envtyped::template_read),
        help("ensure the template file exists and is readable")
    )]
    TemplateRead {
        /// Path of the template file.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The template text could not be compiled.
    #[error("failed to compile template '{name}'")]
    #[diagnostic(code(envtyped::template_compile))]
    TemplateCompile {
        /// Template name (file path or `import_meta`).
        name: String,

        /// The Handlebars compile error.
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// Rendering the declaration file failed.
    #[error("failed to render declaration file")]
    #[diagnostic(
        code(envtyped::render_error),
        help("custom templates receive `properties` (name, type) and `semi`")
    )]
    Render {
        /// The Handlebars render error.
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The declaration file could not be written.
    #[error("failed to write declaration file: {}", .path.display())]
    #[diagnostic(
        code(envtyped::write_error),
        help("check that the output path is writable")
    )]
    Write {
        /// The configured output path.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a `Load` error for the named loader.
    pub fn load(loader: impl Into<String>, source: LoaderError) -> Self {
        Self::Load {
            loader: loader.into(),
            source,
        }
    }

    /// Creates a `Write` error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// A value that was not valid JSON and was typed as a plain string.
///
/// Recorded once per offending entry; generation continues.
#[derive(Debug, ThisError, Diagnostic)]
#[error("{key} is not valid JSON, typing it as a string")]
#[diagnostic(
    code(envtyped::invalid_json),
    severity(Warning),
    help("quote the value as a JSON string to silence this warning")
)]
pub struct ValueFallback {
    /// The environment variable name.
    pub key: String,

    /// The raw value that was kept.
    pub value: String,

    /// The JSON parse error.
    #[source]
    pub source: serde_json::Error,
}
