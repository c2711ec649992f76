//! Loader abstraction for the environment map.
//!
//! The generator never reads `.env` files or the process environment itself.
//! It calls an injected [`Loader`] with the [`ResolvedOptions`] and types
//! whatever flat map comes back.
//!
//! # Built-in Loaders
//!
//! - [`NoopLoader`] - Returns an empty map (the default)
//! - [`SnapshotLoader`] - Filters an environment snapshot by prefix
//! - [`DotenvLoader`] - Reads the `.env` file family for a mode
//! - [`FnLoader`] - Wraps a closure, see [`loader_fn`]
//!
//! # Custom Loaders
//!
//! ```rust,ignore
//! use envtyped::loader::{EnvMap, Loader, LoaderError};
//! use envtyped::ResolvedOptions;
//!
//! struct StaticLoader;
//!
//! impl Loader for StaticLoader {
//!     fn name(&self) -> &str { "static" }
//!
//!     fn load(&self, _options: &ResolvedOptions) -> Result<EnvMap, LoaderError> {
//!         let mut map = EnvMap::new();
//!         map.insert("VITE_PORT".to_string(), "3000".to_string());
//!         Ok(map)
//!     }
//! }
//! ```

#[cfg(feature = "dotenv")]
mod dotenv;
mod snapshot;

#[cfg(feature = "dotenv")]
pub use self::dotenv::DotenvLoader;
pub use snapshot::SnapshotLoader;

use std::path::PathBuf;

use indexmap::IndexMap;
use miette::Diagnostic;
use thiserror::Error as ThisError;

use crate::ResolvedOptions;

/// Flat, insertion-ordered map of variable names to raw string values.
pub type EnvMap = IndexMap<String, String>;

// ============================================================================
// Loader Errors
// ============================================================================

/// Errors that can occur while loading the environment map.
#[derive(Debug, ThisError, Diagnostic)]
pub enum LoaderError {
    /// An env file exists but could not be read.
    #[error("failed to read {}", .path.display())]
    #[diagnostic(
        code(envtyped::loader::io),
        help("check file permissions and ensure it's readable")
    )]
    Io {
        /// Path of the file.
        path: PathBuf,

        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An env file could not be parsed.
    #[error("failed to parse {}: {message}", .path.display())]
    #[diagnostic(
        code(envtyped::loader::parse),
        help("each line must be KEY=VALUE, a comment, or blank")
    )]
    Parse {
        /// Path of the file.
        path: PathBuf,

        /// The error message.
        message: String,
    },

    /// Generic loader error.
    #[error("loader '{loader}' error: {message}")]
    #[diagnostic(code(envtyped::loader::error))]
    Other {
        /// The loader name.
        loader: String,

        /// The error message.
        message: String,
    },
}

impl LoaderError {
    /// Creates a generic loader error.
    pub fn other(loader: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Other {
            loader: loader.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Loader Trait
// ============================================================================

/// Produces the environment map for one generation pass.
///
/// Called once per [`EnvTyped::generate`](crate::EnvTyped::generate) with
/// the resolved options (everything but the loader). The returned map's
/// iteration order is the order of the generated declarations.
pub trait Loader: Send + Sync {
    /// Returns the loader's name for logs and error messages.
    fn name(&self) -> &str;

    /// Loads the environment map.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot be read. The error
    /// aborts the generation pass.
    fn load(&self, options: &ResolvedOptions) -> Result<EnvMap, LoaderError>;
}

impl<L: Loader + ?Sized> Loader for Box<L> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self, options: &ResolvedOptions) -> Result<EnvMap, LoaderError> {
        (**self).load(options)
    }
}

/// Loader that always returns an empty map.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLoader;

impl Loader for NoopLoader {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn load(&self, _options: &ResolvedOptions) -> Result<EnvMap, LoaderError> {
        Ok(EnvMap::new())
    }
}

/// Loader backed by a closure. Build one with [`loader_fn`].
pub struct FnLoader<F> {
    name: String,
    f: F,
}

impl<F> Loader for FnLoader<F>
where
    F: Fn(&ResolvedOptions) -> Result<EnvMap, LoaderError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self, options: &ResolvedOptions) -> Result<EnvMap, LoaderError> {
        (self.f)(options)
    }
}

/// Wraps a closure as a named [`Loader`].
///
/// ```rust,ignore
/// let loader = envtyped::loader::loader_fn("fixed", |_options| {
///     Ok([("VITE_PORT".to_string(), "3000".to_string())].into_iter().collect())
/// });
/// ```
pub fn loader_fn<F>(name: impl Into<String>, f: F) -> FnLoader<F>
where
    F: Fn(&ResolvedOptions) -> Result<EnvMap, LoaderError> + Send + Sync,
{
    FnLoader {
        name: name.into(),
        f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Defaults, EnvTypedOptions, merge_options};

    fn resolved() -> ResolvedOptions {
        merge_options(EnvTypedOptions::new(), &Defaults::capture()).options
    }

    #[test]
    fn test_noop_loader_is_empty() {
        let map = NoopLoader.load(&resolved()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_fn_loader_receives_options() {
        let loader = loader_fn("echo-mode", |options| {
            let mut map = EnvMap::new();
            map.insert("MODE".to_string(), options.env_mode.clone());
            Ok(map)
        });

        let mut options = resolved();
        options.env_mode = "staging".to_string();

        assert_eq!(loader.name(), "echo-mode");
        let map = loader.load(&options).unwrap();
        assert_eq!(map.get("MODE").map(String::as_str), Some("staging"));
    }

    #[test]
    fn test_fn_loader_error_propagates() {
        let loader = loader_fn("broken", |_| Err(LoaderError::other("broken", "no env")));
        let err = loader.load(&resolved()).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Other { ref loader, ref message } if loader == "broken" && message == "no env"
        ));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_boxed_loader_delegates() {
        let boxed: Box<dyn Loader> = Box::new(NoopLoader);
        assert_eq!(boxed.name(), "noop");
    }
}
