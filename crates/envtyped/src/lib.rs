//! # envtyped
//!
//! Generates TypeScript declarations for `import.meta.env` from the
//! environment variables a frontend build exposes.
//!
//! Every generation pass loads the environment through an injected
//! [`Loader`], re-parses each value as JSON to infer its type, renders a
//! Handlebars template and overwrites the declaration file:
//!
//! ```text
//! .env            VITE_PORT=3000
//! .env.local      VITE_API_URL=http://localhost:3000
//!                 VITE_FLAGS={"beta":true}
//!
//!                          │  EnvTyped::generate
//!                          ▼
//!
//! src/import_meta.d.ts
//!   interface ImportMetaEnv {
//!     readonly VITE_PORT: number;
//!     readonly VITE_API_URL: string;
//!     readonly VITE_FLAGS: object;
//!   }
//! ```
//!
//! With `value_in_type` the declared types are the values themselves
//! (`3000`, `'http://localhost:3000'`, `{"beta":true}`).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use envtyped::{EnvTyped, EnvTypedOptions};
//! use envtyped::loader::DotenvLoader;
//!
//! fn main() -> envtyped::Result<()> {
//!     let generator = EnvTyped::new(
//!         EnvTypedOptions::new()
//!             .with_env_prefix("VITE_")
//!             .with_loader(DotenvLoader::new().with_process_env()),
//!     );
//!
//!     let report = generator.generate()?;
//!     println!("wrote {}", report.path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `env_mode` | `$NODE_ENV` | Build mode handed to the loader |
//! | `env_dir` | cwd | Directory holding the `.env` files |
//! | `env_prefix` | `""` | Prefix(es) selecting exposed variables |
//! | `file_path` | `src/import_meta.d.ts` | Output declaration file |
//! | `value_in_type` | `false` | Emit literal types instead of type names |
//! | `semi` | `true` | End declarations with `;` |
//! | `template` | built-in | Handlebars template file |
//!
//! Options can also be read from a JSON or TOML file with
//! [`EnvTypedOptions::from_file`].
//!
//! ## Build Tools
//!
//! [`EnvTypedPlugin`] adapts the generator to a host build tool's hooks:
//! Vite regenerates on build start and whenever a `.env*` file changes or is
//! removed, Rsbuild regenerates before each build.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `dotenv` | [`DotenvLoader`] for `.env` file loading (default) |
//! | `toml` | TOML options files |
//! | `full` | Enable all features |
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.
//! Values that are not valid JSON are logged at `warn` and returned in
//! [`GenerateReport::fallbacks`].

#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

// ============================================================================
// Re-exported Dependencies
// ============================================================================

/// Re-export miette for error handling.
pub use miette;

/// Re-export `serde_json`, whose [`Value`](serde_json::Value) is what every
/// environment value is parsed into.
pub use serde_json;

/// Re-export dotenvy when the dotenv feature is enabled.
#[cfg(feature = "dotenv")]
pub use dotenvy;

// ============================================================================
// Core Modules
// ============================================================================

mod error;
pub use error::{Error, ValueFallback};

/// A Result type that displays errors with miette's fancy formatting.
///
/// ```rust,ignore
/// fn main() -> envtyped::Result<()> {
///     envtyped::EnvTyped::new(Default::default()).generate()?;
///     Ok(())
/// }
/// ```
pub type Result<T> = miette::Result<T>;

pub mod options;
pub use options::{Defaults, EnvPrefix, EnvTypedOptions, ResolvedOptions, merge_options};

pub mod value;

pub mod template;
pub use template::{Template, TemplateSource};

mod generator;
pub use generator::{Declarations, EnvTyped, GenerateReport, Property};

// ============================================================================
// Loaders
// ============================================================================

pub mod loader;

#[cfg(feature = "dotenv")]
pub use loader::DotenvLoader;
pub use loader::{EnvMap, Loader, LoaderError, NoopLoader, SnapshotLoader, loader_fn};

// ============================================================================
// Options Files
// ============================================================================

pub mod file;
pub use file::{FileError, FileFormat};

// ============================================================================
// Build Tool Integration
// ============================================================================

pub mod plugin;
pub use plugin::{EnvTypedPlugin, Host, WatchEvent, is_env_file};
