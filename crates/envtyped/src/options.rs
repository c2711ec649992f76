//! Generator options and their defaults.
//!
//! Callers describe a generation with a partial [`EnvTypedOptions`]; every
//! missing field is filled from [`Defaults`] by [`merge_options`], producing
//! [`ResolvedOptions`]. Nothing is validated here: a bad output path only
//! surfaces when the declaration file is written.
//!
//! | Field | Default |
//! |-------|---------|
//! | `env_mode` | `NODE_ENV` from the process environment, empty if unset |
//! | `env_dir` | current working directory |
//! | `env_prefix` | `""` (every key) |
//! | `file_path` | `<cwd>/src/import_meta.d.ts` |
//! | `value_in_type` | `false` |
//! | `semi` | `true` |
//! | loader | [`NoopLoader`] |
//!
//! Partial options deserialize from camelCase keys (`envMode`, `envDir`,
//! `envPrefix`, `filePath`, `valueInType`, `semi`, `template`), see
//! [`EnvTypedOptions::from_file`].

use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::loader::{Loader, NoopLoader};
use crate::template::TemplateSource;

/// Environment variable that supplies the default mode.
pub const MODE_VAR: &str = "NODE_ENV";

/// Directory, relative to the working directory, of the default output file.
pub const DEFAULT_OUTPUT_DIR: &str = "src";

/// File name of the default output file.
pub const DEFAULT_OUTPUT_FILE: &str = "import_meta.d.ts";

// ============================================================================
// Prefix
// ============================================================================

/// One or more variable name prefixes used to select public variables.
///
/// Deserializes from either a string or an array of strings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvPrefix {
    /// A single prefix. The empty prefix matches every key.
    Single(String),

    /// Several prefixes; a key matches if it starts with any of them.
    Many(Vec<String>),
}

impl EnvPrefix {
    /// Returns the prefixes as a list.
    #[must_use]
    pub fn prefixes(&self) -> Vec<&str> {
        match self {
            Self::Single(p) => vec![p.as_str()],

            Self::Many(ps) => ps.iter().map(String::as_str).collect(),
        }
    }

    /// Returns `true` if `key` starts with one of the prefixes.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Single(p) => key.starts_with(p.as_str()),

            Self::Many(ps) => ps.iter().any(|p| key.starts_with(p.as_str())),
        }
    }
}

impl Default for EnvPrefix {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl From<&str> for EnvPrefix {
    fn from(prefix: &str) -> Self {
        Self::Single(prefix.to_string())
    }
}

impl From<String> for EnvPrefix {
    fn from(prefix: String) -> Self {
        Self::Single(prefix)
    }
}

impl From<Vec<String>> for EnvPrefix {
    fn from(prefixes: Vec<String>) -> Self {
        Self::Many(prefixes)
    }
}

impl<const N: usize> From<[&str; N]> for EnvPrefix {
    fn from(prefixes: [&str; N]) -> Self {
        Self::Many(prefixes.iter().map(ToString::to_string).collect())
    }
}

// ============================================================================
// Resolved options
// ============================================================================

/// Fully resolved options, handed to the loader and the generator.
///
/// This is everything except the loader itself.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    /// Build mode (`development`, `production`, ...).
    pub env_mode: String,

    /// Directory holding the `.env` files.
    pub env_dir: PathBuf,

    /// Prefix filter for public variables.
    pub env_prefix: EnvPrefix,

    /// Path of the generated declaration file.
    pub file_path: PathBuf,

    /// Emit literal values instead of primitive type names.
    pub value_in_type: bool,

    /// Terminate declarations with `;`.
    pub semi: bool,
}

// ============================================================================
// Partial options
// ============================================================================

/// Partial generator options. Absent fields take their [`Defaults`].
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnvTypedOptions {
    /// Build mode.
    pub env_mode: Option<String>,

    /// Directory holding the `.env` files.
    pub env_dir: Option<PathBuf>,

    /// Prefix filter for public variables.
    pub env_prefix: Option<EnvPrefix>,

    /// Path of the generated declaration file.
    pub file_path: Option<PathBuf>,

    /// Emit literal values instead of primitive type names.
    pub value_in_type: Option<bool>,

    /// Terminate declarations with `;`.
    pub semi: Option<bool>,

    /// Handlebars template file replacing the built-in one.
    pub template: Option<PathBuf>,

    /// Loader producing the environment map.
    #[serde(skip)]
    pub loader: Option<Box<dyn Loader>>,
}

impl EnvTypedOptions {
    /// Creates empty options; every field will take its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the build mode.
    #[must_use]
    pub fn with_env_mode(mut self, mode: impl Into<String>) -> Self {
        self.env_mode = Some(mode.into());
        self
    }

    /// Sets the directory holding the `.env` files.
    #[must_use]
    pub fn with_env_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.env_dir = Some(dir.into());
        self
    }

    /// Sets the prefix filter.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<EnvPrefix>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Sets the output path.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Selects literal values (`true`) or primitive type names (`false`).
    #[must_use]
    pub fn with_value_in_type(mut self, value_in_type: bool) -> Self {
        self.value_in_type = Some(value_in_type);
        self
    }

    /// Selects whether declarations end with `;`.
    #[must_use]
    pub fn with_semi(mut self, semi: bool) -> Self {
        self.semi = Some(semi);
        self
    }

    /// Replaces the built-in template with a file read on first use.
    #[must_use]
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    /// Sets the loader.
    #[must_use]
    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }
}

impl Debug for EnvTypedOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvTypedOptions")
            .field("env_mode", &self.env_mode)
            .field("env_dir", &self.env_dir)
            .field("env_prefix", &self.env_prefix)
            .field("file_path", &self.file_path)
            .field("value_in_type", &self.value_in_type)
            .field("semi", &self.semi)
            .field("template", &self.template)
            .field("loader", &self.loader.as_ref().map(|l| l.name()))
            .finish()
    }
}

// ============================================================================
// Defaults
// ============================================================================

/// The default option set, captured from the process.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Defaults {
    /// Default build mode.
    pub env_mode: String,

    /// Default `.env` directory.
    pub env_dir: PathBuf,

    /// Default output path.
    pub file_path: PathBuf,
}

impl Defaults {
    /// Captures defaults from `NODE_ENV` and the current working directory.
    #[must_use]
    pub fn capture() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            env_mode: std::env::var(MODE_VAR).unwrap_or_default(),
            file_path: cwd.join(DEFAULT_OUTPUT_DIR).join(DEFAULT_OUTPUT_FILE),
            env_dir: cwd,
        }
    }
}

/// Options after merging, split into the parts the generator owns.
pub struct MergedOptions {
    /// Resolved options.
    pub options: ResolvedOptions,

    /// The loader, or [`NoopLoader`] if none was given.
    pub loader: Box<dyn Loader>,

    /// Where the template comes from.
    pub template: TemplateSource,
}

/// Fills every absent field of `options` from `defaults`.
#[must_use]
pub fn merge_options(options: EnvTypedOptions, defaults: &Defaults) -> MergedOptions {
    let EnvTypedOptions {
        env_mode,
        env_dir,
        env_prefix,
        file_path,
        value_in_type,
        semi,
        template,
        loader,
    } = options;

    MergedOptions {
        options: ResolvedOptions {
            env_mode: env_mode.unwrap_or_else(|| defaults.env_mode.clone()),
            env_dir: env_dir.unwrap_or_else(|| defaults.env_dir.clone()),
            env_prefix: env_prefix.unwrap_or_default(),
            file_path: file_path.unwrap_or_else(|| defaults.file_path.clone()),
            value_in_type: value_in_type.unwrap_or(false),
            semi: semi.unwrap_or(true),
        },
        loader: loader.unwrap_or_else(|| Box::new(NoopLoader)),
        template: template.map_or(TemplateSource::Builtin, TemplateSource::File),
    }
}
