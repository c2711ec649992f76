//! Dotenv file loader.

use std::path::{Path, PathBuf};

use super::{EnvMap, Loader, LoaderError};
use crate::ResolvedOptions;

/// Loader that reads the `.env` file family for the configured mode.
///
/// Files are read from `env_dir` in this order, later files overriding
/// earlier ones:
///
/// 1. `.env`
/// 2. `.env.local`
/// 3. `.env.<mode>`
/// 4. `.env.<mode>.local`
///
/// Missing files are skipped, as are the mode files when the mode is empty.
/// The process environment is NOT modified.
///
/// | Constructor | File keys | Process env |
/// |-------------|-----------|-------------|
/// | [`new`](Self::new) | matching the prefix | - |
/// | [`parsed`](Self::parsed) | all | - |
/// | [`with_process_env`](Self::with_process_env) | unchanged | matching the prefix, on top |
///
/// # Example
///
/// ```rust,ignore
/// use envtyped::loader::DotenvLoader;
///
/// // Files only, prefix-filtered
/// let loader = DotenvLoader::new();
///
/// // Every key of the files, like Rsbuild's `loadEnv().parsed`
/// let loader = DotenvLoader::parsed();
///
/// // Files, then matching process variables on top
/// let loader = DotenvLoader::new().with_process_env();
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DotenvLoader {
    process_env: bool,
    filter_files: bool,
}

impl Default for DotenvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DotenvLoader {
    /// Creates a loader that reads env files and keeps keys matching the prefix.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            process_env: false,
            filter_files: true,
        }
    }

    /// Creates a loader that keeps every key of the env files.
    ///
    /// The prefix then only applies to process variables, if enabled.
    #[must_use]
    pub const fn parsed() -> Self {
        Self {
            process_env: false,
            filter_files: false,
        }
    }

    /// Lets matching process environment variables override file values.
    #[must_use]
    pub const fn with_process_env(mut self) -> Self {
        self.process_env = true;
        self
    }

    /// Returns the candidate env files for `mode`, in load order.
    #[must_use]
    pub fn env_files(env_dir: &Path, mode: &str) -> Vec<PathBuf> {
        let mut files = vec![env_dir.join(".env"), env_dir.join(".env.local")];

        if !mode.is_empty() {
            files.push(env_dir.join(format!(".env.{mode}")));
            files.push(env_dir.join(format!(".env.{mode}.local")));
        }

        files
    }

    /// Parses one env file into `values`, overriding existing keys.
    fn read_file(path: &Path, values: &mut EnvMap) -> Result<(), LoaderError> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| Self::map_error(path, e))?;

        for item in iter {
            let (key, value) = item.map_err(|e| Self::map_error(path, e))?;
            values.insert(key, value);
        }

        Ok(())
    }

    fn map_error(path: &Path, error: dotenvy::Error) -> LoaderError {
        match error {
            dotenvy::Error::Io(source) => LoaderError::Io {
                path: path.to_path_buf(),
                source,
            },

            dotenvy::Error::LineParse(line, index) => LoaderError::Parse {
                path: path.to_path_buf(),
                message: format!("invalid line at offset {index}: {line}"),
            },

            other => LoaderError::Parse {
                path: path.to_path_buf(),
                message: other.to_string(),
            },
        }
    }
}

impl Loader for DotenvLoader {
    fn name(&self) -> &'static str {
        "dotenv"
    }

    fn load(&self, options: &ResolvedOptions) -> Result<EnvMap, LoaderError> {
        let mut values = EnvMap::new();
        let prefix = &options.env_prefix;

        for path in Self::env_files(&options.env_dir, &options.env_mode) {
            if !path.is_file() {
                continue;
            }

            tracing::debug!(path = %path.display(), "reading env file");
            Self::read_file(&path, &mut values)?;
        }

        if self.filter_files {
            values.retain(|key, _| prefix.matches(key));
        }

        if self.process_env {
            for (key, value) in std::env::vars_os() {
                if let (Ok(key), Ok(value)) = (key.into_string(), value.into_string())
                    && prefix.matches(&key)
                {
                    values.insert(key, value);
                }
            }
        }

        Ok(values)
    }
}
