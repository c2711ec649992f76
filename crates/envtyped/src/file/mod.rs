//! Loading [`EnvTypedOptions`] from an options file.
//!
//! The file holds the same camelCase keys a JavaScript caller would pass:
//!
//! ```json
//! {
//!   "envPrefix": ["VITE_", "PUBLIC_"],
//!   "filePath": "src/env.d.ts",
//!   "valueInType": true,
//!   "semi": false
//! }
//! ```
//!
//! The format follows the extension (see [`FileFormat`]). Deserialization
//! runs through [`serde_path_to_error`], so a wrong type or an unknown key is
//! reported as [`FileError::InvalidOption`] naming the option, pointing at
//! its value, and suggesting the camelCase spelling of a near miss such as
//! `value_in_type`.
//!
//! Relative `envDir`, `filePath` and `template` paths in a file are taken
//! relative to the directory holding that file.

mod error;
mod format;

use std::path::{Path, PathBuf};

use miette::{NamedSource, SourceSpan};

pub use error::FileError;
pub use format::FileFormat;

use crate::EnvTypedOptions;

/// Source name used in diagnostics for options parsed from a string.
const INLINE_SOURCE: &str = "<inline>";

/// Every option a file may set, with the type it takes.
pub const OPTIONS: [(&str, &str); 7] = [
    ("envMode", "a string"),
    ("envDir", "a path string"),
    ("envPrefix", "a string or an array of strings"),
    ("filePath", "a path string"),
    ("valueInType", "a boolean"),
    ("semi", "a boolean"),
    ("template", "a path string"),
];

impl EnvTypedOptions {
    /// Reads options from a JSON (or, with the `toml` feature, TOML) file.
    ///
    /// The loader is never part of a file; attach one with
    /// [`with_loader`](Self::with_loader) afterwards.
    ///
    /// # Errors
    ///
    /// - [`FileError::UnsupportedExtension`] for an extension of no enabled format
    /// - [`FileError::Read`] if the file is missing or unreadable
    /// - [`FileError::Syntax`] for malformed content
    /// - [`FileError::InvalidOption`] for unknown options and wrong types
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use envtyped::EnvTypedOptions;
    /// use envtyped::loader::DotenvLoader;
    ///
    /// let options = EnvTypedOptions::from_file("envtyped.json")?
    ///     .with_loader(DotenvLoader::new());
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();

        let format = FileFormat::from_path(path).ok_or_else(|| FileError::UnsupportedExtension {
            path: path.to_path_buf(),
        })?;

        let content =
            std::fs::read_to_string(path).map_err(|e| FileError::read(path.to_path_buf(), e))?;

        let origin = path.display().to_string();
        let options = Document::new(&content, format, &origin).parse()?;

        tracing::debug!(path = %origin, format = %format, "loaded options file");

        match path.parent() {
            Some(base) if !base.as_os_str().is_empty() => Ok(options.relative_to(base)),

            _ => Ok(options),
        }
    }

    /// Parses options from a string in the given format.
    ///
    /// Relative paths are kept as written.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file), minus the I/O errors.
    pub fn from_str_as(content: &str, format: FileFormat) -> Result<Self, FileError> {
        Document::new(content, format, INLINE_SOURCE).parse()
    }

    fn relative_to(mut self, base: &Path) -> Self {
        let rebase = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };

        self.env_dir = self.env_dir.map(rebase);
        self.file_path = self.file_path.map(rebase);
        self.template = self.template.map(rebase);
        self
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Options file content being parsed, kept for diagnostics.
struct Document<'a> {
    content: &'a str,
    format: FileFormat,
    origin: &'a str,
}

impl<'a> Document<'a> {
    const fn new(content: &'a str, format: FileFormat, origin: &'a str) -> Self {
        Self {
            content,
            format,
            origin,
        }
    }

    fn parse(&self) -> Result<EnvTypedOptions, FileError> {
        match self.format {
            FileFormat::Json => {
                let mut de = serde_json::Deserializer::from_str(self.content);
                let options = serde_path_to_error::deserialize(&mut de).map_err(|e| {
                    let path = e.path().to_string();
                    self.json_error(&path, &e.into_inner())
                })?;

                de.end().map_err(|e| self.json_error("", &e))?;
                Ok(options)
            }

            #[cfg(feature = "toml")]
            FileFormat::Toml => {
                let document: toml::Value = toml::from_str(self.content).map_err(|e| {
                    self.syntax(e.span().map(SourceSpan::from), e.message().to_string())
                })?;

                serde_path_to_error::deserialize(document).map_err(|e| {
                    let path = e.path().to_string();
                    self.invalid_option(&path, e.into_inner().message().to_string(), None)
                })
            }
        }
    }

    fn json_error(&self, path: &str, e: &serde_json::Error) -> FileError {
        let at = self.point(e.line(), e.column());

        // Display appends " at line L column C", which the span already shows
        let mut message = e.to_string();
        if let Some(end) = message.rfind(" at line ") {
            message.truncate(end);
        }

        if e.is_data() {
            self.invalid_option(path, message, at)
        } else {
            self.syntax(at, message)
        }
    }

    fn syntax(&self, span: Option<SourceSpan>, message: String) -> FileError {
        FileError::Syntax {
            format: self.format,
            origin: self.origin.to_string(),
            src: self.source(),
            span,
            message,
        }
    }

    /// Builds the error for a rejected option.
    ///
    /// Unknown fields are reported at the document root, so their name is
    /// taken from the deserializer message instead of `path`.
    fn invalid_option(&self, path: &str, message: String, at: Option<SourceSpan>) -> FileError {
        let key = unknown_field(&message)
            .or_else(|| path.split(['.', '[']).next())
            .unwrap_or_default()
            .to_string();

        // A non-table document fails before any option is read
        if key.is_empty() {
            return self.syntax(at, message);
        }

        FileError::InvalidOption {
            help: option_help(&key),
            span: self.value_span(&key).or(at),
            origin: self.origin.to_string(),
            src: self.source(),
            key,
            message,
        }
    }

    fn source(&self) -> NamedSource<String> {
        NamedSource::new(self.origin, self.content.to_string())
    }

    /// One-character span at a 1-based line and column.
    fn point(&self, line: usize, column: usize) -> Option<SourceSpan> {
        if line == 0 {
            return None;
        }

        let line_start: usize = self
            .content
            .split_inclusive('\n')
            .take(line - 1)
            .map(str::len)
            .sum();
        let offset = (line_start + column.saturating_sub(1)).min(self.content.len());

        Some(SourceSpan::new(offset.into(), usize::from(offset < self.content.len())))
    }

    /// Span of the value assigned to the top-level option `key`.
    fn value_span(&self, key: &str) -> Option<SourceSpan> {
        let (needle, assign) = match self.format {
            FileFormat::Json => (format!("\"{key}\""), ':'),

            #[cfg(feature = "toml")]
            FileFormat::Toml => (key.to_string(), '='),
        };

        self.content.match_indices(&needle).find_map(|(at, _)| {
            let rest = self.content[at + needle.len()..].trim_start();
            let value = rest.strip_prefix(assign)?.trim_start();
            let start = self.content.len() - value.len();

            Some(SourceSpan::new(start.into(), token_len(value)))
        })
    }
}

/// Extracts `x` from serde's "unknown field `x`, expected ..." message.
fn unknown_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("unknown field `")?;
    rest.split_once('`').map(|(key, _)| key)
}

/// Length of the value token at the start of `text`.
fn token_len(text: &str) -> usize {
    let end = match text.chars().next() {
        Some('"') => text[1..].find('"').map(|i| i + 2),

        Some(open @ ('[' | '{')) => {
            let close = if open == '[' { ']' } else { '}' };
            text.find(close).map(|i| i + 1)
        }

        _ => text.find(['\n', ',', '}', ']', '#']).map(|i| text[..i].trim_end().len()),
    };

    end.unwrap_or(text.trim_end().len()).max(1)
}

fn fold_case(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Help for a rejected option: its expected type when the name is right, the
/// camelCase spelling when only the case differs, the full list otherwise.
fn option_help(key: &str) -> String {
    if let Some((_, expected)) = OPTIONS.iter().find(|(name, _)| *name == key) {
        return format!("`{key}` takes {expected}");
    }

    let folded = fold_case(key);
    if let Some((name, _)) = OPTIONS.iter().find(|(name, _)| fold_case(name) == folded) {
        return format!("did you mean `{name}`? option names are camelCase");
    }

    let names: Vec<String> = OPTIONS.iter().map(|(name, _)| format!("`{name}`")).collect();
    format!("valid options are {}", names.join(", "))
}
