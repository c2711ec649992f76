//! Options file errors.

use std::io;
use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};

use super::FileFormat;

/// Error reading [`EnvTypedOptions`](crate::EnvTypedOptions) from a file.
///
/// Syntax and option errors carry the file content so [`miette`] can point at
/// the offending value:
///
/// ```text
/// Error: invalid option `valueInType` in envtyped.json
///    ╭─[envtyped.json:3:18]
///  3 │   "valueInType": "yes"
///    │                  ^^^^^ invalid type: string "yes", expected a boolean
///    ╰────
///   help: `valueInType` takes a boolean
/// ```
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum FileError {
    /// The file could not be read. A missing file is
    /// [`io::ErrorKind::NotFound`].
    #[error("cannot read options file {}", .path.display())]
    #[diagnostic(code(envtyped::file::read))]
    Read {
        /// The options file.
        path: PathBuf,

        /// The I/O failure.
        #[source]
        source: io::Error,

        /// Hint for the common failure kinds.
        #[help]
        hint: Option<String>,
    },

    /// The extension names no supported format.
    #[error("unsupported options file {}", .path.display())]
    #[diagnostic(
        code(envtyped::file::extension),
        help("options files end in .json, or .toml with the `toml` feature")
    )]
    UnsupportedExtension {
        /// The options file.
        path: PathBuf,
    },

    /// The content is not a well-formed document of its format.
    #[error("invalid {format} in {origin}")]
    #[diagnostic(
        code(envtyped::file::syntax),
        help("an options file holds a single table of camelCase options")
    )]
    Syntax {
        /// Format the content was parsed as.
        format: FileFormat,

        /// File path, or `<inline>` for parsed strings.
        origin: String,

        /// The content, for rendering.
        #[source_code]
        src: NamedSource<String>,

        /// Where parsing stopped, when known.
        #[label("{message}")]
        span: Option<SourceSpan>,

        /// Parser message.
        message: String,
    },

    /// An option has the wrong type or is not an option at all.
    #[error("invalid option `{key}` in {origin}")]
    #[diagnostic(code(envtyped::file::option))]
    InvalidOption {
        /// The option name as written in the file.
        key: String,

        /// File path, or `<inline>` for parsed strings.
        origin: String,

        /// The content, for rendering.
        #[source_code]
        src: NamedSource<String>,

        /// The option's value, when it can be located.
        #[label("{message}")]
        span: Option<SourceSpan>,

        /// Deserializer message.
        message: String,

        /// Expected type, a spelling suggestion, or the list of options.
        #[help]
        help: String,
    },
}

impl FileError {
    pub(crate) fn read(path: PathBuf, source: io::Error) -> Self {
        let hint = match source.kind() {
            io::ErrorKind::NotFound => Some(
                "no file at this path; relative paths resolve against the working directory",
            ),

            io::ErrorKind::PermissionDenied => Some("the file is not readable by this process"),

            io::ErrorKind::InvalidData => Some("options files must be UTF-8"),

            _ => None,
        };

        Self::Read {
            path,
            source,
            hint: hint.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_hint_follows_error_kind() {
        let missing = FileError::read(
            PathBuf::from("envtyped.json"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(matches!(missing, FileError::Read { hint: Some(ref h), .. } if h.contains("no file")));
        assert_eq!(missing.to_string(), "cannot read options file envtyped.json");

        let other = FileError::read(
            PathBuf::from("envtyped.json"),
            io::Error::from(io::ErrorKind::Interrupted),
        );
        assert!(matches!(other, FileError::Read { hint: None, .. }));
    }
}
