//! Options file formats.

use std::fmt;
use std::path::Path;

/// A format an options file can be written in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileFormat {
    /// `.json`
    Json,

    /// `.toml`, with the `toml` feature.
    #[cfg(feature = "toml")]
    Toml,
}

impl FileFormat {
    /// Every format enabled in this build.
    pub const ENABLED: &'static [Self] = &[
        Self::Json,
        #[cfg(feature = "toml")]
        Self::Toml,
    ];

    /// The file extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",

            #[cfg(feature = "toml")]
            Self::Toml => "toml",
        }
    }

    /// Picks the format whose extension matches `path`, ignoring case.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        Self::ENABLED
            .iter()
            .copied()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",

            #[cfg(feature = "toml")]
            Self::Toml => "TOML",
        })
    }
}
