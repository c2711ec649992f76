//! Environment snapshot loader.

use super::{EnvMap, Loader, LoaderError};
use crate::ResolvedOptions;

/// Loader that filters a fixed environment snapshot by prefix.
///
/// The snapshot is taken once, at construction. Each load returns the
/// snapshot entries whose key starts with one of the configured prefixes,
/// in snapshot order.
///
/// # Example
///
/// ```rust,ignore
/// use envtyped::loader::SnapshotLoader;
///
/// // Whatever the process environment holds right now
/// let loader = SnapshotLoader::from_process_env();
///
/// // Explicit pairs
/// let loader = SnapshotLoader::new([("VITE_PORT", "3000"), ("SECRET", "x")]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SnapshotLoader {
    snapshot: EnvMap,
}

impl SnapshotLoader {
    /// Creates a loader over the given pairs.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            snapshot: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Snapshots the process environment, skipping non-UTF-8 entries.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self {
            snapshot: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Returns the unfiltered snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &EnvMap {
        &self.snapshot
    }
}

impl Loader for SnapshotLoader {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn load(&self, options: &ResolvedOptions) -> Result<EnvMap, LoaderError> {
        Ok(self
            .snapshot
            .iter()
            .filter(|(key, _)| options.env_prefix.matches(key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Defaults, EnvTypedOptions, merge_options};

    fn options_with_prefix(prefix: &str) -> ResolvedOptions {
        merge_options(
            EnvTypedOptions::new().with_env_prefix(prefix),
            &Defaults::capture(),
        )
        .options
    }

    #[test]
    fn test_snapshot_filters_by_prefix() {
        let loader = SnapshotLoader::new([
            ("VITE_API_URL", "http://localhost:3000"),
            ("DATABASE_URL", "postgres://localhost/db"),
            ("VITE_PORT", "3000"),
        ]);

        let map = loader.load(&options_with_prefix("VITE_")).unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["VITE_API_URL", "VITE_PORT"]);
    }

    #[test]
    fn test_empty_prefix_keeps_everything() {
        let loader = SnapshotLoader::new([("A", "1"), ("B", "2")]);
        let map = loader.load(&options_with_prefix("")).unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_process_snapshot_is_not_empty() {
        // PATH (or some variable) is always present under cargo test
        let loader = SnapshotLoader::from_process_env();
        assert!(!loader.snapshot().is_empty());
    }
}
