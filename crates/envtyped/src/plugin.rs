//! Build tool plugin adapters.
//!
//! The host build tool owns the lifecycle and the file watcher; the plugin
//! only decides when to regenerate:
//!
//! | Host | Enforce | Build hook | Watch events |
//! |------|---------|------------|--------------|
//! | [`Host::Vite`] | `pre` | `buildStart` | `change`, `unlink` of env files |
//! | [`Host::Rsbuild`] | - | `onBeforeBuild` | ignored |
//!
//! A path is an env file when its text starts with `<env_dir>/.env`, so
//! `.env`, `.env.local` and `.env.production.local` all count.
//!
//! # Example
//!
//! ```rust,ignore
//! use envtyped::plugin::{EnvTypedPlugin, WatchEvent};
//! use envtyped::EnvTypedOptions;
//!
//! let plugin = EnvTypedPlugin::vite(EnvTypedOptions::new().with_env_prefix("VITE_"));
//! plugin.on_build_start()?;
//!
//! // wired to the dev server's watcher
//! plugin.on_watch_event(&WatchEvent::Change(".env.local".into()))?;
//! ```

use std::path::{Path, PathBuf};

use crate::loader::Loader;
use crate::{EnvTyped, EnvTypedOptions, Error, GenerateReport};

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "envtyped";

/// File name prefix shared by every env file.
pub const ENV_FILE_PREFIX: &str = ".env";

/// The build tool hosting the plugin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Host {
    /// Vite: regenerates on build start and on env file changes.
    Vite,

    /// Rsbuild: regenerates before each build.
    Rsbuild,
}

/// Plugin ordering hint for hosts that support it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Enforce {
    /// Run before the host's own plugins.
    Pre,
}

/// A file system event forwarded by the host's watcher.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WatchEvent {
    /// A file was created.
    Add(PathBuf),

    /// A file was modified.
    Change(PathBuf),

    /// A file was removed.
    Unlink(PathBuf),
}

impl WatchEvent {
    /// Returns the path the event is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Add(p) | Self::Change(p) | Self::Unlink(p) => p,
        }
    }

    /// Returns `true` for the events that trigger regeneration.
    #[must_use]
    pub const fn is_regenerating(&self) -> bool {
        matches!(self, Self::Change(_) | Self::Unlink(_))
    }
}

/// Returns `true` if `file` is an env file inside `env_dir`.
///
/// This is a plain text prefix check against `env_dir/.env`.
#[must_use]
pub fn is_env_file(file: &Path, env_dir: &Path) -> bool {
    let prefix = env_dir.join(ENV_FILE_PREFIX);
    file.to_string_lossy()
        .starts_with(prefix.to_string_lossy().as_ref())
}

/// The generator wired to a host build tool.
#[derive(Debug)]
pub struct EnvTypedPlugin {
    host: Host,
    generator: EnvTyped,
}

impl EnvTypedPlugin {
    /// Creates the Vite adapter.
    ///
    /// Without an explicit loader, env files are read for the mode and
    /// matching process variables override them.
    #[must_use]
    pub fn vite(mut options: EnvTypedOptions) -> Self {
        if options.loader.is_none() {
            options.loader = Some(Self::default_loader(Host::Vite));
        }

        Self::new(Host::Vite, options)
    }

    /// Creates the Rsbuild adapter.
    ///
    /// Without an explicit loader, every key of the env files is declared,
    /// regardless of the prefix. Process variables are not read.
    #[must_use]
    pub fn rsbuild(mut options: EnvTypedOptions) -> Self {
        if options.loader.is_none() {
            options.loader = Some(Self::default_loader(Host::Rsbuild));
        }

        Self::new(Host::Rsbuild, options)
    }

    /// Creates an adapter for `host` using the loader in `options` as is.
    #[must_use]
    pub fn new(host: Host, options: EnvTypedOptions) -> Self {
        Self {
            host,
            generator: EnvTyped::new(options),
        }
    }

    #[cfg(feature = "dotenv")]
    fn default_loader(host: Host) -> Box<dyn Loader> {
        use crate::loader::DotenvLoader;

        match host {
            Host::Vite => Box::new(DotenvLoader::new().with_process_env()),

            Host::Rsbuild => Box::new(DotenvLoader::parsed()),
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn default_loader(_host: Host) -> Box<dyn Loader> {
        Box::new(crate::loader::SnapshotLoader::from_process_env())
    }

    /// Returns the plugin name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Returns the host build tool.
    #[must_use]
    pub const fn host(&self) -> Host {
        self.host
    }

    /// Returns the ordering hint, if the host uses one.
    #[must_use]
    pub const fn enforce(&self) -> Option<Enforce> {
        match self.host {
            Host::Vite => Some(Enforce::Pre),

            Host::Rsbuild => None,
        }
    }

    /// Returns the wrapped generator.
    #[must_use]
    pub const fn generator(&self) -> &EnvTyped {
        &self.generator
    }

    /// Returns `true` if the host forwards watch events to this plugin.
    #[must_use]
    pub const fn watches_env_files(&self) -> bool {
        matches!(self.host, Host::Vite)
    }

    /// Build hook: Vite `buildStart`, Rsbuild `onBeforeBuild`.
    ///
    /// # Errors
    ///
    /// Any generation error, to be surfaced as a failed build.
    pub fn on_build_start(&self) -> Result<GenerateReport, Error> {
        tracing::debug!(host = ?self.host, "build starting, generating env declarations");
        self.generator.generate()
    }

    /// Rsbuild `onBeforeBuild`; same as [`on_build_start`](Self::on_build_start).
    ///
    /// # Errors
    ///
    /// Any generation error.
    pub fn on_before_build(&self) -> Result<GenerateReport, Error> {
        self.on_build_start()
    }

    /// Watch hook: regenerates when an env file changed or was removed.
    ///
    /// Returns `Ok(None)` when the event is ignored.
    ///
    /// # Errors
    ///
    /// Any generation error.
    pub fn on_watch_event(&self, event: &WatchEvent) -> Result<Option<GenerateReport>, Error> {
        if !self.watches_env_files()
            || !event.is_regenerating()
            || !is_env_file(event.path(), &self.generator.options().env_dir)
        {
            return Ok(None);
        }

        tracing::info!(file = %event.path().display(), "env file changed, regenerating declarations");
        self.generator.generate().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_env_file() {
        let dir = Path::new("/project");
        assert!(is_env_file(Path::new("/project/.env"), dir));
        assert!(is_env_file(Path::new("/project/.env.local"), dir));
        assert!(is_env_file(Path::new("/project/.env.production.local"), dir));
        assert!(!is_env_file(Path::new("/project/src/main.ts"), dir));
        assert!(!is_env_file(Path::new("/other/.env"), dir));
        assert!(!is_env_file(Path::new("/project/config/.env"), dir));
    }

    #[test]
    fn test_watch_event_kinds() {
        assert!(WatchEvent::Change(PathBuf::from(".env")).is_regenerating());
        assert!(WatchEvent::Unlink(PathBuf::from(".env")).is_regenerating());
        assert!(!WatchEvent::Add(PathBuf::from(".env")).is_regenerating());
        assert_eq!(
            WatchEvent::Unlink(PathBuf::from("/a/.env")).path(),
            Path::new("/a/.env")
        );
    }

    #[test]
    fn test_host_metadata() {
        let vite = EnvTypedPlugin::vite(EnvTypedOptions::new());
        assert_eq!(vite.name(), "envtyped");
        assert_eq!(vite.enforce(), Some(Enforce::Pre));
        assert!(vite.watches_env_files());

        let rsbuild = EnvTypedPlugin::rsbuild(EnvTypedOptions::new());
        assert_eq!(rsbuild.host(), Host::Rsbuild);
        assert_eq!(rsbuild.enforce(), None);
        assert!(!rsbuild.watches_env_files());
    }
}
