//! Build tool adapter tests.

#![allow(clippy::pedantic)]

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use envtyped::{EnvMap, EnvTypedOptions, EnvTypedPlugin, Host, WatchEvent, loader_fn};

/// Options writing into `dir` with a loader that counts its calls.
fn counted_options(dir: &Path, calls: &Arc<AtomicUsize>) -> EnvTypedOptions {
    let counter = Arc::clone(calls);

    EnvTypedOptions::new()
        .with_env_dir(dir)
        .with_file_path(dir.join("src").join("import_meta.d.ts"))
        .with_loader(loader_fn("counting", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(EnvMap::from([("VITE_PORT".to_string(), "3000".to_string())]))
        }))
}

#[test]
fn test_vite_build_start_generates() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let plugin = EnvTypedPlugin::vite(counted_options(dir.path(), &calls));

    let report = plugin.on_build_start().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let out = fs::read_to_string(report.path).unwrap();
    assert!(out.contains("readonly VITE_PORT: number;"));
}

#[test]
fn test_vite_regenerates_on_env_file_change_and_unlink() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let plugin = EnvTypedPlugin::vite(counted_options(dir.path(), &calls));

    let changed = plugin
        .on_watch_event(&WatchEvent::Change(dir.path().join(".env")))
        .unwrap();
    assert!(changed.is_some());

    let removed = plugin
        .on_watch_event(&WatchEvent::Unlink(dir.path().join(".env.production.local")))
        .unwrap();
    assert!(removed.is_some());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_vite_ignores_unrelated_events() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let plugin = EnvTypedPlugin::vite(counted_options(dir.path(), &calls));

    let ignored = [
        WatchEvent::Change(dir.path().join("src").join("main.ts")),
        WatchEvent::Add(dir.path().join(".env.local")),
        WatchEvent::Change(dir.path().join("nested").join(".env")),
        WatchEvent::Unlink(Path::new("/somewhere/else/.env").to_path_buf()),
    ];

    for event in &ignored {
        assert!(plugin.on_watch_event(event).unwrap().is_none(), "{event:?}");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("src").join("import_meta.d.ts").exists());
}

#[test]
fn test_rsbuild_generates_before_build_only() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let plugin = EnvTypedPlugin::rsbuild(counted_options(dir.path(), &calls));

    assert_eq!(plugin.host(), Host::Rsbuild);
    assert!(
        plugin
            .on_watch_event(&WatchEvent::Change(dir.path().join(".env")))
            .unwrap()
            .is_none()
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    plugin.on_before_build().unwrap();
    plugin.on_before_build().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_user_loader_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    for plugin in [
        EnvTypedPlugin::vite(counted_options(dir.path(), &calls)),
        EnvTypedPlugin::rsbuild(counted_options(dir.path(), &calls)),
    ] {
        plugin.on_build_start().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[cfg(feature = "dotenv")]
#[test]
fn test_default_loader_reads_env_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".env"), "VITE_TITLE=\"hello\"\nOTHER=1\n").unwrap();

    let plugin = EnvTypedPlugin::rsbuild(
        EnvTypedOptions::new()
            .with_env_dir(dir.path())
            .with_env_mode("")
            .with_env_prefix("VITE_")
            .with_value_in_type(true)
            .with_file_path(dir.path().join("env.d.ts")),
    );

    let report = plugin.on_build_start().unwrap();
    let out = fs::read_to_string(report.path).unwrap();

    assert!(out.contains("readonly VITE_TITLE: 'hello';"));
    assert!(out.contains("readonly OTHER: 1;"));
}

#[cfg(feature = "dotenv")]
#[test]
fn test_rsbuild_default_loader_ignores_prefix() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".env"), "VITE_A=1\nDATABASE_URL=x\n").unwrap();

    let plugin = EnvTypedPlugin::rsbuild(
        EnvTypedOptions::new()
            .with_env_dir(dir.path())
            .with_env_mode("")
            .with_env_prefix("VITE_")
            .with_file_path(dir.path().join("env.d.ts")),
    );

    let report = plugin.on_before_build().unwrap();
    let names: Vec<_> = report.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["VITE_A", "DATABASE_URL"]);

    let out = fs::read_to_string(report.path).unwrap();
    assert!(out.contains("readonly VITE_A: number;"));
    assert!(out.contains("readonly DATABASE_URL: string;"));
}

#[cfg(feature = "dotenv")]
#[test]
fn test_vite_default_loader_filters_prefix() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".env"), "VITE_A=1\nDATABASE_URL=x\n").unwrap();

    let plugin = EnvTypedPlugin::vite(
        EnvTypedOptions::new()
            .with_env_dir(dir.path())
            .with_env_mode("")
            .with_env_prefix("VITE_")
            .with_file_path(dir.path().join("env.d.ts")),
    );

    let out = fs::read_to_string(plugin.on_build_start().unwrap().path).unwrap();
    assert!(out.contains("readonly VITE_A: number;"));
    assert!(!out.contains("DATABASE_URL"));
}

#[cfg(feature = "dotenv")]
#[test]
fn test_vite_picks_up_edited_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join(".env");
    let out_file = dir.path().join("env.d.ts");
    fs::write(&env_file, "VITE_PORT=3000\n").unwrap();

    let plugin = EnvTypedPlugin::vite(
        EnvTypedOptions::new()
            .with_env_dir(dir.path())
            .with_env_mode("")
            .with_env_prefix("VITE_")
            .with_loader(envtyped::DotenvLoader::new())
            .with_file_path(&out_file),
    );

    plugin.on_build_start().unwrap();
    assert!(fs::read_to_string(&out_file).unwrap().contains("VITE_PORT: number;"));

    fs::write(&env_file, "VITE_PORT=3000\nVITE_NAME=demo\n").unwrap();
    plugin
        .on_watch_event(&WatchEvent::Change(env_file.clone()))
        .unwrap();
    assert!(fs::read_to_string(&out_file).unwrap().contains("VITE_NAME: string;"));

    fs::remove_file(&env_file).unwrap();
    plugin.on_watch_event(&WatchEvent::Unlink(env_file)).unwrap();
    let out = fs::read_to_string(&out_file).unwrap();
    assert!(!out.contains("VITE_PORT"));
    assert!(!out.contains("VITE_NAME"));
}
