//! Drives the Vite adapter the way a dev server would.
//!
//! Writes a `.env` family into a temporary project, generates the
//! declarations on build start, edits `.env.local` and forwards the change.
//!
//! Run with:
//! ```sh
//! RUST_LOG=envtyped=debug cargo run --example vite_plugin
//! ```

use std::fs;

use envtyped::{EnvTypedOptions, EnvTypedPlugin, WatchEvent};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

fn main() -> envtyped::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("envtyped=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let project = tempfile::tempdir().into_diagnostic()?;
    let root = project.path();

    fs::write(
        root.join(".env"),
        "VITE_API_URL=http://localhost:3000\nVITE_PORT=3000\nDATABASE_URL=postgres://secret\n",
    )
    .into_diagnostic()?;
    fs::write(root.join(".env.development"), "VITE_FEATURES={\"beta\":true}\n")
        .into_diagnostic()?;

    let plugin = EnvTypedPlugin::vite(
        EnvTypedOptions::new()
            .with_env_dir(root)
            .with_env_mode("development")
            .with_env_prefix("VITE_")
            .with_file_path(root.join("src").join("import_meta.d.ts")),
    );

    let report = plugin.on_build_start()?;
    println!("{}:\n", report.path.display());
    println!("{}", fs::read_to_string(&report.path).into_diagnostic()?);

    fs::write(root.join(".env.local"), "VITE_DEBUG=true\nVITE_TITLE=My App\n")
        .into_diagnostic()?;

    if let Some(report) = plugin.on_watch_event(&WatchEvent::Change(root.join(".env.local")))? {
        for fallback in &report.fallbacks {
            println!("note: {fallback}");
        }
        println!("\nafter editing .env.local:\n");
        println!("{}", fs::read_to_string(&report.path).into_diagnostic()?);
    }

    Ok(())
}
