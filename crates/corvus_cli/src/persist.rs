//! Durable build output: the global version index and the per-server
//! snapshot.

use anyhow::{Context, Result};
use corvus_core::manifest::BuildManifest;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Name of the global server-to-version index file.
const VERSION_INDEX: &str = "version.json";

/// Write the build outputs under `dir`.
///
/// `version.json` is merged with any existing contents so other servers'
/// entries survive; absent or unparseable prior contents are treated as an
/// empty index. `<server>.json` is replaced wholesale with the full
/// snapshot.
pub fn save(build: &BuildManifest, dir: &Path) -> Result<()> {
    let index_path = dir.join(VERSION_INDEX);
    let mut index: HashMap<String, String> = fs::read_to_string(&index_path)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default();
    index.insert(build.server.clone(), build.version.clone());
    fs::write(&index_path, serde_json::to_string_pretty(&index)?)
        .with_context(|| format!("writing {}", index_path.display()))?;

    let snapshot_path = dir.join(format!("{}.json", build.server));
    fs::write(&snapshot_path, serde_json::to_string_pretty(build)?)
        .with_context(|| format!("writing {}", snapshot_path.display()))?;

    Ok(())
}
