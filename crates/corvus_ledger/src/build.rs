//! Build assembly: folds every category's ledger into one consolidated
//! manifest.

use crate::Ledger;
use corvus_core::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, instrument};

/// Assemble a [`BuildManifest`] from an unpacked asset tree.
///
/// Categories are walked in [`AssetCategory::ALL`] order. Within a category a
/// duplicated relative path keeps the last record in row order; across
/// categories a later category overwrites an earlier one for the same path.
/// The per-category file listing keeps first-seen insertion order.
///
/// The version file is read before the hash ledger, so a missing version
/// file fails the run before any hash parsing starts.
#[instrument(skip_all, fields(root = %root.as_ref().display(), server, version))]
pub fn assemble(
    root: impl AsRef<Path>,
    server: &str,
    version: &str,
) -> Result<BuildManifest, LedgerError> {
    let ledger = Ledger::new(root.as_ref());
    let mut build = BuildManifest::new(server, version);

    for category in AssetCategory::ALL {
        let category_version = ledger.version(category)?;

        let mut files: HashMap<String, HashRecord> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for record in ledger.hashes(category)? {
            let record = record?;
            let path = record.filepath.clone();
            if files.insert(path.clone(), record).is_none() {
                order.push(path);
            }
        }
        debug!(category = %category, files = order.len(), "category ledger read");

        build.filemap.extend(files);
        build.categories.insert(
            category.name().to_string(),
            CategoryVersion {
                version: category_version,
                files: order,
            },
        );
    }

    Ok(build)
}
