use crate::ExtractError;
use crate::unpack::{copy_buffered, unpack_archive};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};
use zip::ZipArchive;
use zip::result::ZipError;

/// Name of the declaration manifest inside the outer container.
const PACKAGE_MANIFEST: &str = "manifest.json";

/// How inner archives are pulled out of the outer container.
///
/// Chosen once per run; the extraction algorithm itself is mode-agnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractMode {
    /// Load each inner archive fully into memory before unpacking.
    #[default]
    InMemory,
    /// Spool each inner archive to a temporary file first, keeping memory
    /// use bounded. Required when inner archives are large relative to
    /// available memory.
    Streamed,
}

impl ExtractMode {
    fn strategy(self) -> &'static dyn InnerUnpack {
        match self {
            ExtractMode::InMemory => &InMemory,
            ExtractMode::Streamed => &Streamed,
        }
    }
}

/// Declaration manifest of the outer container.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    expansions: Vec<Expansion>,
}

/// One declared inner archive.
#[derive(Debug, Deserialize)]
struct Expansion {
    /// Entry path of the inner archive within the outer container.
    file: String,
}

/// One way of getting a declared inner archive out of the outer container
/// and unpacked into the destination tree.
trait InnerUnpack {
    fn unpack(
        &self,
        outer: &mut ZipArchive<File>,
        entry: &str,
        dest: &Path,
    ) -> Result<(), ExtractError>;
}

struct InMemory;

impl InnerUnpack for InMemory {
    fn unpack(
        &self,
        outer: &mut ZipArchive<File>,
        entry: &str,
        dest: &Path,
    ) -> Result<(), ExtractError> {
        let mut inner = match outer.by_name(entry) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(ExtractError::MissingEntry(entry.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(entry, size = inner.size(), "loading inner archive into memory");
        let mut bytes = Vec::with_capacity(inner.size() as usize);
        inner.read_to_end(&mut bytes)?;
        drop(inner);

        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        unpack_archive(&mut archive, dest)
    }
}

struct Streamed;

impl InnerUnpack for Streamed {
    fn unpack(
        &self,
        outer: &mut ZipArchive<File>,
        entry: &str,
        dest: &Path,
    ) -> Result<(), ExtractError> {
        let mut inner = match outer.by_name(entry) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(ExtractError::MissingEntry(entry.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(entry, size = inner.size(), "spooling inner archive to disk");
        let mut tmp = NamedTempFile::new()?;
        copy_buffered(&mut inner, tmp.as_file_mut())?;
        drop(inner);

        let mut archive = ZipArchive::new(tmp.reopen()?)?;
        unpack_archive(&mut archive, dest)?;

        // The temporary must be gone before the next inner archive starts.
        tmp.close()?;
        Ok(())
    }
}

/// Unpack an outer container into `dest`, returning the populated tree root.
///
/// Any pre-existing destination tree is removed first; extraction always
/// starts from a clean slate, so a rerun leaves no stale files behind (and
/// discards any local edits). Inner archives are processed strictly in
/// manifest declaration order, one at a time; each completes, including
/// temporary-file cleanup, before the next begins. The first failure aborts
/// the whole extraction.
#[instrument(skip_all, fields(source = %source.display(), mode = ?mode))]
pub fn extract_package(
    source: &Path,
    dest: &Path,
    mode: ExtractMode,
) -> Result<PathBuf, ExtractError> {
    if dest.exists() {
        info!(dest = %dest.display(), "removing previous asset tree");
        fs::remove_dir_all(dest)?;
    }

    let mut outer = ZipArchive::new(File::open(source)?)?;

    debug!("reading package manifest");
    let manifest: PackageManifest = {
        let entry = match outer.by_name(PACKAGE_MANIFEST) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(ExtractError::MissingEntry(PACKAGE_MANIFEST.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_reader(entry)?
    };

    info!(
        expansions = manifest.expansions.len(),
        "unpacking inner archives"
    );
    let strategy = mode.strategy();
    for expansion in &manifest.expansions {
        strategy.unpack(&mut outer, &expansion.file, dest)?;
    }

    Ok(dest.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::TempDir;
    use walkdir::WalkDir;
    use zip::write::SimpleFileOptions;

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Write an outer container whose manifest declares the given inner
    /// archives in order.
    fn write_package(dir: &Path, inner: &[(&str, Vec<u8>)]) -> PathBuf {
        let declarations: Vec<String> = inner
            .iter()
            .map(|(name, _)| format!(r#"{{"file":"{name}"}}"#))
            .collect();
        let manifest = format!(r#"{{"expansions":[{}]}}"#, declarations.join(","));

        let mut entries: Vec<(&str, &[u8])> = vec![(PACKAGE_MANIFEST, manifest.as_bytes())];
        for (name, data) in inner {
            entries.push((*name, data.as_slice()));
        }

        let path = dir.join("package.xapk");
        fs::write(&path, zip_bytes(&entries)).unwrap();
        path
    }

    fn tree_contents(root: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut contents = BTreeMap::new();
        for entry in WalkDir::new(root) {
            let entry = entry.unwrap();
            if entry.file_type().is_file() {
                let relative = entry
                    .path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                contents.insert(relative, fs::read(entry.path()).unwrap());
            }
        }
        contents
    }

    #[test]
    fn unpacks_declared_archives_into_one_tree() {
        let dir = TempDir::new().unwrap();
        let first = zip_bytes(&[("assets/a/one.bin", b"one")]);
        let second = zip_bytes(&[("assets/b/two.bin.ys", b"two")]);
        let source = write_package(dir.path(), &[("main.obb", first), ("patch.obb", second)]);

        let dest = dir.path().join("EN");
        let root = extract_package(&source, &dest, ExtractMode::InMemory).unwrap();

        assert_eq!(root, dest);
        let contents = tree_contents(&dest);
        assert_eq!(contents["a/one.bin"], b"one");
        assert_eq!(contents["b/two.bin"], b"two");
    }

    #[test]
    fn both_modes_produce_identical_trees() {
        let dir = TempDir::new().unwrap();
        let first = zip_bytes(&[
            ("assets/shared/data.bin", b"payload-1"),
            ("assets/deep/nested/tree/file.ys", b"payload-2"),
        ]);
        let second = zip_bytes(&[("assets/more/other.png", b"payload-3")]);
        let source = write_package(dir.path(), &[("main.obb", first), ("patch.obb", second)]);

        let direct = dir.path().join("direct");
        let streamed = dir.path().join("streamed");
        extract_package(&source, &direct, ExtractMode::InMemory).unwrap();
        extract_package(&source, &streamed, ExtractMode::Streamed).unwrap();

        let direct_tree = tree_contents(&direct);
        assert!(!direct_tree.is_empty());
        assert_eq!(direct_tree, tree_contents(&streamed));
    }

    #[test]
    fn declaration_order_decides_collisions() {
        let dir = TempDir::new().unwrap();
        let first = zip_bytes(&[("assets/dup.txt", b"from-first")]);
        let second = zip_bytes(&[("assets/dup.txt", b"from-second")]);
        let source = write_package(dir.path(), &[("main.obb", first), ("patch.obb", second)]);

        let dest = dir.path().join("EN");
        extract_package(&source, &dest, ExtractMode::Streamed).unwrap();

        // The later declaration overwrote the earlier one.
        assert_eq!(fs::read(dest.join("dup.txt")).unwrap(), b"from-second");
    }

    #[test]
    fn stale_files_are_removed_from_destination() {
        let dir = TempDir::new().unwrap();
        let inner = zip_bytes(&[("assets/fresh.bin", b"fresh")]);
        let source = write_package(dir.path(), &[("main.obb", inner)]);

        let dest = dir.path().join("EN");
        fs::create_dir_all(dest.join("old")).unwrap();
        fs::write(dest.join("old/stale.bin"), b"stale").unwrap();

        extract_package(&source, &dest, ExtractMode::InMemory).unwrap();

        assert!(!dest.join("old/stale.bin").exists());
        assert_eq!(fs::read(dest.join("fresh.bin")).unwrap(), b"fresh");
    }

    #[test]
    fn missing_manifest_is_reported_by_name() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("package.xapk");
        fs::write(&source, zip_bytes(&[("assets/a.bin", b"a")])).unwrap();

        let err = extract_package(&source, &dir.path().join("EN"), ExtractMode::InMemory)
            .unwrap_err();
        match err {
            ExtractError::MissingEntry(name) => assert_eq!(name, PACKAGE_MANIFEST),
            other => panic!("expected MissingEntry, got {other:?}"),
        }
    }

    #[test]
    fn malformed_manifest_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("package.xapk");
        fs::write(
            &source,
            zip_bytes(&[(PACKAGE_MANIFEST, b"{\"expansions\": \"nope\"}")]),
        )
        .unwrap();

        let err = extract_package(&source, &dir.path().join("EN"), ExtractMode::InMemory)
            .unwrap_err();
        assert!(matches!(err, ExtractError::ManifestFormat(_)));
    }

    #[test]
    fn missing_declared_inner_archive_aborts() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("package.xapk");
        let manifest = br#"{"expansions":[{"file":"ghost.obb"}]}"#;
        fs::write(&source, zip_bytes(&[(PACKAGE_MANIFEST, manifest)])).unwrap();

        let err = extract_package(&source, &dir.path().join("EN"), ExtractMode::Streamed)
            .unwrap_err();
        match err {
            ExtractError::MissingEntry(name) => assert_eq!(name, "ghost.obb"),
            other => panic!("expected MissingEntry, got {other:?}"),
        }
    }

    #[test]
    fn empty_expansion_list_produces_no_tree_writes() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("package.xapk");
        fs::write(
            &source,
            zip_bytes(&[(PACKAGE_MANIFEST, br#"{"expansions":[]}"#)]),
        )
        .unwrap();

        let dest = dir.path().join("EN");
        let root = extract_package(&source, &dest, ExtractMode::InMemory).unwrap();
        assert_eq!(root, dest);
        assert!(!dest.exists());
    }
}
