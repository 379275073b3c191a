use crate::error::HashLineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One `path,size,hash` row from a category's hash ledger.
///
/// The ledger format is plain UTF-8 text, one record per line, fields
/// separated by commas with no quoting or escaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    /// Path of the asset file, relative to the unpacked tree root.
    pub filepath: String,

    /// Size in bytes.
    pub size: u64,

    /// Content hash as shipped by the client.
    pub md5hash: String,
}

impl HashRecord {
    /// Parse a single comma-delimited ledger line.
    pub fn from_line(line: &str) -> Result<Self, HashLineError> {
        let fields: Vec<&str> = line.split(',').collect();
        let (filepath, size, md5hash) = match fields.as_slice() {
            [filepath, size, md5hash] => (*filepath, *size, *md5hash),
            other => return Err(HashLineError::FieldCount(other.len())),
        };

        Ok(Self {
            filepath: filepath.to_string(),
            size: size.parse()?,
            md5hash: md5hash.to_string(),
        })
    }

    /// Serialize back into the ledger line format.
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.filepath, self.size, self.md5hash)
    }
}

/// Version and file listing recorded for one asset category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVersion {
    /// Verbatim content of the category's version file.
    pub version: String,

    /// Relative paths declared by the category's hash ledger, in the order
    /// they were first seen.
    pub files: Vec<String>,
}

/// The consolidated build record for one server/version pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Server identifier, e.g. `EN`.
    pub server: String,

    /// Package version the assets were unpacked from.
    pub version: String,

    /// Relative path to hash record, merged across every category.
    /// On a path collision the later category in enumeration order wins.
    pub filemap: HashMap<String, HashRecord>,

    /// Category name to its version and file listing.
    pub categories: HashMap<String, CategoryVersion>,
}

impl BuildManifest {
    /// An empty manifest for the given server/version pair.
    pub fn new(server: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            version: version.into(),
            filemap: HashMap::new(),
            categories: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_record_parses_triple() {
        let record = HashRecord::from_line("painting/ship_a,20480,d41d8cd98f00b204").unwrap();
        assert_eq!(record.filepath, "painting/ship_a");
        assert_eq!(record.size, 20480);
        assert_eq!(record.md5hash, "d41d8cd98f00b204");
    }

    #[test]
    fn hash_record_line_round_trips() {
        let line = "bgm/theme.acb,1048576,0cc175b9c0f1b6a8";
        let record = HashRecord::from_line(line).unwrap();
        assert_eq!(record.to_line(), line);
    }

    #[test]
    fn hash_record_rejects_short_line() {
        let err = HashRecord::from_line("only/two/fields,42").unwrap_err();
        assert_eq!(err, HashLineError::FieldCount(2));
    }

    #[test]
    fn hash_record_rejects_extra_fields() {
        let err = HashRecord::from_line("a,1,hash,extra").unwrap_err();
        assert_eq!(err, HashLineError::FieldCount(4));
    }

    #[test]
    fn hash_record_rejects_bad_size() {
        let err = HashRecord::from_line("a,notanumber,hash").unwrap_err();
        assert!(matches!(err, HashLineError::Size(_)));
    }

    #[test]
    fn build_manifest_starts_empty() {
        let build = BuildManifest::new("EN", "9.1.107");
        assert_eq!(build.server, "EN");
        assert_eq!(build.version, "9.1.107");
        assert!(build.filemap.is_empty());
        assert!(build.categories.is_empty());
    }

    #[test]
    fn build_manifest_serializes_expected_shape() {
        let mut build = BuildManifest::new("EN", "9.1.107");
        build.filemap.insert(
            "pic/icon.png".to_string(),
            HashRecord {
                filepath: "pic/icon.png".to_string(),
                size: 512,
                md5hash: "abc".to_string(),
            },
        );
        let json: serde_json::Value = serde_json::to_value(&build).unwrap();
        assert_eq!(json["server"], "EN");
        assert_eq!(json["filemap"]["pic/icon.png"]["size"], 512);
    }
}
