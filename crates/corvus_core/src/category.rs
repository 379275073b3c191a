use std::fmt;

/// One of the nine fixed logical groupings of client assets.
///
/// Each category owns a pair of ledger files inside the unpacked asset tree,
/// derived from its suffix token: `version[-suffix].txt` and
/// `hashes[-suffix].csv`. The primary client category carries an empty suffix
/// and uses the bare `version.txt`/`hashes.csv` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    /// Primary client data.
    Azl,
    /// Cutscene/cinematic assets.
    Cv,
    /// Live2D model data.
    L2d,
    /// Image assets.
    Pic,
    /// Background music and audio.
    Bgm,
    /// Cipher data.
    Cipher,
    /// Manga/text assets.
    Manga,
    /// Character paintings.
    Painting,
    /// Dorm assets.
    Dorm,
}

impl AssetCategory {
    /// Every category, in the fixed order the build assembler walks them.
    ///
    /// The order is load-bearing: when two categories declare the same
    /// relative path, the later category wins in the merged file map.
    pub const ALL: [AssetCategory; 9] = [
        AssetCategory::Azl,
        AssetCategory::Cv,
        AssetCategory::L2d,
        AssetCategory::Pic,
        AssetCategory::Bgm,
        AssetCategory::Cipher,
        AssetCategory::Manga,
        AssetCategory::Painting,
        AssetCategory::Dorm,
    ];

    /// Suffix token used on this category's version and hash file names.
    pub const fn suffix(self) -> &'static str {
        match self {
            AssetCategory::Azl => "",
            AssetCategory::Cv => "cv",
            AssetCategory::L2d => "live2d",
            AssetCategory::Pic => "pic",
            AssetCategory::Bgm => "bgm",
            AssetCategory::Cipher => "cipher",
            AssetCategory::Manga => "manga",
            AssetCategory::Painting => "painting",
            AssetCategory::Dorm => "dorm",
        }
    }

    /// Stable name used as the category key in serialized manifests.
    pub const fn name(self) -> &'static str {
        match self {
            AssetCategory::Azl => "AZL",
            AssetCategory::Cv => "CV",
            AssetCategory::L2d => "L2D",
            AssetCategory::Pic => "PIC",
            AssetCategory::Bgm => "BGM",
            AssetCategory::Cipher => "CIPHER",
            AssetCategory::Manga => "MANGA",
            AssetCategory::Painting => "PAINTING",
            AssetCategory::Dorm => "DORM",
        }
    }

    /// Full version filename using the suffix.
    pub fn version_filename(self) -> String {
        match self.suffix() {
            "" => "version.txt".to_string(),
            suffix => format!("version-{suffix}.txt"),
        }
    }

    /// Full hashes filename using the suffix.
    pub fn hashes_filename(self) -> String {
        match self.suffix() {
            "" => "hashes.csv".to_string(),
            suffix => format!("hashes-{suffix}.csv"),
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
