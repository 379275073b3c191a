use thiserror::Error;

/// Failures surfaced while unpacking a package.
///
/// Every variant is fatal to the whole extraction; there is no partial
/// success and no cleanup of a partially written tree.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// An entry the container is required to carry does not exist.
    #[error("expected archive entry not found: {0}")]
    MissingEntry(String),

    /// An inner-archive entry path did not start with the required
    /// `assets/` prefix, which indicates an unexpected container layout.
    #[error("unexpected entry path outside assets layout: {0}")]
    UnexpectedLayout(String),

    /// The outer container's declaration manifest did not parse.
    #[error("malformed package manifest: {0}")]
    ManifestFormat(#[from] serde_json::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
