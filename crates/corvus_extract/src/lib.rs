//! # Corvus Package Extraction
//!
//! Unpacks a downloaded game-client package (an XAPK: an outer zip carrying a
//! `manifest.json` and one or more OBB zips) into a canonical on-disk asset
//! tree.
//!
//! The outer container's manifest declares the inner archives; each is opened
//! as a zip in declaration order and unpacked with the `assets/` path prefix
//! removed and the `.ys` disguise suffix stripped. Two strategies are
//! available for getting at an inner archive, selected once per run:
//!
//! * [`ExtractMode::InMemory`] — the inner entry is loaded wholesale into
//!   memory. Simpler, but memory cost scales with the largest inner archive.
//! * [`ExtractMode::Streamed`] — the inner entry is first copied to a
//!   temporary file through a fixed-size buffer, keeping memory bounded at
//!   the cost of an extra disk pass.
//!
//! Extraction is destructive: any existing destination tree is removed
//! before unpacking starts, so reruns always produce a clean tree.

mod error;
mod extract;
mod unpack;

pub use error::ExtractError;
pub use extract::{ExtractMode, extract_package};
pub use unpack::unpack_archive;

/// Copy buffer size for entry extraction and streamed temp copies.
///
/// Windows performs measurably better with 1 MiB sequential writes.
#[cfg(windows)]
pub const COPY_BUF_SIZE: usize = 1024 * 1024;
/// Copy buffer size for entry extraction and streamed temp copies.
#[cfg(not(windows))]
pub const COPY_BUF_SIZE: usize = 64 * 1024;
