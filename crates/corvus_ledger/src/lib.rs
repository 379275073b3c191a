//! # Corvus Ledger
//!
//! Reads the per-category version and hash ledgers an unpacked client ships,
//! and folds them into one consolidated [`BuildManifest`].
//!
//! Every asset category carries two files under the asset tree root: a
//! version file whose content is taken verbatim, and a hash ledger of
//! `path,size,hash` lines. [`Ledger`] reads one category at a time;
//! [`build::assemble`] walks the full fixed category set and merges the
//! results.
//!
//! [`BuildManifest`]: corvus_core::manifest::BuildManifest

pub mod build;
mod reader;

pub use reader::{HashRecords, Ledger};
