#![doc = "swift-archive-core: core logic library for swift-archive."]

//! This crate contains the archiving pipeline and its data model: option
//! validation, the local file scanner, the remote store contract and the
//! orchestrator that ties them together.
//!
//! The concrete OpenStack client lives in the `swift-archive` CLI crate; this
//! crate only depends on the [`contract`] traits.

pub mod archive;
pub mod contract;
pub mod error;
pub mod files;
pub mod options;
pub mod remote;

pub use archive::{archive, run, ArchiveReport, ArchivedFile};
pub use error::{ArchiveError, AuthError, LocalFileError, RemoteStoreError};
pub use options::{ArchiveOptions, Credentials, RawOptions};
