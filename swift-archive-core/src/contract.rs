#![allow(unused)]

//! # contract: capabilities the archiver needs from the remote side
//!
//! The orchestrator never talks HTTP itself. It receives an [`Authenticator`]
//! that turns credentials into an authenticated [`ObjectStore`] session, and
//! then drives that session one file at a time.
//!
//! Both traits are annotated for `mockall` so tests can script the remote
//! side without a network. The mocks are exported when the
//! `test-export-mocks` feature is on (it is by default).

use std::path::Path;

use async_trait::async_trait;
use mockall::{automock, predicate::*};

use crate::error::{AuthError, RemoteStoreError};
use crate::options::Credentials;

/// An authenticated session against a container/object store.
///
/// A session is created once per run and shared read-only by every upload.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Number of objects in `container`, or `None` when it does not exist.
    ///
    /// Any client-level failure is reported as `None`.
    async fn head_container(&self, container: &str) -> Option<u64>;

    /// ETag of `object` in `container`, or `None` when it cannot be found.
    ///
    /// The archive run does not call this; it is for callers that inspect
    /// remote state.
    async fn head_object(&self, container: &str, object: &str) -> Option<String>;

    /// Creates `container`. Returns false when the backend rejects it.
    async fn put_container(&self, container: &str) -> bool;

    /// Streams `size` bytes from `local_path` into `container/object_name`
    /// and returns the checksum the backend computed for the stored object.
    async fn upload(
        &self,
        container: &str,
        object_name: &str,
        local_path: &Path,
        size: u64,
    ) -> Result<String, RemoteStoreError>;
}

/// Establishes an [`ObjectStore`] session.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticates exactly once. No retries.
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn ObjectStore>, AuthError>;
}
