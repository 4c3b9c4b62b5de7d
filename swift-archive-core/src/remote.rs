//! Client-side upload contract layered over an [`ObjectStore`] session.

use std::path::{Component, Path};

use tracing::{debug, error, info};

use crate::contract::ObjectStore;
use crate::error::RemoteStoreError;

/// Largest object accepted for upload, in bytes.
pub const MAX_OBJECT_SIZE: u64 = 3_500_000_000;

/// Uploads `local_path` into `container` and returns the remote checksum.
///
/// Oversized files, and files whose object name would be empty, are rejected
/// before any request is made. When the container does not exist it is
/// created first. The object is named after the file's path relative to
/// `archive_root`.
pub async fn put_object<S>(
    store: &S,
    container: &str,
    local_path: &Path,
    archive_root: &Path,
) -> Result<String, RemoteStoreError>
where
    S: ObjectStore + ?Sized,
{
    let size = std::fs::metadata(local_path)
        .map_err(|e| RemoteStoreError::from_io(local_path, e))?
        .len();
    if size > MAX_OBJECT_SIZE {
        error!(path = %local_path.display(), size, limit = MAX_OBJECT_SIZE, "File exceeds upload size limit");
        return Err(RemoteStoreError::SizeLimitExceeded {
            path: local_path.to_path_buf(),
            size,
        });
    }

    let object = object_name(local_path, archive_root);
    if object.is_empty() {
        error!(path = %local_path.display(), root = %archive_root.display(), "Refusing upload without an object name");
        return Err(RemoteStoreError::EmptyObjectName {
            path: local_path.to_path_buf(),
        });
    }

    match store.head_container(container).await {
        Some(count) => debug!(container, objects = count, "Container exists"),
        None => {
            info!(container, "Container not found, creating it");
            if !store.put_container(container).await {
                error!(container, "Container creation rejected");
                return Err(RemoteStoreError::ContainerNotCreated {
                    container: container.to_string(),
                });
            }
        }
    }

    info!(path = %local_path.display(), container, object = %object, size, "Uploading object");
    store.upload(container, &object, local_path, size).await
}

/// Object key for `local_path`: its path below `archive_root`, joined with `/`.
///
/// Paths outside the root keep their own normal components.
pub fn object_name(local_path: &Path, archive_root: &Path) -> String {
    let relative = local_path.strip_prefix(archive_root).unwrap_or(local_path);
    relative
        .components()
        .filter_map(|comp| match comp {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
