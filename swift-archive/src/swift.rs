#![doc = "OpenStack client for the CLI: Keystone v3 authentication and the Swift object API, implementing the core's store contract."]
//
//! # Swift Integration (CLI <-> Core)
//!
//! This module wires the [`ObjectStore`] and [`Authenticator`] traits from
//! `swift-archive-core` to a real OpenStack deployment.
//!
//! - [`SwiftClient::authenticate`] performs a single Keystone v3 password
//!   authentication and picks the public `object-store` endpoint from the
//!   service catalog.
//! - The resulting client holds the token and storage URL and is reused for
//!   every request in the run.
//! - Object uploads stream the file from disk; memory use does not grow with
//!   file size.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, ETAG};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;
use swift_archive_core::contract::{Authenticator, ObjectStore};
use swift_archive_core::{AuthError, Credentials, RemoteStoreError};
use tokio_util::io::ReaderStream;

const AUTH_TOKEN: &str = "X-Auth-Token";
const SUBJECT_TOKEN: &str = "X-Subject-Token";
const CONTAINER_OBJECT_COUNT: &str = "X-Container-Object-Count";

#[derive(Deserialize)]
struct TokenResponse {
    token: Token,
}

#[derive(Deserialize)]
struct Token {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

#[derive(Deserialize)]
struct Endpoint {
    interface: String,
    url: String,
}

impl Token {
    fn object_store_url(&self) -> Option<&str> {
        self.catalog
            .iter()
            .filter(|entry| entry.service_type == "object-store")
            .flat_map(|entry| entry.endpoints.iter())
            .find(|endpoint| endpoint.interface == "public")
            .map(|endpoint| endpoint.url.as_str())
    }
}

/// An authenticated Swift session.
pub struct SwiftClient {
    http: Client,
    token: String,
    storage_url: Url,
}

impl SwiftClient {
    /// Authenticates against Keystone v3 with a project-scoped password token.
    pub async fn authenticate(credentials: &Credentials) -> Result<Self, AuthError> {
        let http = Client::builder()
            .build()
            .map_err(|e| AuthError::ConnectionFailure(e.to_string()))?;

        let url = format!("{}/auth/tokens", credentials.auth_url.trim_end_matches('/'));
        tracing::info!(auth_url = %url, username = %credentials.username, "Requesting Keystone token");

        let body = json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": credentials.username,
                            "domain": { "id": "default" },
                            "password": credentials.password,
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": credentials.project_name,
                        "domain": { "id": "default" },
                    }
                }
            }
        });

        let response = http.post(&url).json(&body).send().await.map_err(|e| {
            tracing::error!(error = %e, auth_url = %url, "Keystone unreachable");
            AuthError::ConnectionFailure(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::error!(username = %credentials.username, "Keystone rejected credentials");
            return Err(AuthError::Unauthorized);
        }
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Keystone authentication failed");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }

        let token = header_str(response.headers(), SUBJECT_TOKEN).ok_or_else(|| {
            tracing::error!("Keystone response carried no token header");
            AuthError::MissingToken
        })?;

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let storage_url = parsed
            .token
            .object_store_url()
            .and_then(|raw| Url::parse(raw).ok())
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                tracing::error!("No usable public object-store endpoint in catalog");
                AuthError::NoObjectStoreEndpoint
            })?;

        tracing::info!(storage_url = %storage_url, "Authenticated with Keystone");
        Ok(SwiftClient {
            http,
            token,
            storage_url,
        })
    }

    /// Storage URL selected from the service catalog.
    pub fn storage_url(&self) -> &Url {
        &self.storage_url
    }

    fn url_for<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.storage_url.clone();
        // authenticate() only accepts base URLs, so this cannot fail
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Swift may quote ETags; checksums are compared as bare lowercase hex.
fn normalise_etag(raw: &str) -> String {
    raw.trim().trim_matches('"').to_ascii_lowercase()
}

#[async_trait]
impl ObjectStore for SwiftClient {
    async fn head_container(&self, container: &str) -> Option<u64> {
        let url = self.url_for([container]);
        let response = match self.http.head(url).header(AUTH_TOKEN, &self.token).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(container, error = %e, "HEAD container failed");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::debug!(container, status = response.status().as_u16(), "Container not available");
            return None;
        }
        let count = header_str(response.headers(), CONTAINER_OBJECT_COUNT)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0);
        Some(count)
    }

    async fn head_object(&self, container: &str, object: &str) -> Option<String> {
        let url = self.url_for(std::iter::once(container).chain(object.split('/')));
        let response = match self.http.head(url).header(AUTH_TOKEN, &self.token).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(container, object, status = response.status().as_u16(), "Object not available");
                return None;
            }
            Err(e) => {
                tracing::debug!(container, object, error = %e, "HEAD object failed");
                return None;
            }
        };
        header_str(response.headers(), ETAG.as_str()).map(|etag| normalise_etag(&etag))
    }

    async fn put_container(&self, container: &str) -> bool {
        let url = self.url_for([container]);
        match self.http.put(url).header(AUTH_TOKEN, &self.token).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(container, "Created container");
                true
            }
            Ok(response) => {
                tracing::error!(container, status = response.status().as_u16(), "Container creation rejected");
                false
            }
            Err(e) => {
                tracing::error!(container, error = %e, "Container creation failed");
                false
            }
        }
    }

    async fn upload(
        &self,
        container: &str,
        object_name: &str,
        local_path: &Path,
        size: u64,
    ) -> Result<String, RemoteStoreError> {
        let file = tokio::fs::File::open(local_path)
            .await
            .map_err(|e| RemoteStoreError::from_io(local_path, e))?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let url = self.url_for(std::iter::once(container).chain(object_name.split('/')));
        let response = self
            .http
            .put(url)
            .header(AUTH_TOKEN, &self.token)
            .header(CONTENT_LENGTH, size)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(path = %local_path.display(), error = %e, "Object upload failed");
                RemoteStoreError::Client {
                    path: local_path.to_path_buf(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                return Err(RemoteStoreError::NotFound {
                    path: local_path.to_path_buf(),
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(RemoteStoreError::PermissionDenied {
                    path: local_path.to_path_buf(),
                })
            }
            s if !s.is_success() => {
                let detail = response.text().await.unwrap_or_default();
                tracing::error!(path = %local_path.display(), status = s.as_u16(), body = %detail, "Object upload rejected");
                return Err(RemoteStoreError::Client {
                    path: local_path.to_path_buf(),
                    message: format!("{s} {}", detail.trim()).trim().to_string(),
                });
            }
            _ => {}
        }

        let etag = header_str(response.headers(), ETAG.as_str()).ok_or_else(|| {
            RemoteStoreError::Client {
                path: local_path.to_path_buf(),
                message: "response carried no ETag".to_string(),
            }
        })?;
        tracing::info!(container, object = object_name, etag = %etag, "Uploaded object");
        Ok(normalise_etag(&etag))
    }
}

/// [`Authenticator`] that produces [`SwiftClient`] sessions.
pub struct SwiftAuthenticator;

#[async_trait]
impl Authenticator for SwiftAuthenticator {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn ObjectStore>, AuthError> {
        let client = SwiftClient::authenticate(credentials).await?;
        Ok(Box::new(client))
    }
}
