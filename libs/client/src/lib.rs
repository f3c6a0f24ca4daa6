//! HTTP client for the Strato compute orchestration API.
//!
//! One typed method per remote call:
//! - Creating, fetching and deleting instances
//! - Listing and expanding instance network interfaces
//! - Reading and writing resource metadata
//!
//! Instance create and delete are asynchronous on the service side: the
//! call returns once the work is accepted, and callers observe progress
//! through `get_instance` until the record reaches a terminal state.

pub mod error;
pub mod types;

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::ApiError;
pub use types::{
    state, CreateInstanceRequest, DiskSpec, Instance, Interface, InterfaceSummary, NetworkSpec,
    ResourceKind, VideoSpec,
};

/// Timeout applied to every request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Strato orchestration API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given endpoint, optionally authenticating
    /// every request with a bearer token.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| ApiError::InvalidToken)?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Trigger creation of an instance.
    ///
    /// The returned record carries the authoritative identifier assigned
    /// by the service; the instance itself provisions asynchronously.
    pub async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> Result<Instance, ApiError> {
        debug!(name = %request.name, "creating instance");
        let response = self
            .client
            .post(self.url("/instances"))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch the current record for an instance.
    pub async fn get_instance(&self, id: &str) -> Result<Instance, ApiError> {
        debug!(id, "fetching instance");
        let response = self
            .client
            .get(self.url(&format!("/instances/{id}")))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Trigger deletion of an instance. Teardown happens asynchronously.
    pub async fn delete_instance(&self, id: &str) -> Result<(), ApiError> {
        debug!(id, "deleting instance");
        let response = self
            .client
            .delete(self.url(&format!("/instances/{id}")))
            .send()
            .await?;
        Self::expect_ok(response).await
    }

    /// List the interface attachments of an instance.
    pub async fn get_instance_interfaces(
        &self,
        id: &str,
    ) -> Result<Vec<InterfaceSummary>, ApiError> {
        debug!(id, "listing instance interfaces");
        let response = self
            .client
            .get(self.url(&format!("/instances/{id}/interfaces")))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch the full record for a network interface.
    pub async fn get_interface(&self, id: &str) -> Result<Interface, ApiError> {
        debug!(id, "fetching interface");
        let response = self
            .client
            .get(self.url(&format!("/interfaces/{id}")))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Fetch the metadata mapping attached to a resource.
    pub async fn get_metadata(
        &self,
        kind: ResourceKind,
        id: &str,
    ) -> Result<HashMap<String, String>, ApiError> {
        debug!(kind = kind.as_str(), id, "fetching metadata");
        let response = self
            .client
            .get(self.url(&format!("/{}/{id}/metadata", kind.as_str())))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Store one metadata key on a resource.
    pub async fn set_metadata(
        &self,
        kind: ResourceKind,
        id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            value: &'a str,
        }

        debug!(kind = kind.as_str(), id, key, "storing metadata");
        let response = self
            .client
            .put(self.url(&format!("/{}/{id}/metadata/{key}", kind.as_str())))
            .json(&Body { value })
            .send()
            .await?;
        Self::expect_ok(response).await
    }

    /// Decode a JSON success body, or map the response to a typed error.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::into_error(response).await)
        }
    }

    /// Accept any success status, discarding the body.
    async fn expect_ok(response: reqwest::Response) -> Result<(), ApiError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::into_error(response).await)
        }
    }

    /// Map a non-success response to a typed error, parsing the service's
    /// JSON error shape when present.
    async fn into_error(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or(body);
        let message = if message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        } else {
            message
        };

        if status == StatusCode::NOT_FOUND {
            ApiError::NotFound { message }
        } else {
            ApiError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/", None).unwrap();
        assert_eq!(
            client.url("/instances/abc"),
            "http://localhost:8080/instances/abc"
        );
    }
}
