use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::credentials::IamToken;
use crate::{
    domain::{
        errors::{ComputeError, ComputeResult},
        models::{Instance, RetryPolicy},
        value_objects::{FolderId, InstanceId},
    },
    ports::compute::ComputeClient,
};

pub const DEFAULT_COMPUTE_ENDPOINT: &str = "https://compute.api.ai.nebius.cloud";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListInstancesResponse {
    #[serde(default)]
    instances: Vec<InstanceDto>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstanceDto {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    created_at: DateTime<Utc>,
}

impl InstanceDto {
    fn into_instance(self) -> ComputeResult<Instance> {
        let id = InstanceId::new(self.id).map_err(|e| ComputeError::InvalidResponse {
            message: e.to_string(),
        })?;

        Ok(Instance {
            id,
            name: self.name,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OperationDto {
    #[serde(default)]
    id: Option<String>,
}

/// Compute REST client with bounded retries on 503 and connection failures
pub struct HttpComputeClient {
    client: Client,
    endpoint: String,
    token: IamToken,
    retry: RetryPolicy,
}

impl HttpComputeClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: IamToken,
        retry: RetryPolicy,
    ) -> ComputeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ComputeError::Transport {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token,
            retry,
        })
    }

    fn instances_url(&self) -> String {
        format!("{}/compute/v1/instances", self.endpoint)
    }

    /// Send a request, retrying while the API answers 503 or cannot be
    /// reached, up to the policy's retry budget.
    async fn send_with_retry<F>(&self, operation: &str, build: F) -> ComputeResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;

        loop {
            let sent = build().bearer_auth(self.token.secret()).send().await;

            let message = match sent {
                Ok(response) if response.status() == StatusCode::SERVICE_UNAVAILABLE => {
                    format!("{} returned {}", operation, response.status())
                }
                Ok(response) => return Ok(response),
                Err(e) if e.is_connect() || e.is_timeout() => e.to_string(),
                Err(e) => {
                    return Err(ComputeError::Transport {
                        message: format!("Failed to {}: {}", operation, e),
                    });
                }
            };

            if !self.retry.allows_retry(retries) {
                return Err(ComputeError::Unavailable {
                    attempts: retries + 1,
                    message,
                });
            }

            retries += 1;
            let delay = self.retry.next_delay(retries);
            warn!(
                operation,
                retry = retries,
                delay_ms = delay.as_millis() as u64,
                "Compute API unavailable, retrying: {}",
                message
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn error_for_status(response: Response) -> ComputeResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED => ComputeError::Unauthenticated { message },
            StatusCode::FORBIDDEN => ComputeError::PermissionDenied { message },
            _ => ComputeError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl ComputeClient for HttpComputeClient {
    async fn list_instances(&self, folder: &FolderId) -> ComputeResult<Vec<Instance>> {
        let url = self.instances_url();
        let mut instances = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let response = self
                .send_with_retry("list instances", || {
                    let mut request = self
                        .client
                        .get(&url)
                        .query(&[("folderId", folder.as_str())]);
                    if let Some(token) = &page_token {
                        request = request.query(&[("pageToken", token.as_str())]);
                    }
                    request
                })
                .await?;

            let page: ListInstancesResponse = Self::error_for_status(response)
                .await?
                .json()
                .await
                .map_err(|e| ComputeError::InvalidResponse {
                    message: format!("Failed to decode instance list: {}", e),
                })?;

            for dto in page.instances {
                instances.push(dto.into_instance()?);
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(folder = %folder, count = instances.len(), "Listed instances");
        Ok(instances)
    }

    async fn delete_instance(&self, id: &InstanceId) -> ComputeResult<()> {
        let url = format!("{}/{}", self.instances_url(), id);

        let response = self
            .send_with_retry("delete instance", || self.client.delete(&url))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(instance = %id, "Instance already gone");
            return Ok(());
        }

        let response = Self::error_for_status(response).await?;
        if let Ok(operation) = response.json::<OperationDto>().await {
            debug!(instance = %id, operation = ?operation.id, "Delete operation started");
        }

        Ok(())
    }
}
