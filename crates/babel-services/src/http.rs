//! Shared JSON-over-HTTP plumbing for the service backends.

use crate::error::{ServiceError, ServiceResult};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

/// Strip trailing slashes so `{base}/{endpoint}` never doubles them.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

pub(crate) async fn post_json<B, T>(
    client: &Client,
    service: &'static str,
    url: &str,
    body: &B,
) -> ServiceResult<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = client.post(url).json(body).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::RequestFailed {
            service,
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode {
        service,
        url: url.to_string(),
        reason: e.to_string(),
    })
}
