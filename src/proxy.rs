//! Backend invoker: one outbound call per request.
//!
//! Selects the translators for the resolved [`Provider`], posts the payload
//! and classifies the outcome as success, backend error or internal error.

use crate::auth::Credential;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::providers::Provider;
use crate::translate::anthropic_types::AnthropicResponse;
use crate::translate::openai_types::{AzureChatResponse, ChatCompletionRequest, ChatCompletionResponse};
use crate::translate::{request, response};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Translate a canonical request for `provider`, make the single backend call
/// and translate the answer back.
pub async fn forward(
    provider: Provider,
    req: &ChatCompletionRequest,
    credential: &Credential,
    config: &GatewayConfig,
    client: &reqwest::Client,
) -> Result<ChatCompletionResponse> {
    match provider {
        Provider::Azure => {
            let payload = request::openai_to_azure(req);
            let resp: AzureChatResponse =
                invoke(provider, &payload, credential, config, client).await?;
            Ok(response::azure_to_openai(resp))
        }
        Provider::Anthropic => {
            let payload = request::openai_to_anthropic(req);
            let resp: AnthropicResponse =
                invoke(provider, &payload, credential, config, client).await?;
            Ok(response::anthropic_to_openai(
                resp,
                chrono::Utc::now().timestamp_millis(),
            ))
        }
    }
}

/// One POST to the backend. Exactly one attempt; no retries.
///
/// Transport failures and undecodable success bodies become
/// [`GatewayError::Internal`]; non-2xx statuses become
/// [`GatewayError::Backend`] with the body untouched.
pub async fn invoke<P, R>(
    provider: Provider,
    payload: &P,
    credential: &Credential,
    config: &GatewayConfig,
    client: &reqwest::Client,
) -> Result<R>
where
    P: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let url = provider.endpoint(config);
    info!(%provider, "POST {}", url);

    let mut builder = client
        .post(&url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .json(payload);
    for (name, value) in provider.headers(credential, config) {
        builder = builder.header(name, value);
    }

    let response = builder.send().await.map_err(|e| {
        warn!(%provider, error = %e, "Backend request failed");
        GatewayError::from(e)
    })?;

    let status = response.status();
    // Present only when the backend's reason phrase is not the canonical one.
    let status_text = match response.extensions().get::<hyper::ext::ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    };
    let body = response.text().await?;

    debug!(%provider, status = status.as_u16(), body_len = body.len(), "Backend responded");

    if !status.is_success() {
        warn!(%provider, status = status.as_u16(), "Backend returned an error");
        return Err(GatewayError::Backend {
            status: status.as_u16(),
            status_text,
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        warn!(%provider, error = %e, "Failed to parse backend response");
        GatewayError::from(e)
    })
}
