//! BedrockProvider -- concrete [`LlmProvider`] implementation for AWS Bedrock.
//!
//! Sends requests to the AWS Bedrock Runtime `invoke` action using Bearer
//! token authentication.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::llm::provider::LlmProvider;
use chatrelay_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::super::anthropic::types::{AnthropicMessage, AnthropicResponse};
use super::types::{BedrockRequest, error_message, error_type};

/// AWS Bedrock Claude LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers.
pub struct BedrockProvider {
    client: reqwest::Client,
    api_key: SecretString,
    region: String,
    model_id: String,
    endpoint: String,
}

impl BedrockProvider {
    /// The Anthropic API version for Bedrock.
    const API_VERSION: &'static str = "bedrock-2023-05-31";

    /// Prefix used to identify Bedrock API keys.
    const KEY_PREFIX: &'static str = "bedrock-api-key-";

    /// Create a new Bedrock provider.
    ///
    /// * `api_key` - AWS Bedrock bearer token. If it starts with
    ///   `bedrock-api-key-`, the prefix is stripped and the remainder is used
    ///   as the Bearer token.
    /// * `model` - Model identifier, either a Bedrock id
    ///   (`anthropic.claude-3-haiku-20240307-v1:0`) or a plain Claude name.
    /// * `region` - AWS region. A region embedded in the token's credential
    ///   scope takes precedence.
    pub fn new(api_key: SecretString, model: String, region: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        let raw_key = api_key.expose_secret();
        let token_part = raw_key.strip_prefix(Self::KEY_PREFIX).unwrap_or(raw_key);
        let effective_region = Self::detect_region_from_token(token_part).unwrap_or(region);
        let bearer_token = SecretString::from(token_part.to_string());

        let model_id = Self::to_bedrock_model_id(&model, &effective_region);
        let endpoint = format!("https://bedrock-runtime.{effective_region}.amazonaws.com");

        Ok(Self {
            client,
            api_key: bearer_token,
            region: effective_region,
            model_id,
            endpoint,
        })
    }

    /// Override the runtime endpoint (useful for testing or VPC endpoints).
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Try to extract the AWS region from a base64-encoded presigned URL token.
    ///
    /// The token decodes to a URL like:
    /// `bedrock.amazonaws.com/?...&X-Amz-Credential=AKIA.../20260212/us-east-1/bedrock/aws4_request&...`
    fn detect_region_from_token(token: &str) -> Option<String> {
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(token)
            .ok()?;
        let text = String::from_utf8(decoded).ok()?;

        let marker = "X-Amz-Credential=";
        let cred_start = text.find(marker)?;
        let cred_value = text.get(cred_start + marker.len()..)?;
        // <access-key>/<date>/<region>/<service>/aws4_request
        let parts: Vec<&str> = cred_value.split('/').collect();
        if parts.len() >= 3 {
            let region = parts[2].split('&').next().unwrap_or(parts[2]);
            tracing::info!(region = %region, "Detected region from Bedrock bearer token");
            Some(region.to_string())
        } else {
            None
        }
    }

    /// Convert a plain Claude model name to a Bedrock inference profile ID.
    ///
    /// Models that already contain a `.` are returned as-is.
    ///
    /// ```text
    /// ("claude-3-5-haiku-20241022", "eu-west-1") → "eu.anthropic.claude-3-5-haiku-20241022-v1:0"
    /// ("anthropic.claude-3-haiku-20240307-v1:0", _) → unchanged
    /// ```
    pub fn to_bedrock_model_id(model: &str, region: &str) -> String {
        if model.contains('.') {
            model.to_string()
        } else {
            let region_prefix = region.split('-').next().unwrap_or("us");
            format!("{region_prefix}.anthropic.{model}-v1:0")
        }
    }

    fn url(&self, action: &str) -> String {
        format!("{}/model/{}/{}", self.endpoint, self.model_id, action)
    }

    fn to_bedrock_request(&self, request: &CompletionRequest) -> BedrockRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        BedrockRequest {
            anthropic_version: Self::API_VERSION.to_string(),
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
        }
    }
}

/// Map a non-success response onto [`LlmError`]. A readable message in the
/// body becomes [`LlmError::Api`]; otherwise the status decides.
fn error_from_response(status: u16, type_header: Option<&str>, body: &str) -> LlmError {
    if let Some(message) = error_message(body) {
        return LlmError::Api {
            status,
            error_type: error_type(body, type_header).unwrap_or_else(|| "UnknownError".to_string()),
            message,
        };
    }

    match status {
        401 | 403 => LlmError::Provider {
            message: format!("Bedrock authentication failed (HTTP {status}): {body}"),
        },
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        529 => LlmError::Overloaded(body.to_string()),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

impl LlmProvider for BedrockProvider {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_bedrock_request(request);
        let url = self.url("invoke");

        tracing::debug!(url = %url, model_id = %self.model_id, region = %self.region, "Bedrock invoke request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let type_header = response
                .headers()
                .get("x-amzn-ErrorType")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, url = %url, "Bedrock API error response");
            return Err(error_from_response(
                status.as_u16(),
                type_header.as_deref(),
                &error_body,
            ));
        }

        let bedrock_resp: AnthropicResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        bedrock_resp.into_completion("Bedrock")
    }
}
