//! AWS Bedrock runtime model using SigV4-signed HTTP requests.

use std::time::SystemTime;

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::TextModel;
use crate::{Config, Result, ReviewError};

const SIGNING_NAME: &str = "bedrock";
const CONTENT_TYPE: &str = "application/json";

/// Bedrock runtime client invoking a single model.
pub struct Bedrock {
    client: Client,
    endpoint: String,
    model_id: String,
    region: String,
    credentials: Credentials,
}

impl Bedrock {
    /// Creates a Bedrock model from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("game-review-search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.bedrock_endpoint.clone(),
            model_id: config.model_id.clone(),
            region: config.aws_region.clone(),
            credentials: Credentials::new(
                config.aws_access_key_id.clone(),
                config.aws_secret_access_key.clone(),
                config.aws_session_token.clone(),
                None,
                "environment",
            ),
        })
    }

    /// Uses a different model id.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    fn invoke_url(&self) -> String {
        format!(
            "{}/model/{}/invoke",
            self.endpoint,
            urlencoding::encode(&self.model_id)
        )
    }

    /// Computes the SigV4 headers for a POST of `body` to `url`.
    fn signed_headers(&self, url: &str, body: &[u8]) -> Result<Vec<(String, String)>> {
        let identity: Identity = self.credentials.clone().into();
        let signing_params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(SIGNING_NAME)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| ReviewError::Signing(e.to_string()))?
            .into();

        let headers = [("content-type", CONTENT_TYPE), ("accept", CONTENT_TYPE)];
        let signable = SignableRequest::new(
            "POST",
            url,
            headers.into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| ReviewError::Signing(e.to_string()))?;

        let (instructions, _signature) = sign(signable, &signing_params)
            .map_err(|e| ReviewError::Signing(e.to_string()))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

#[derive(Serialize)]
struct InvokeRequest<'a> {
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct TextBlock<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct InvokeResponse {
    output: Option<Output>,
}

#[derive(Deserialize)]
struct Output {
    message: Option<OutputMessage>,
}

#[derive(Deserialize)]
struct OutputMessage {
    #[serde(default)]
    content: Vec<OutputBlock>,
}

#[derive(Deserialize)]
struct OutputBlock {
    text: Option<String>,
}

impl InvokeResponse {
    /// Returns `output.message.content[0].text`.
    fn into_text(self) -> Option<String> {
        self.output?.message?.content.into_iter().next()?.text
    }
}

#[async_trait]
impl TextModel for Bedrock {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self.invoke_url();
        let body = serde_json::to_vec(&InvokeRequest {
            messages: vec![Message {
                role: "user",
                content: vec![TextBlock { text: prompt }],
            }],
        })?;

        let mut request = self
            .client
            .post(&url)
            .header("content-type", CONTENT_TYPE)
            .header("accept", CONTENT_TYPE);
        for (name, value) in self.signed_headers(&url, &body)? {
            request = request.header(name, value);
        }

        debug!("Invoking Bedrock model {}", self.model_id);
        let response = request.body(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::Status {
                service: "Bedrock",
                status: status.as_u16(),
                body,
            });
        }

        let parsed: InvokeResponse = serde_json::from_slice(&response.bytes().await?)
            .map_err(|e| ReviewError::MalformedResponse(format!("invalid response body: {}", e)))?;

        parsed.into_text().ok_or_else(|| {
            ReviewError::MalformedResponse(
                "response has no output.message.content[0].text".to_string(),
            )
        })
    }
}
