//! Credential and endpoint configuration loaded from the environment.

use std::env;

use url::Url;

use crate::{ReviewError, Result};

/// Default AWS region when `AWS_REGION` is not set.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default Bedrock model used for site and keyword generation.
pub const DEFAULT_MODEL_ID: &str = "amazon.nova-pro-v1:0";

/// Default SerpAPI search endpoint.
pub const DEFAULT_SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";

/// Runtime configuration for the pipeline.
///
/// Built once at program entry and handed to [`crate::Bedrock`] and
/// [`crate::SerpApi`] by reference.
#[derive(Clone)]
pub struct Config {
    /// SerpAPI key.
    pub serp_api_key: String,
    /// AWS access key id.
    pub aws_access_key_id: String,
    /// AWS secret access key.
    pub aws_secret_access_key: String,
    /// Optional AWS session token for temporary credentials.
    pub aws_session_token: Option<String>,
    /// AWS region hosting the Bedrock runtime.
    pub aws_region: String,
    /// Bedrock model identifier.
    pub model_id: String,
    /// Bedrock runtime base URL.
    pub bedrock_endpoint: String,
    /// SerpAPI search URL.
    pub serpapi_endpoint: String,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration using `lookup` to resolve variable names.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = ["SERP_API_KEY", "AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"]
            .into_iter()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ReviewError::Configuration(format!(
                "environment variables not set: {}",
                missing.join(", ")
            )));
        }

        let aws_region = get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let bedrock_endpoint = get("BEDROCK_ENDPOINT")
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", aws_region));
        let serpapi_endpoint =
            get("SERPAPI_ENDPOINT").unwrap_or_else(|| DEFAULT_SERPAPI_ENDPOINT.to_string());

        validate_url("BEDROCK_ENDPOINT", &bedrock_endpoint)?;
        validate_url("SERPAPI_ENDPOINT", &serpapi_endpoint)?;

        Ok(Self {
            serp_api_key: get("SERP_API_KEY").unwrap_or_default(),
            aws_access_key_id: get("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            aws_secret_access_key: get("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            aws_session_token: get("AWS_SESSION_TOKEN"),
            aws_region,
            model_id: get("BEDROCK_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            bedrock_endpoint: bedrock_endpoint.trim_end_matches('/').to_string(),
            serpapi_endpoint,
        })
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("serp_api_key", &"<redacted>")
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &"<redacted>")
            .field("aws_session_token", &self.aws_session_token.as_ref().map(|_| "<redacted>"))
            .field("aws_region", &self.aws_region)
            .field("model_id", &self.model_id)
            .field("bedrock_endpoint", &self.bedrock_endpoint)
            .field("serpapi_endpoint", &self.serpapi_endpoint)
            .finish()
    }
}

fn validate_url(name: &str, value: &str) -> Result<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ReviewError::Configuration(format!("{} is not a valid URL: {}", name, e)))
}
