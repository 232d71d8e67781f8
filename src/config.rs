//! Backend Configuration
//!
//! Endpoint and API key of the managed GraphQL API. Read at startup from the
//! Amplify-style `aws-exports.json` served next to the app, falling back to
//! values baked in at build time.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::gateway;

/// Path of the exports file, relative to the page
pub const EXPORTS_PATH: &str = "aws-exports.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub graphql_endpoint: String,
    pub realtime_endpoint: String,
    pub api_key: String,
    pub region: Option<String>,
}

/// Subset of the Amplify exports this app reads
#[derive(Debug, Default, Deserialize)]
struct AmplifyExports {
    #[serde(rename = "aws_appsync_graphqlEndpoint")]
    graphql_endpoint: Option<String>,
    #[serde(rename = "aws_appsync_realtimeEndpoint")]
    realtime_endpoint: Option<String>,
    #[serde(rename = "aws_appsync_apiKey")]
    api_key: Option<String>,
    #[serde(rename = "aws_appsync_region")]
    region: Option<String>,
}

impl ApiConfig {
    pub fn new(graphql_endpoint: &str, api_key: &str) -> Self {
        Self {
            graphql_endpoint: graphql_endpoint.to_string(),
            realtime_endpoint: realtime_endpoint_for(graphql_endpoint),
            api_key: api_key.to_string(),
            region: None,
        }
    }

    fn from_exports(exports: AmplifyExports) -> Result<Self, ConfigError> {
        let graphql_endpoint = non_empty(exports.graphql_endpoint)
            .ok_or(ConfigError::Missing("aws_appsync_graphqlEndpoint"))?;
        let api_key = non_empty(exports.api_key).ok_or(ConfigError::Missing("aws_appsync_apiKey"))?;
        let realtime_endpoint =
            non_empty(exports.realtime_endpoint).unwrap_or_else(|| realtime_endpoint_for(&graphql_endpoint));
        Ok(Self {
            graphql_endpoint,
            realtime_endpoint,
            api_key,
            region: non_empty(exports.region),
        })
    }

    pub fn from_exports_json(json: &str) -> Result<Self, ConfigError> {
        let exports: AmplifyExports =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_exports(exports)
    }

    /// `NOTES_GRAPHQL_ENDPOINT`, `NOTES_API_KEY`, `NOTES_REGION` at build time
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_exports(AmplifyExports {
            graphql_endpoint: option_env!("NOTES_GRAPHQL_ENDPOINT").map(str::to_string),
            realtime_endpoint: option_env!("NOTES_REALTIME_ENDPOINT").map(str::to_string),
            api_key: option_env!("NOTES_API_KEY").map(str::to_string),
            region: option_env!("NOTES_REGION").map(str::to_string),
        })
    }

    /// Exports file first, build-time values second
    pub async fn load() -> Result<Self, ConfigError> {
        match Self::fetch_exports().await {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!(error = %err, path = EXPORTS_PATH, "exports unavailable, using build-time config");
                Self::from_build_env()
            }
        }
    }

    async fn fetch_exports() -> Result<Self, ConfigError> {
        let value = gateway::get_json(EXPORTS_PATH).await?;
        let exports: AmplifyExports =
            serde_wasm_bindgen::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_exports(exports)
    }

    /// Host of the GraphQL endpoint, as AppSync expects it in auth headers
    pub fn host(&self) -> &str {
        let rest = self
            .graphql_endpoint
            .split_once("://")
            .map_or(self.graphql_endpoint.as_str(), |(_, rest)| rest);
        rest.split('/').next().unwrap_or(rest)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// `https://x.appsync-api.…/graphql` → `wss://x.appsync-realtime-api.…/graphql`
pub fn realtime_endpoint_for(graphql_endpoint: &str) -> String {
    let endpoint = match graphql_endpoint.split_once("://") {
        Some(("http", rest)) => format!("ws://{rest}"),
        Some((_, rest)) => format!("wss://{rest}"),
        None => format!("wss://{graphql_endpoint}"),
    };
    endpoint.replacen("appsync-api", "appsync-realtime-api", 1)
}
