//! Error Types
//!
//! Remote failures, configuration failures and form validation.

use thiserror::Error;

use crate::models::FormField;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("server responded with HTTP {status}")]
    Http { status: u16 },

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("response has no `{0}` data")]
    MissingData(&'static str),

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("subscription failed: {0}")]
    Subscription(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration value `{0}`")]
    Missing(&'static str),

    #[error("unreadable configuration: {0}")]
    Parse(String),

    #[error("could not fetch configuration: {0}")]
    Fetch(#[from] GatewayError),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("form field `{}` is empty", .field.as_str())]
    Validation { field: FormField },
}

pub type GatewayResult<T> = Result<T, GatewayError>;
