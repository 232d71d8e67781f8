//! GraphQL Wire Envelopes
//!
//! Request/response shapes shared by HTTP operations and subscription data.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};

#[derive(Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// `{ "input": ... }` variables of the generated mutations
#[derive(Serialize)]
pub struct InputVariables<T> {
    pub input: T,
}

#[derive(Serialize)]
pub struct UpdateCompletionInput<'a> {
    pub id: &'a str,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct DeleteNoteInput<'a> {
    pub id: &'a str,
}

#[derive(Deserialize)]
pub struct NoteConnection<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorMessage {
    pub message: String,
}

impl GraphQlResponse {
    /// Decode `data.<field>`, failing on any reported error
    pub fn take_field<T: DeserializeOwned>(mut self, field: &'static str) -> GatewayResult<T> {
        if let Some(errors) = self.errors.take().filter(|errors| !errors.is_empty()) {
            return Err(GatewayError::GraphQl(errors.into_iter().map(|e| e.message).collect()));
        }
        let value = self
            .data
            .as_mut()
            .and_then(|data| data.get_mut(field))
            .map(Value::take)
            .filter(|value| !value.is_null())
            .ok_or(GatewayError::MissingData(field))?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Parse an HTTP response body and decode `data.<field>`
pub fn decode_field<T: DeserializeOwned>(body: &str, field: &'static str) -> GatewayResult<T> {
    let response: GraphQlResponse = serde_json::from_str(body)?;
    response.take_field(field)
}
