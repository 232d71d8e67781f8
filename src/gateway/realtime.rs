//! AppSync Realtime Protocol
//!
//! Message shapes and handshake URL for GraphQL subscriptions over the
//! AppSync realtime WebSocket (subprotocol `graphql-ws`):
//!
//! ```text
//! client                       server
//!   connection_init    ->
//!                      <-  connection_ack { connectionTimeoutMs }
//!   start { id }       ->
//!                      <-  start_ack | data | ka | error | complete
//!   stop { id }        ->
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::documents::{Operation, ON_CREATE_NOTE};
use super::wire::{GraphQlRequest, GraphQlResponse};
use crate::config::ApiConfig;
use crate::error::GatewayResult;
use crate::models::Note;

pub const SUBPROTOCOL: &str = "graphql-ws";

/// Used when the server's ack carries no timeout
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u32 = 300_000;

/// base64 of `{}`
const EMPTY_PAYLOAD: &str = "e30=";

/// API-key authorization, sent in the handshake URL and in every `start`
#[derive(Debug, Clone, Serialize)]
pub struct Authorization {
    host: String,
    #[serde(rename = "x-api-key")]
    api_key: String,
}

impl Authorization {
    pub fn for_config(config: &ApiConfig) -> Self {
        Self {
            host: config.host().to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

/// `wss://…?header=<base64 auth>&payload=e30=`
pub fn connect_url(config: &ApiConfig) -> GatewayResult<String> {
    let header = serde_json::to_string(&Authorization::for_config(config))?;
    Ok(format!(
        "{}?header={}&payload={}",
        config.realtime_endpoint,
        STANDARD.encode(header),
        EMPTY_PAYLOAD
    ))
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage<'a> {
    ConnectionInit,
    Start { id: &'a str, payload: StartPayload },
    Stop { id: &'a str },
}

#[derive(Debug, Serialize)]
pub struct StartPayload {
    /// The GraphQL request, itself JSON-encoded
    data: String,
    extensions: Extensions,
}

#[derive(Debug, Serialize)]
struct Extensions {
    authorization: Authorization,
}

impl<'a> ClientMessage<'a> {
    pub fn start(id: &'a str, operation: &Operation, config: &ApiConfig) -> GatewayResult<Self> {
        let request = GraphQlRequest {
            query: operation.document,
            variables: serde_json::Map::new(),
        };
        Ok(ClientMessage::Start {
            id,
            payload: StartPayload {
                data: serde_json::to_string(&request)?,
                extensions: Extensions {
                    authorization: Authorization::for_config(config),
                },
            },
        })
    }

    pub fn to_json(&self) -> GatewayResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionAck {
        #[serde(default)]
        payload: Option<AckPayload>,
    },
    StartAck {
        id: String,
    },
    Data {
        id: String,
        payload: GraphQlResponse,
    },
    Ka,
    Error {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        payload: Option<Value>,
    },
    Complete {
        id: String,
    },
    ConnectionError {
        #[serde(default)]
        payload: Option<Value>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckPayload {
    pub connection_timeout_ms: Option<u32>,
}

impl ServerMessage {
    pub fn parse(text: &str) -> GatewayResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Keep-alive deadline announced by a `connection_ack`
pub fn connection_timeout_ms(ack: Option<&AckPayload>) -> u32 {
    ack.and_then(|ack| ack.connection_timeout_ms)
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_MS)
}

/// What the creation channel does with one server frame
#[derive(Debug, PartialEq)]
pub enum Reaction {
    /// Arm the keep-alive watchdog, then send our `start`
    Register { keep_alive_ms: u32 },
    /// A note pushed for our registration
    Deliver(Note),
    /// Push the keep-alive deadline back
    KeepAlive,
    /// Logged only
    Ignore,
}

/// Decide the reaction to `text` for the channel registered as `registration`.
/// Data for any other registration id is ignored.
pub fn react(registration: &str, text: &str) -> Reaction {
    match ServerMessage::parse(text) {
        Ok(ServerMessage::ConnectionAck { payload }) => Reaction::Register {
            keep_alive_ms: connection_timeout_ms(payload.as_ref()),
        },
        Ok(ServerMessage::StartAck { id }) => {
            tracing::debug!(subscription = %id, "creation channel registered");
            Reaction::Ignore
        }
        Ok(ServerMessage::Data { id, payload }) => {
            if id != registration {
                tracing::debug!(subscription = %id, "data for unknown registration ignored");
                return Reaction::Ignore;
            }
            match payload.take_field::<Note>(ON_CREATE_NOTE.root_field) {
                Ok(note) => Reaction::Deliver(note),
                Err(err) => {
                    tracing::warn!(error = %err, "unreadable pushed note");
                    Reaction::Ignore
                }
            }
        }
        Ok(ServerMessage::Ka) => Reaction::KeepAlive,
        Ok(ServerMessage::Error { id, payload }) => {
            tracing::error!(
                subscription = ?id,
                details = %describe_errors(payload.as_ref()),
                "creation channel error"
            );
            Reaction::Ignore
        }
        Ok(ServerMessage::ConnectionError { payload }) => {
            tracing::error!(details = %describe_errors(payload.as_ref()), "realtime connection rejected");
            Reaction::Ignore
        }
        Ok(ServerMessage::Complete { id }) => {
            tracing::info!(subscription = %id, "creation channel completed by server");
            Reaction::Ignore
        }
        Ok(ServerMessage::Unknown) => {
            tracing::debug!("unrecognized realtime message");
            Reaction::Ignore
        }
        Err(err) => {
            tracing::warn!(error = %err, "unreadable realtime message");
            Reaction::Ignore
        }
    }
}

/// Human-readable summary of an `error` / `connection_error` payload
pub fn describe_errors(payload: Option<&Value>) -> String {
    let messages: Vec<String> = payload
        .and_then(|payload| payload.get("errors"))
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|error| {
                    let kind = error.get("errorType").and_then(Value::as_str).unwrap_or("Error");
                    let message = error.get("message").and_then(Value::as_str).unwrap_or("");
                    format!("{kind}: {message}")
                })
                .collect()
        })
        .unwrap_or_default();
    if messages.is_empty() {
        payload.map(Value::to_string).unwrap_or_else(|| "no details".to_string())
    } else {
        messages.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ApiConfig {
        ApiConfig::new(
            "https://abc.appsync-api.us-east-1.amazonaws.com/graphql",
            "da2-key",
        )
    }

    #[test]
    fn test_connect_url_carries_auth_header() {
        let url = connect_url(&config()).unwrap();
        let (base, query) = url.split_once('?').unwrap();
        assert_eq!(base, "wss://abc.appsync-realtime-api.us-east-1.amazonaws.com/graphql");

        let header = query.strip_prefix("header=").unwrap().split('&').next().unwrap();
        let decoded: Value = serde_json::from_slice(&STANDARD.decode(header).unwrap()).unwrap();
        assert_eq!(decoded["host"], "abc.appsync-api.us-east-1.amazonaws.com");
        assert_eq!(decoded["x-api-key"], "da2-key");
        assert!(query.ends_with("&payload=e30="));
    }

    #[test]
    fn test_client_messages() {
        let init = ClientMessage::ConnectionInit.to_json().unwrap();
        assert_eq!(init, r#"{"type":"connection_init"}"#);

        let stop = ClientMessage::Stop { id: "sub-1" }.to_json().unwrap();
        assert_eq!(stop, r#"{"type":"stop","id":"sub-1"}"#);
    }

    #[test]
    fn test_start_message_embeds_request() {
        let json = ClientMessage::start("sub-1", &ON_CREATE_NOTE, &config())
            .unwrap()
            .to_json()
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "start");
        assert_eq!(value["id"], "sub-1");
        assert_eq!(value["payload"]["extensions"]["authorization"]["x-api-key"], "da2-key");

        let data: Value = serde_json::from_str(value["payload"]["data"].as_str().unwrap()).unwrap();
        assert!(data["query"].as_str().unwrap().contains("onCreateNote"));
        assert_eq!(data["variables"], serde_json::json!({}));
    }

    #[test]
    fn test_parse_ack_and_timeout() {
        let ack = ServerMessage::parse(r#"{"type":"connection_ack","payload":{"connectionTimeoutMs":120000}}"#).unwrap();
        match ack {
            ServerMessage::ConnectionAck { payload } => {
                assert_eq!(connection_timeout_ms(payload.as_ref()), 120_000);
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(connection_timeout_ms(None), DEFAULT_CONNECTION_TIMEOUT_MS);
    }

    #[test]
    fn test_parse_data() {
        let text = r#"{"type":"data","id":"sub-1","payload":{"data":{"onCreateNote":
            {"id":"9","clientId":"c","name":"N","description":"D","completed":false}}}}"#;
        match ServerMessage::parse(text).unwrap() {
            ServerMessage::Data { id, payload } => {
                assert_eq!(id, "sub-1");
                let note: Note = payload.take_field(ON_CREATE_NOTE.root_field).unwrap();
                assert_eq!(note.id, "9");
                assert_eq!(note.client_id, "c");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_parse_keep_alive_and_unknown() {
        assert!(matches!(ServerMessage::parse(r#"{"type":"ka"}"#).unwrap(), ServerMessage::Ka));
        assert!(matches!(
            ServerMessage::parse(r#"{"type":"something_new"}"#).unwrap(),
            ServerMessage::Unknown
        ));
        assert!(ServerMessage::parse("not json").is_err());
    }

    #[test]
    fn test_describe_errors() {
        let text = r#"{"type":"error","id":"sub-1","payload":{"errors":[
            {"errorType":"UnauthorizedException","message":"Permission denied"}]}}"#;
        match ServerMessage::parse(text).unwrap() {
            ServerMessage::Error { id, payload } => {
                assert_eq!(id.as_deref(), Some("sub-1"));
                assert_eq!(
                    describe_errors(payload.as_ref()),
                    "UnauthorizedException: Permission denied"
                );
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert_eq!(describe_errors(None), "no details");
    }

    const PUSHED: &str = r#"{"type":"data","id":"sub-1","payload":{"data":{"onCreateNote":
        {"id":"9","clientId":"c","name":"N","description":"D","completed":false}}}}"#;

    #[test]
    fn test_react_to_ack_registers_with_timeout() {
        assert_eq!(
            react("sub-1", r#"{"type":"connection_ack","payload":{"connectionTimeoutMs":120000}}"#),
            Reaction::Register { keep_alive_ms: 120_000 }
        );
        assert_eq!(
            react("sub-1", r#"{"type":"connection_ack"}"#),
            Reaction::Register { keep_alive_ms: DEFAULT_CONNECTION_TIMEOUT_MS }
        );
    }

    #[test]
    fn test_react_delivers_only_own_registration() {
        match react("sub-1", PUSHED) {
            Reaction::Deliver(note) => assert_eq!(note.id, "9"),
            other => panic!("unexpected reaction: {other:?}"),
        }
        assert_eq!(react("sub-2", PUSHED), Reaction::Ignore);
    }

    #[test]
    fn test_react_to_other_frames() {
        assert_eq!(react("sub-1", r#"{"type":"ka"}"#), Reaction::KeepAlive);
        assert_eq!(react("sub-1", r#"{"type":"start_ack","id":"sub-1"}"#), Reaction::Ignore);
        assert_eq!(react("sub-1", r#"{"type":"complete","id":"sub-1"}"#), Reaction::Ignore);
        assert_eq!(react("sub-1", r#"{"type":"error","id":"sub-1"}"#), Reaction::Ignore);
        assert_eq!(react("sub-1", r#"{"type":"data","id":"sub-1","payload":{"data":null}}"#), Reaction::Ignore);
        assert_eq!(react("sub-1", "not json"), Reaction::Ignore);
    }
}
