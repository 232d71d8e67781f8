//! AppSync Gateway
//!
//! [`NoteGateway`] over a managed AppSync GraphQL API with API-key auth.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::documents::{Operation, CREATE_NOTE, DELETE_NOTE, LIST_NOTES, UPDATE_NOTE};
use super::wire::{self, DeleteNoteInput, GraphQlRequest, InputVariables, NoteConnection, UpdateCompletionInput};
use super::{http, socket, NoteGateway, OnNote, Subscription};
use crate::config::ApiConfig;
use crate::error::GatewayResult;
use crate::models::Note;

pub struct AppSyncGateway {
    config: ApiConfig,
}

impl AppSyncGateway {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    async fn execute<V, T>(&self, operation: &Operation, variables: V) -> GatewayResult<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(&GraphQlRequest {
            query: operation.document,
            variables,
        })?;
        let response = http::post_graphql(&self.config.graphql_endpoint, &self.config.api_key, &body).await?;
        wire::decode_field(&response, operation.root_field)
    }
}

#[async_trait(?Send)]
impl NoteGateway for AppSyncGateway {
    async fn list_notes(&self) -> GatewayResult<Vec<Note>> {
        let connection: NoteConnection<Note> = self.execute(&LIST_NOTES, serde_json::Map::new()).await?;
        Ok(connection.items)
    }

    async fn create_note(&self, note: &Note) -> GatewayResult<Note> {
        self.execute(&CREATE_NOTE, InputVariables { input: note }).await
    }

    async fn update_note(&self, id: &str, completed: bool) -> GatewayResult<Note> {
        self.execute(&UPDATE_NOTE, InputVariables { input: UpdateCompletionInput { id, completed } })
            .await
    }

    async fn delete_note(&self, id: &str) -> GatewayResult<()> {
        let _deleted: Note = self.execute(&DELETE_NOTE, InputVariables { input: DeleteNoteInput { id } }).await?;
        Ok(())
    }

    fn subscribe_creations(&self, on_note: OnNote) -> GatewayResult<Subscription> {
        socket::open_creation_channel(&self.config, on_note)
    }
}
