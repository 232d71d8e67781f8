//! Frontend Models
//!
//! Data structures matching the GraphQL `Note` type.

use serde::{Deserialize, Serialize};

/// Note record (matches backend)
///
/// `client_id` tags the session that created the note; it travels as
/// `clientId` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub client_id: String,
}

/// Fields of the new-note form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 2] = [FormField::Name, FormField::Description];

    /// Parse an input element's `name` attribute
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(FormField::Name),
            "description" => Some(FormField::Description),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Description => "description",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Name => "Enter Note Name",
            FormField::Description => "Enter Note description",
        }
    }
}
