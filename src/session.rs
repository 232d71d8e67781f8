//! Session Identity
//!
//! One random identifier per running client, plus fresh note ids.

use std::fmt;

use uuid::Uuid;

/// Identifier of this running client instance.
///
/// Generated once at startup and passed down explicitly; every note created
/// here carries it as `client_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// True when `client_id` is exactly this session's tag, as written by
    /// [`Display`](fmt::Display). Other spellings of the same uuid are foreign.
    pub fn owns(&self, client_id: &str) -> bool {
        let mut buf = Uuid::encode_buffer();
        client_id == &*self.0.hyphenated().encode_lower(&mut buf)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Fresh globally unique id (notes, subscription registrations)
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
