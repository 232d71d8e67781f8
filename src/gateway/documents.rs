//! GraphQL Documents
//!
//! Operations against the `Note` schema, with the root field each returns.

pub struct Operation {
    pub document: &'static str,
    pub root_field: &'static str,
}

pub const LIST_NOTES: Operation = Operation {
    document: r#"query ListNotes {
  listNotes {
    items {
      id
      clientId
      name
      description
      completed
    }
  }
}"#,
    root_field: "listNotes",
};

pub const CREATE_NOTE: Operation = Operation {
    document: r#"mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) {
    id
    clientId
    name
    description
    completed
  }
}"#,
    root_field: "createNote",
};

pub const UPDATE_NOTE: Operation = Operation {
    document: r#"mutation UpdateNote($input: UpdateNoteInput!) {
  updateNote(input: $input) {
    id
    clientId
    name
    description
    completed
  }
}"#,
    root_field: "updateNote",
};

pub const DELETE_NOTE: Operation = Operation {
    document: r#"mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) {
    id
    clientId
    name
    description
    completed
  }
}"#,
    root_field: "deleteNote",
};

pub const ON_CREATE_NOTE: Operation = Operation {
    document: r#"subscription OnCreateNote {
  onCreateNote {
    id
    clientId
    name
    description
    completed
  }
}"#,
    root_field: "onCreateNote",
};
