//! Record domain model.
//!
//! # Responsibility
//! - Hold the ordered, uniquely-named text fields of one record.
//! - Hold the record tag list as canonical tokens.
//!
//! # Invariants
//! - Field order is the order the fields were declared in.
//! - `tags` never contains empty tokens or whitespace inside a token.
//! - The tag list is addressed through the reserved field name `Tags`.

/// Stable identifier of a record owned by the storage collaborator.
pub type RecordId = i64;

/// Reserved field name addressing the record tag list.
pub const TAGS_FIELD: &str = "Tags";

/// One named text field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Stored HTML/text value.
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Canonical record shape loaded from and written back to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    /// Declared fields, in template order.
    pub fields: Vec<Field>,
    /// Canonical tag tokens.
    pub tags: Vec<String>,
    /// Number of persisted writes since creation.
    pub revision: i64,
}

impl Record {
    /// Creates an unsaved record with no tags.
    pub fn new(id: RecordId, fields: Vec<Field>) -> Self {
        Self {
            id,
            fields,
            tags: Vec::new(),
            revision: 0,
        }
    }

    /// Returns the value of `name`, or `None` when the field is not declared.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Replaces the value of an existing field.
    ///
    /// Returns `false` without touching the record when `name` is unknown.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Returns whether `name` addresses the tag list instead of a field.
    pub fn is_tags_field(name: &str) -> bool {
        name == TAGS_FIELD
    }

    /// Space-joined tag string as shown to the user.
    pub fn tags_text(&self) -> String {
        self.tags.join(" ")
    }
}
