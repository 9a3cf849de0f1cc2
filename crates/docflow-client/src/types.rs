use crate::error::{BackendError, BackendResult};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub type DocumentId = String;

/// Generic string-keyed mapping accepted by the backend `add` primitive.
pub type DocumentFields = serde_json::Map<String, serde_json::Value>;

/// One raw record as retrieved from the backend.
///
/// Documents are transient values: the backend hands them to a completion
/// callback or snapshot listener, the caller-supplied transform consumes
/// them, and nothing is retained afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: DocumentFields,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, fields: DocumentFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// The backend-supplied conversion primitive from a raw record to a
    /// typed object.
    pub fn to_object<T: DeserializeOwned>(&self) -> BackendResult<T> {
        serde_json::from_value(serde_json::Value::Object(self.fields.clone()))
            .map_err(|err| BackendError::Decode(format!("document {}: {err}", self.id)))
    }

    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}

/// The backend's native result set for a one-shot fetch or one listener
/// update: an ordered batch of documents in backend return order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySnapshot {
    docs: Vec<Document>,
}

impl QuerySnapshot {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.docs.iter()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl IntoIterator for QuerySnapshot {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuerySnapshot {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

/// Reference to a newly created document, as reported by the backend `add`
/// primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub path: String,
}

impl DocumentRef {
    pub fn new(id: impl Into<DocumentId>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }
}

/// Serialize a typed value into the string-keyed mapping shape the backend
/// accepts. Values that do not serialize to a JSON object are rejected
/// before any backend call is issued.
pub fn to_document_fields<T: Serialize>(value: &T) -> BackendResult<DocumentFields> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(BackendError::InvalidDocument(format!(
            "expected a string-keyed object, got {}",
            json_type_name(&other)
        ))),
        Err(err) => Err(BackendError::InvalidDocument(err.to_string())),
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
