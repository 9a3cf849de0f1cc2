//! Callback-convention surface of a document-store backend.
//!
//! This crate defines the traits and transient value types that the
//! `docflow-adapter` crate converts into `async` suspension points and
//! back-pressured streams. It deliberately contains no network client: the
//! backend SDK owns query semantics, transport, and retries, and reaches
//! this layer only through the `CollectionClient` / `QueryClient` callback
//! primitives.

pub mod client;
pub mod error;
pub mod types;

pub use client::{
    AddCallback, CollectionClient, GetCallback, ListenerRegistration, QueryClient,
    SnapshotListener,
};
pub use error::{BackendError, BackendResult};
pub use types::{
    Document, DocumentFields, DocumentId, DocumentRef, QuerySnapshot, to_document_fields,
};
