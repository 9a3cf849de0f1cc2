use docflow_client::{
    BackendError, BackendResult, CollectionClient, Document, DocumentFields, DocumentRef,
    QuerySnapshot, to_document_fields,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::oneshot;

/// Suspension-based view of a callback-convention backend collection.
///
/// Every operation registers a completion callback with the backend and
/// suspends until that callback resolves a single-use channel. Dropping the
/// returned future before completion detaches the caller from the eventual
/// result; the backend request itself is not cancelled and runs to
/// completion or failure in the background, after which the result is
/// discarded with a debug-level log entry.
pub struct CollectionAdapter<C> {
    client: C,
}

impl<C> CollectionAdapter<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C> CollectionAdapter<C>
where
    C: CollectionClient,
{
    /// Fetch the collection once and resolve with the backend's native
    /// result set, untouched.
    pub async fn fetch_raw(&self) -> BackendResult<QuerySnapshot> {
        let (tx, rx) = oneshot::channel();
        self.client.get(Box::new(move |outcome| {
            if tx.send(outcome).is_err() {
                log::debug!("collection fetch completed after caller cancelled; result discarded");
            }
        }));
        resolved(rx).await
    }

    /// Fetch the collection once, applying `parse` to every document in
    /// backend return order. The transform runs on the backend's completion
    /// thread and must not block indefinitely.
    pub async fn fetch_with<T, F>(&self, parse: F) -> BackendResult<Vec<T>>
    where
        T: Send + 'static,
        F: Fn(&Document) -> T + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.client.get(Box::new(move |outcome| {
            let parsed = outcome.map(|snapshot| snapshot.iter().map(&parse).collect::<Vec<T>>());
            if tx.send(parsed).is_err() {
                log::debug!("collection fetch completed after caller cancelled; result discarded");
            }
        }));
        resolved(rx).await
    }

    /// Fetch the collection once, converting every document through the
    /// backend's typed-conversion primitive. The first document that fails
    /// to decode fails the whole call with that error.
    pub async fn fetch_as<T>(&self) -> BackendResult<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.client.get(Box::new(move |outcome| {
            let parsed = outcome.and_then(|snapshot| {
                snapshot
                    .iter()
                    .map(|doc| doc.to_object::<T>())
                    .collect::<BackendResult<Vec<T>>>()
            });
            if tx.send(parsed).is_err() {
                log::debug!("collection fetch completed after caller cancelled; result discarded");
            }
        }));
        resolved(rx).await
    }

    /// Add a typed value as a new document. The value must serialize to a
    /// string-keyed object; anything else is rejected before the backend is
    /// contacted. Resolves with the backend's reference to the newly
    /// created document.
    pub async fn add<T: Serialize>(&self, value: &T) -> BackendResult<DocumentRef> {
        let fields = to_document_fields(value)?;
        self.add_fields(fields).await
    }

    /// Add a generic string-keyed mapping as a new document.
    pub async fn add_fields(&self, fields: DocumentFields) -> BackendResult<DocumentRef> {
        let (tx, rx) = oneshot::channel();
        self.client.add(
            fields,
            Box::new(move |outcome| {
                if tx.send(outcome).is_err() {
                    log::debug!("document add completed after caller cancelled; result discarded");
                }
            }),
        );
        resolved(rx).await
    }
}

/// Await the completion callback's resolution. A backend that drops the
/// callback without invoking it surfaces as a backend failure rather than a
/// hang.
async fn resolved<T>(rx: oneshot::Receiver<BackendResult<T>>) -> BackendResult<T> {
    match rx.await {
        Ok(outcome) => outcome,
        Err(_) => Err(BackendError::Backend(
            "backend dropped the completion callback without resolving it".to_string(),
        )),
    }
}
