use crate::error::BackendError;
use crate::types::{DocumentFields, DocumentRef, QuerySnapshot};
use std::sync::Arc;

/// Completion callback for a one-shot collection fetch.
pub type GetCallback = Box<dyn FnOnce(Result<QuerySnapshot, BackendError>) + Send>;

/// Completion callback for a one-shot document add.
pub type AddCallback = Box<dyn FnOnce(Result<DocumentRef, BackendError>) + Send>;

/// Listener invoked repeatedly by the backend with every live update.
///
/// The two arguments mirror the backend's wire shape: exactly one of them is
/// populated per invocation, except for the close notification where both
/// are absent.
pub type SnapshotListener = Box<dyn FnMut(Option<QuerySnapshot>, Option<BackendError>) + Send>;

/// Callback-convention surface of a backend collection: one-shot fetch and
/// one-shot add. The backend owns the network call and invokes the
/// completion callback exactly once, on a thread of its choosing.
pub trait CollectionClient: Send + Sync {
    fn get(&self, on_complete: GetCallback);

    fn add(&self, fields: DocumentFields, on_complete: AddCallback);
}

/// Callback-convention surface of a backend query: live listener
/// registration. The backend invokes the listener repeatedly, on its own
/// notification thread, until the registration is removed or the backend
/// closes the stream.
pub trait QueryClient: Send + Sync {
    fn add_snapshot_listener(&self, listener: SnapshotListener) -> Box<dyn ListenerRegistration>;
}

/// Handle for an open listener registration. `remove` is idempotent.
pub trait ListenerRegistration: Send {
    fn remove(&self);
}

impl<T> CollectionClient for Arc<T>
where
    T: CollectionClient + ?Sized,
{
    fn get(&self, on_complete: GetCallback) {
        (**self).get(on_complete)
    }

    fn add(&self, fields: DocumentFields, on_complete: AddCallback) {
        (**self).add(fields, on_complete)
    }
}

impl<T> QueryClient for Arc<T>
where
    T: QueryClient + ?Sized,
{
    fn add_snapshot_listener(&self, listener: SnapshotListener) -> Box<dyn ListenerRegistration> {
        (**self).add_snapshot_listener(listener)
    }
}
