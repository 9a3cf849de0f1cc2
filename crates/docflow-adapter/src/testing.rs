//! Scripted backends for exercising the adapters without a live document
//! store. `MockQuery` delivers listener events from a dedicated thread,
//! matching how a real SDK invokes snapshot listeners off the caller's
//! thread.

use docflow_client::{
    AddCallback, BackendError, CollectionClient, DocumentFields, DocumentRef, GetCallback,
    ListenerRegistration, QueryClient, QuerySnapshot, SnapshotListener,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

/// Scripted collection backend.
///
/// Results queued with `push_get_result` / `push_add_result` are delivered
/// synchronously from within `get` / `add`. A collection built with
/// [`MockCollection::deferred`] instead parks each completion callback until
/// the test fires it via [`MockCollection::complete_next_get`], which is how
/// cancellation-before-completion is exercised.
#[derive(Clone, Default)]
pub struct MockCollection {
    inner: Arc<Mutex<MockCollectionState>>,
}

#[derive(Default)]
struct MockCollectionState {
    deferred: bool,
    get_results: VecDeque<Result<QuerySnapshot, BackendError>>,
    add_results: VecDeque<Result<DocumentRef, BackendError>>,
    pending_gets: VecDeque<GetCallback>,
    added_fields: Vec<DocumentFields>,
}

impl MockCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection that parks `get` completions until the test fires them.
    pub fn deferred() -> Self {
        let mock = Self::default();
        mock.lock().deferred = true;
        mock
    }

    pub fn push_get_result(&self, result: Result<QuerySnapshot, BackendError>) {
        self.lock().get_results.push_back(result);
    }

    pub fn push_add_result(&self, result: Result<DocumentRef, BackendError>) {
        self.lock().add_results.push_back(result);
    }

    /// Fire the oldest parked `get` completion. Returns false when nothing
    /// is parked.
    pub fn complete_next_get(&self, result: Result<QuerySnapshot, BackendError>) -> bool {
        let callback = self.lock().pending_gets.pop_front();
        match callback {
            Some(callback) => {
                callback(result);
                true
            }
            None => false,
        }
    }

    /// Field maps handed to `add`, in call order.
    pub fn added_fields(&self) -> Vec<DocumentFields> {
        self.lock().added_fields.clone()
    }

    pub fn pending_get_count(&self) -> usize {
        self.lock().pending_gets.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockCollectionState> {
        self.inner.lock().expect("mock collection mutex poisoned")
    }
}

impl CollectionClient for MockCollection {
    fn get(&self, on_complete: GetCallback) {
        let scripted = {
            let mut state = self.lock();
            if state.deferred {
                state.pending_gets.push_back(on_complete);
                return;
            }
            state.get_results.pop_front()
        };
        let result = scripted.unwrap_or_else(|| {
            Err(BackendError::Backend(
                "mock collection has no scripted get result".to_string(),
            ))
        });
        on_complete(result);
    }

    fn add(&self, fields: DocumentFields, on_complete: AddCallback) {
        let scripted = {
            let mut state = self.lock();
            state.added_fields.push(fields);
            state.add_results.pop_front()
        };
        let result = scripted.unwrap_or_else(|| {
            Err(BackendError::Backend(
                "mock collection has no scripted add result".to_string(),
            ))
        });
        on_complete(result);
    }
}

/// One scripted listener notification.
pub enum ListenerEvent {
    Snapshot(QuerySnapshot),
    Error(BackendError),
    /// Null update: the backend closed the stream without an error.
    Closed,
}

/// Scripted query backend supporting a single listener registration.
///
/// Events may be pushed before or after registration; once a listener is
/// attached a dedicated thread drains the queue and invokes it, so a
/// blocking delivery into a full adapter channel stalls the mock's notifier
/// thread and never the test runtime.
#[derive(Clone)]
pub struct MockQuery {
    events: mpsc::Sender<ListenerEvent>,
    receiver: Arc<Mutex<Option<mpsc::Receiver<ListenerEvent>>>>,
    removed: Arc<AtomicBool>,
}

impl MockQuery {
    pub fn new() -> Self {
        let (events, receiver) = mpsc::channel();
        Self {
            events,
            receiver: Arc::new(Mutex::new(Some(receiver))),
            removed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn push_snapshot(&self, snapshot: QuerySnapshot) {
        let _ = self.events.send(ListenerEvent::Snapshot(snapshot));
    }

    pub fn push_error(&self, error: BackendError) {
        let _ = self.events.send(ListenerEvent::Error(error));
    }

    pub fn push_closed(&self) {
        let _ = self.events.send(ListenerEvent::Closed);
    }

    /// Whether the registration handle was explicitly removed.
    pub fn listener_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }
}

impl Default for MockQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient for MockQuery {
    fn add_snapshot_listener(&self, mut listener: SnapshotListener) -> Box<dyn ListenerRegistration> {
        let receiver = self
            .receiver
            .lock()
            .expect("mock query mutex poisoned")
            .take();
        if let Some(receiver) = receiver {
            let removed = self.removed.clone();
            let spawned = thread::Builder::new()
                .name("docflow-mock-notifier".into())
                .spawn(move || {
                    while let Ok(event) = receiver.recv() {
                        if removed.load(Ordering::SeqCst) {
                            break;
                        }
                        match event {
                            ListenerEvent::Snapshot(snapshot) => listener(Some(snapshot), None),
                            ListenerEvent::Error(error) => listener(None, Some(error)),
                            ListenerEvent::Closed => listener(None, None),
                        }
                    }
                });
            spawned.expect("mock notifier thread should spawn");
        }

        Box::new(MockRegistration {
            removed: self.removed.clone(),
        })
    }
}

struct MockRegistration {
    removed: Arc<AtomicBool>,
}

impl ListenerRegistration for MockRegistration {
    fn remove(&self) {
        self.removed.store(true, Ordering::SeqCst);
    }
}
