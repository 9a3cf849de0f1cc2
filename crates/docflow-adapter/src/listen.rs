use docflow_client::{
    BackendResult, Document, ListenerRegistration, QueryClient, QuerySnapshot,
};
use futures::Stream;
use serde::de::DeserializeOwned;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Default capacity of the per-registration delivery channel.
pub const DEFAULT_LISTEN_BUFFER: usize = 16;

/// Listen configuration.
#[derive(Clone, Debug)]
pub struct ListenOptions {
    /// Capacity of the delivery channel between the backend's notification
    /// thread and the consuming stream.
    pub buffer: usize,
}

impl ListenOptions {
    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }
}

impl Default for ListenOptions {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_LISTEN_BUFFER,
        }
    }
}

/// Stream-based view of a callback-convention backend query.
///
/// `listen_with` and `listen_as` register a live snapshot listener and
/// bridge its push-based notifications into a pull-based [`ListenStream`].
pub struct QueryAdapter<Q> {
    client: Q,
    options: ListenOptions,
}

impl<Q> QueryAdapter<Q> {
    pub fn new(client: Q) -> Self {
        Self::with_options(client, ListenOptions::default())
    }

    pub fn with_options(client: Q, options: ListenOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &Q {
        &self.client
    }
}

impl<Q> QueryAdapter<Q>
where
    Q: QueryClient,
{
    /// Register a live listener and stream every update batch, applying
    /// `parse` to each document in backend delivery order.
    ///
    /// Delivery uses a bounded channel with a blocking send on the
    /// backend's notification thread: when the consumer falls behind and
    /// the buffer fills, the backend's own delivery thread stalls until an
    /// element is drained. Memory stays bounded at the cost of
    /// back-pressuring the backend.
    pub fn listen_with<T, F>(&self, parse: F) -> ListenStream<T>
    where
        T: Send + 'static,
        F: Fn(&Document) -> T + Send + 'static,
    {
        self.listen_inner(move |doc| Ok(parse(doc)))
    }

    /// Register a live listener and stream every update batch through the
    /// backend's typed-conversion primitive. A document that fails to
    /// decode terminates the stream with that error.
    pub fn listen_as<T>(&self) -> ListenStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.listen_inner(|doc| doc.to_object::<T>())
    }

    fn listen_inner<T, F>(&self, parse: F) -> ListenStream<T>
    where
        T: Send + 'static,
        F: Fn(&Document) -> BackendResult<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.options.buffer);

        // The sender slot doubles as the terminal flag: once an error or a
        // null snapshot arrives it stays empty and later notifications are
        // ignored.
        let mut slot = Some(tx);
        let registration = self
            .client
            .add_snapshot_listener(Box::new(move |snapshot, error| {
                let Some(tx) = slot.take() else {
                    return;
                };

                if let Some(error) = error {
                    if tx.blocking_send(Err(error)).is_err() {
                        log::debug!("listen consumer dropped before error delivery; suppressed");
                    }
                    return;
                }

                let Some(snapshot) = snapshot else {
                    // Null update: close the stream with no error.
                    return;
                };

                let batch = parse_batch(&snapshot, &parse);
                let terminal = batch.is_err();
                if tx.blocking_send(batch).is_err() {
                    log::debug!("listen consumer dropped; suppressing further updates");
                    return;
                }
                if !terminal {
                    slot = Some(tx);
                }
            }));

        ListenStream {
            rx,
            registration: Some(registration),
        }
    }
}

fn parse_batch<T, F>(snapshot: &QuerySnapshot, parse: &F) -> BackendResult<Vec<T>>
where
    F: Fn(&Document) -> BackendResult<T>,
{
    snapshot.iter().map(parse).collect()
}

/// Ordered sequence of transformed update batches from one listener
/// registration.
///
/// The stream yields `Ok(batch)` for every update, then terminates: an
/// `Err` element followed by end-of-stream when the backend reports an
/// error, or a bare end-of-stream when the backend delivers a null update.
///
/// Dropping the stream stops delivery but does not deterministically remove
/// the backend registration; call [`ListenStream::unregister`] for explicit
/// teardown.
pub struct ListenStream<T> {
    rx: mpsc::Receiver<BackendResult<Vec<T>>>,
    registration: Option<Box<dyn ListenerRegistration>>,
}

impl<T> ListenStream<T> {
    /// Receive the next batch, or `None` once the stream has terminated.
    pub async fn recv(&mut self) -> Option<BackendResult<Vec<T>>> {
        self.rx.recv().await
    }

    /// Remove the backend listener registration and discard the stream.
    pub fn unregister(mut self) {
        if let Some(registration) = self.registration.take() {
            registration.remove();
        }
    }
}

impl<T> Stream for ListenStream<T> {
    type Item = BackendResult<Vec<T>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_options_default_expected_nonzero_buffer() {
        let options = ListenOptions::default();
        assert_eq!(options.buffer, DEFAULT_LISTEN_BUFFER);
    }

    #[test]
    fn listen_options_with_buffer_expected_minimum_of_one() {
        let options = ListenOptions::default().with_buffer(0);
        assert_eq!(options.buffer, 1);
    }
}
