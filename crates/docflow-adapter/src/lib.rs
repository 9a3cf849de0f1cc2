#![doc = r#"
Suspension and streaming adapters for a callback-convention document store.

Operation mapping:

| Adapter method | Backend primitive | Calling convention exposed |
| --- | --- | --- |
| `CollectionAdapter::fetch_raw` | `CollectionClient::get` | one suspension, native result set |
| `CollectionAdapter::fetch_with` | `CollectionClient::get` | one suspension, per-document transform |
| `CollectionAdapter::fetch_as` | `CollectionClient::get` + `Document::to_object` | one suspension, typed list |
| `CollectionAdapter::add` | `CollectionClient::add` | one suspension, typed value |
| `CollectionAdapter::add_fields` | `CollectionClient::add` | one suspension, generic field map |
| `QueryAdapter::listen_with` | `QueryClient::add_snapshot_listener` | back-pressured batch stream |
| `QueryAdapter::listen_as` | `QueryClient::add_snapshot_listener` + `Document::to_object` | back-pressured typed stream |

Implementation notes:
- One-shot operations suspend exactly once on a `tokio::sync::oneshot`
  channel and resume exactly once; a dropped caller detaches from the
  in-flight backend request, which completes in the background.
- Listen delivery crosses from the backend's notification thread into the
  consumer through a bounded `tokio::sync::mpsc` channel with a blocking
  send, so a slow consumer stalls the backend's delivery thread instead of
  growing memory.
- Backend errors are forwarded verbatim; the adapter performs no retries and
  no reclassification.
- Suppressed post-cancellation completions are logged at debug level via the
  `log` facade.
"#]

pub mod collection;
pub mod listen;
pub mod testing;

pub use collection::CollectionAdapter;
pub use listen::{DEFAULT_LISTEN_BUFFER, ListenOptions, ListenStream, QueryAdapter};
