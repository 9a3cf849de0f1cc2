use docflow_adapter::CollectionAdapter;
use docflow_adapter::testing::MockCollection;
use docflow_client::{BackendError, Document, DocumentFields, DocumentRef, QuerySnapshot};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Note {
    title: String,
}

fn note_doc(id: &str, title: &str) -> Document {
    let mut fields = DocumentFields::new();
    fields.insert("title".to_string(), serde_json::json!(title));
    Document::new(id, fields)
}

fn note_snapshot(titles: &[(&str, &str)]) -> QuerySnapshot {
    QuerySnapshot::new(
        titles
            .iter()
            .map(|(id, title)| note_doc(id, title))
            .collect(),
    )
}

#[tokio::test(flavor = "current_thread")]
async fn fetch_with_identity_expected_all_documents_in_order() {
    let mock = MockCollection::new();
    mock.push_get_result(Ok(note_snapshot(&[("a", "a"), ("b", "b"), ("c", "c")])));
    let adapter = CollectionAdapter::new(mock);

    let ids = adapter
        .fetch_with(|doc| doc.id.clone())
        .await
        .expect("scripted fetch should succeed");
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test(flavor = "current_thread")]
async fn fetch_as_expected_typed_values_in_order() {
    let mock = MockCollection::new();
    mock.push_get_result(Ok(note_snapshot(&[("1", "first"), ("2", "second")])));
    let adapter = CollectionAdapter::new(mock);

    let notes: Vec<Note> = adapter.fetch_as().await.expect("typed fetch should decode");
    assert_eq!(
        notes,
        vec![
            Note {
                title: "first".to_string()
            },
            Note {
                title: "second".to_string()
            },
        ]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn fetch_as_on_undecodable_document_expected_decode_error() {
    let mock = MockCollection::new();
    mock.push_get_result(Ok(QuerySnapshot::new(vec![Document::new(
        "broken",
        DocumentFields::new(),
    )])));
    let adapter = CollectionAdapter::new(mock);

    let result: Result<Vec<Note>, BackendError> = adapter.fetch_as().await;
    assert!(matches!(result, Err(BackendError::Decode(_))));
}

#[tokio::test(flavor = "current_thread")]
async fn fetch_raw_expected_native_snapshot_untouched() {
    let snapshot = note_snapshot(&[("1", "a"), ("2", "b")]);
    let mock = MockCollection::new();
    mock.push_get_result(Ok(snapshot.clone()));
    let adapter = CollectionAdapter::new(mock);

    let fetched = adapter.fetch_raw().await.expect("raw fetch should succeed");
    assert_eq!(fetched, snapshot);
}

#[tokio::test(flavor = "current_thread")]
async fn fetch_failure_expected_backend_error_forwarded_verbatim() {
    let error = BackendError::Unavailable("network-lost".to_string());
    let mock = MockCollection::new();
    mock.push_get_result(Err(error.clone()));
    let adapter = CollectionAdapter::new(mock);

    let result = adapter.fetch_raw().await;
    assert_eq!(result, Err(error));
}

#[tokio::test(flavor = "current_thread")]
async fn add_expected_backend_document_ref_identity() {
    let reference = DocumentRef::new("n-9", "notes/n-9");
    let mock = MockCollection::new();
    mock.push_add_result(Ok(reference.clone()));
    let adapter = CollectionAdapter::new(mock);

    let created = adapter
        .add(&Note {
            title: "hello".to_string(),
        })
        .await
        .expect("scripted add should succeed");
    assert_eq!(created, reference);

    let added = adapter.client().added_fields();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].get("title"), Some(&serde_json::json!("hello")));
}

#[tokio::test(flavor = "current_thread")]
async fn add_fields_failure_expected_backend_error_and_no_ref() {
    let error = BackendError::PermissionDenied("writes disabled".to_string());
    let mock = MockCollection::new();
    mock.push_add_result(Err(error.clone()));
    let adapter = CollectionAdapter::new(mock);

    let mut fields = DocumentFields::new();
    fields.insert("title".to_string(), serde_json::json!("rejected"));
    let result = adapter.add_fields(fields).await;
    assert_eq!(result, Err(error));
}

#[tokio::test(flavor = "current_thread")]
async fn add_non_object_value_expected_rejection_before_backend_call() {
    let mock = MockCollection::new();
    let adapter = CollectionAdapter::new(mock);

    let result = adapter.add(&42_u32).await;
    assert!(matches!(result, Err(BackendError::InvalidDocument(_))));
    assert!(adapter.client().added_fields().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn cancelled_fetch_expected_backend_completion_discarded() {
    let mock = MockCollection::deferred();
    let adapter = CollectionAdapter::new(mock.clone());

    // Poll the fetch once so the backend request is issued, then drop it.
    let cancelled = tokio::time::timeout(Duration::from_millis(10), adapter.fetch_raw()).await;
    assert!(cancelled.is_err(), "deferred fetch should still be pending");
    assert_eq!(mock.pending_get_count(), 1);

    // The backend completes after the caller has detached; the late result
    // is discarded without panicking or resuming anything.
    let fired = mock.complete_next_get(Ok(note_snapshot(&[("1", "late")])));
    assert!(fired);
    assert_eq!(mock.pending_get_count(), 0);
}
