use super::*;
use crate::net::Transport;
use crate::net::mock::{MockTransport, client_with_token};
use serde_json::json;
use tokio::sync::Notify;
use wire::{Attachment, Slide, UserRecord};

fn slides(mock_token: Option<&str>) -> (ResourceSlice<Slide>, Arc<MockTransport>) {
    let (client, mock) = client_with_token(mock_token);
    (ResourceSlice::new(client, "/super-admin/home/slides"), mock)
}

fn ids<R: Record>(items: &[R]) -> Vec<RecordId> {
    items.iter().map(Record::id).collect()
}

// =============================================================================
// QUERY
// =============================================================================

#[test]
fn query_pairs_skip_blank_values() {
    let query = ListQuery::default().page(2).role("coach").search("   ");
    assert_eq!(
        query.to_pairs(),
        vec![("page".to_owned(), "2".to_owned()), ("role".to_owned(), "coach".to_owned())]
    );
    assert_eq!(query.search, None);
}

#[test]
fn query_date_range() {
    let query = ListQuery::default().date_range(Some("2024-01-01".into()), Some(String::new()));
    assert_eq!(query.to_pairs(), vec![("date_from".to_owned(), "2024-01-01".to_owned())]);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[tokio::test]
async fn list_create_delete_then_failed_list_keeps_collection() {
    let (slice, mock) = slides(Some("tok"));

    mock.push_ok(json!({ "data": [{ "id": 1, "title": "A" }] }));
    slice.list(ListQuery::default()).await.unwrap();
    assert_eq!(ids(&slice.items()), vec![1]);

    mock.push_ok(json!({ "data": { "id": 2, "title": "B" } }));
    slice.create(FormPayload::new().field("title", "B")).await.unwrap();
    assert_eq!(ids(&slice.items()), vec![1, 2]);

    mock.push_ok(json!({}));
    slice.delete(1).await.unwrap();
    assert_eq!(ids(&slice.items()), vec![2]);
    assert_eq!(mock.last_request().path, "/super-admin/home/slides/1");
    assert_eq!(mock.last_request().method, Method::Delete);

    mock.push_api_err(500, "Server error");
    let err = slice.list(ListQuery::default()).await.unwrap_err();
    assert_eq!(err.reason(), "Server error");

    let state = slice.snapshot();
    assert_eq!(ids(&state.items), vec![2]);
    assert_eq!(state.list.error(), Some("Server error"));
    assert_eq!(state.items[0].title.as_deref(), Some("B"));
}

#[tokio::test]
async fn list_replaces_collection_and_cursor() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!({
        "data": [{ "id": 7 }, { "id": 8 }],
        "meta": { "current_page": 2, "last_page": 3, "per_page": 2, "total": 6, "from": 3, "to": 4 }
    }));
    let items = slice.list(ListQuery::default().page(2)).await.unwrap();
    assert_eq!(items.len(), 2);

    let state = slice.snapshot();
    assert_eq!(state.cursor.current_page(), 2);
    assert_eq!(state.cursor.total, 6);
    assert_eq!(state.cursor.range(), (3, 4));
    assert_eq!(state.list, OpStatus::Idle);
    assert_eq!(state.last_query.page, Some(2));
    assert_eq!(mock.last_request().query_value("page"), Some("2"));
}

#[tokio::test]
async fn list_sends_bearer_token() {
    let (slice, mock) = slides(Some("abc"));
    slice.list(ListQuery::default()).await.unwrap();
    assert_eq!(mock.last_request().bearer.as_deref(), Some("abc"));
    assert_eq!(mock.last_request().method, Method::Get);
}

#[tokio::test]
async fn create_failure_leaves_collection() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!([{ "id": 1 }]));
    slice.list(ListQuery::default()).await.unwrap();

    mock.push_api_err(422, "The title field is required.");
    assert!(slice.create(FormPayload::new()).await.is_err());
    let state = slice.snapshot();
    assert_eq!(ids(&state.items), vec![1]);
    assert_eq!(state.create.error(), Some("The title field is required."));
    assert_eq!(state.list, OpStatus::Idle);
}

#[tokio::test]
async fn create_with_attachment_is_multipart_post() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!({ "data": { "id": 5, "title": "Hero" } }));
    slice
        .create(FormPayload::new().field("title", "Hero").file("image", Attachment::new("hero.jpg", vec![1])))
        .await
        .unwrap();
    let sent = mock.last_request();
    assert_eq!(sent.method, Method::Post);
    assert!(matches!(sent.body, RequestBody::Form(_)));
}

#[tokio::test]
async fn create_and_delete_adjust_total() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!({ "data": [{ "id": 1 }], "meta": { "total": 1 } }));
    slice.list(ListQuery::default()).await.unwrap();

    mock.push_ok(json!({ "data": { "id": 2 } }));
    slice.create(FormPayload::new()).await.unwrap();
    assert_eq!(slice.cursor().total, 2);

    slice.delete(1).await.unwrap();
    slice.delete(2).await.unwrap();
    slice.delete(3).await.unwrap();
    assert_eq!(slice.cursor().total, 0);
}

#[tokio::test]
async fn create_without_record_is_decode_failure() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!({ "message": "ok" }));
    let err = slice.create(FormPayload::new()).await;
    assert!(matches!(err, Err(ClientError::Decode(_))));
    assert!(slice.status(OpKind::Create).error().is_some());
}

#[tokio::test]
async fn delete_failure_keeps_record() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!([{ "id": 1 }]));
    slice.list(ListQuery::default()).await.unwrap();

    mock.push_err(ClientError::Network("Network error".into()));
    assert!(slice.delete(1).await.is_err());
    assert_eq!(ids(&slice.items()), vec![1]);
    assert_eq!(slice.status(OpKind::Delete).error(), Some("Network error"));
}

// =============================================================================
// UPDATE
// =============================================================================

#[tokio::test]
async fn update_replaces_matching_record() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!([{ "id": 1, "title": "A" }, { "id": 2, "title": "B" }]));
    slice.list(ListQuery::default()).await.unwrap();

    mock.push_ok(json!({ "data": { "id": 2, "title": "B2" } }));
    slice.update(2, FormPayload::new().field("title", "B2")).await.unwrap();

    let sent = mock.last_request();
    assert_eq!(sent.method, Method::Put);
    assert_eq!(sent.path, "/super-admin/home/slides/2");
    let items = slice.items();
    assert_eq!(items[1].title.as_deref(), Some("B2"));
    assert_eq!(items[0].title.as_deref(), Some("A"));
}

#[tokio::test]
async fn update_for_unknown_id_is_discarded() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!([{ "id": 1, "title": "A" }]));
    slice.list(ListQuery::default()).await.unwrap();

    mock.push_ok(json!({ "data": { "id": 9, "title": "Z" } }));
    let record = slice.update(9, FormPayload::new()).await.unwrap();
    assert_eq!(record.map(|record| record.id), Some(9));
    assert_eq!(ids(&slice.items()), vec![1]);
    assert_eq!(slice.status(OpKind::Update), OpStatus::Idle);
}

#[tokio::test]
async fn update_with_attachment_spoofs_put() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!({ "data": { "id": 1 } }));
    slice
        .update(1, FormPayload::new().file("image", Attachment::new("a.png", Vec::new())))
        .await
        .unwrap();
    let sent = mock.last_request();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.query_value("_method"), Some("put"));
}

#[tokio::test]
async fn update_ack_merges_sent_fields() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!([{ "id": 1, "title": "A", "image": "a.png" }]));
    slice.list(ListQuery::default()).await.unwrap();

    mock.push_ok(json!({ "data": null }));
    let record = slice.update(1, FormPayload::new().field("title", "A2")).await.unwrap().unwrap();
    assert_eq!(record.title.as_deref(), Some("A2"));
    assert_eq!(slice.items()[0].image.as_deref(), Some("a.png"));
}

#[tokio::test]
async fn update_ack_for_unlisted_record_succeeds_without_result() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!({ "message": "Slide updated successfully" }));

    let record = slice.update(5, FormPayload::new().field("title", "B")).await.unwrap();
    assert_eq!(record, None);
    assert!(slice.items().is_empty());
    assert_eq!(slice.status(OpKind::Update), OpStatus::Idle);
    assert_eq!(mock.last_request().path, "/super-admin/home/slides/5");
}

// =============================================================================
// RESTORE
// =============================================================================

#[tokio::test]
async fn restore_uses_returned_record() {
    let (client, mock) = client_with_token(Some("tok"));
    let users: ResourceSlice<UserRecord> = ResourceSlice::new(client, "/super-admin/users");
    mock.push_ok(json!({ "data": [{ "id": 3, "deleted_at": "2024-05-01" }] }));
    users.list(ListQuery::default()).await.unwrap();

    mock.push_ok(json!({ "data": { "id": 3, "user_name": "back", "deleted_at": null } }));
    let restored = users.restore(3).await.unwrap().unwrap();
    assert!(!restored.is_deleted());
    assert_eq!(restored.user_name.as_deref(), Some("back"));

    let sent = mock.last_request();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.path, "/super-admin/users/3/restore");
}

#[tokio::test]
async fn restore_without_body_clears_local_tombstone() {
    let (client, mock) = client_with_token(None);
    let users: ResourceSlice<UserRecord> = ResourceSlice::new(client, "/super-admin/users");
    mock.push_ok(json!([{ "id": 3, "deleted_at": "2024-05-01" }]));
    users.list(ListQuery::default()).await.unwrap();

    mock.push_ok(json!({ "message": "Restored" }));
    let restored = users.restore(3).await.unwrap().unwrap();
    assert!(!restored.is_deleted());
    assert_eq!(users.status(OpKind::Restore), OpStatus::Idle);
}

// =============================================================================
// ERRORS + SUBSCRIPTION
// =============================================================================

#[tokio::test]
async fn clear_errors() {
    let (slice, mock) = slides(None);
    mock.push_api_err(500, "boom");
    mock.push_api_err(500, "boom");
    let _ = slice.list(ListQuery::default()).await;
    let _ = slice.delete(1).await;

    slice.clear_error(OpKind::List);
    assert_eq!(slice.status(OpKind::List), OpStatus::Idle);
    assert!(slice.status(OpKind::Delete).error().is_some());

    slice.clear_all_errors();
    assert_eq!(slice.status(OpKind::Delete), OpStatus::Idle);
}

#[tokio::test]
async fn subscribers_observe_changes() {
    let (slice, mock) = slides(None);
    let mut rx = slice.subscribe();

    mock.push_ok(json!([{ "id": 4 }]));
    slice.list(ListQuery::default()).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(ids(&rx.borrow_and_update().items), vec![4]);
}

#[tokio::test]
async fn reset_clears_everything() {
    let (slice, mock) = slides(None);
    mock.push_ok(json!([{ "id": 4 }]));
    slice.list(ListQuery::default().search("x")).await.unwrap();
    slice.reset();
    assert_eq!(slice.snapshot(), SliceState::default());
}

// =============================================================================
// CONCURRENCY
// =============================================================================

/// Holds page 1 until released; answers page 2 immediately.
struct GatedTransport {
    gate: Notify,
}

#[async_trait::async_trait]
impl Transport for GatedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        if request.query_value("page") == Some("1") {
            self.gate.notified().await;
            return Ok(json!({ "data": [{ "id": 1, "title": "stale" }] }));
        }
        Ok(json!({ "data": [{ "id": 2, "title": "fresh" }] }))
    }
}

#[tokio::test]
async fn stale_list_response_is_discarded() {
    let transport = Arc::new(GatedTransport { gate: Notify::new() });
    let slice: ResourceSlice<Slide> = ResourceSlice::new(ApiClient::new(transport.clone()), "/super-admin/home/slides");

    let older = slice.list(ListQuery::default().page(1));
    let newer = async {
        let result = slice.list(ListQuery::default().page(2)).await;
        transport.gate.notify_one();
        result
    };
    let (older, newer) = tokio::join!(older, newer);

    assert_eq!(ids(&older.unwrap()), vec![1]);
    assert_eq!(ids(&newer.unwrap()), vec![2]);
    let state = slice.snapshot();
    assert_eq!(ids(&state.items), vec![2]);
    assert_eq!(state.last_query.page, Some(2));
    assert_eq!(state.list, OpStatus::Idle);
}

#[tokio::test]
async fn restore_of_unlisted_record_returns_none() {
    let (client, mock) = client_with_token(None);
    let users: ResourceSlice<UserRecord> = ResourceSlice::new(client, "/super-admin/users");
    mock.push_ok(Value::Null);
    assert_eq!(users.restore(11).await.unwrap(), None);
}

#[test]
fn date_range_pairs() {
    let range = DateRange::new(Some("2024-01-01".into()), Some("2024-01-31".into()));
    assert_eq!(
        range.to_pairs(),
        vec![("date_from".to_owned(), "2024-01-01".to_owned()), ("date_to".to_owned(), "2024-01-31".to_owned())]
    );
    assert!(DateRange::new(Some(" ".into()), None).to_pairs().is_empty());
}
