use super::*;
use crate::net::mock::client_with_token;
use crate::net::{RequestBody, Transport};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use tokio::sync::Notify;

/// Transport whose first request waits for `gate` before answering.
struct GatedTransport {
    gate: Notify,
    held: AtomicBool,
    responses: Mutex<VecDeque<Value>>,
}

impl GatedTransport {
    fn new(responses: Vec<Value>) -> Arc<Self> {
        Arc::new(Self { gate: Notify::new(), held: AtomicBool::new(false), responses: Mutex::new(responses.into()) })
    }
}

#[async_trait::async_trait]
impl Transport for GatedTransport {
    async fn send(&self, _request: ApiRequest) -> Result<Value, ClientError> {
        let body = self.responses.lock().unwrap().pop_front().unwrap_or(Value::Null);
        if !self.held.swap(true, Ordering::SeqCst) {
            self.gate.notified().await;
        }
        Ok(body)
    }
}

fn gated_slot(responses: Vec<Value>) -> (RecordSlot<u64>, Arc<GatedTransport>) {
    let transport = GatedTransport::new(responses);
    let client = ApiClient::new(transport.clone());
    client.set_bearer(Some("tok".to_owned()));
    (RecordSlot::new(client, "/super-admin/counter"), transport)
}

fn number_slot() -> (RecordSlot<u64>, std::sync::Arc<crate::net::mock::MockTransport>) {
    let (client, mock) = client_with_token(Some("tok"));
    (RecordSlot::new(client, "/super-admin/counter"), mock)
}

fn decode_count(body: Value) -> Result<Option<u64>, ClientError> {
    Ok(body.get("count").and_then(Value::as_u64))
}

#[tokio::test]
async fn fetch_stores_decoded_value() {
    let (slot, mock) = number_slot();
    mock.push_ok(json!({ "count": 4 }));
    assert_eq!(slot.fetch_with("", Vec::new(), decode_count).await.unwrap(), Some(4));
    assert_eq!(slot.value(), Some(4));
    assert_eq!(slot.status(SlotOp::Fetch), OpStatus::Idle);
    assert_eq!(mock.last_request().path, "/super-admin/counter");
}

#[tokio::test]
async fn fetch_appends_sub_path_and_query() {
    let (slot, mock) = number_slot();
    slot.fetch_with("/9", vec![("date_from".into(), "2024-01-01".into())], decode_count)
        .await
        .unwrap();
    let sent = mock.last_request();
    assert_eq!(sent.path, "/super-admin/counter/9");
    assert_eq!(sent.query_value("date_from"), Some("2024-01-01"));
}

#[tokio::test]
async fn fetch_failure_keeps_previous_value() {
    let (slot, mock) = number_slot();
    mock.push_ok(json!({ "count": 4 }));
    slot.fetch_with("", Vec::new(), decode_count).await.unwrap();

    mock.push_api_err(503, "Service Unavailable");
    assert!(slot.fetch_with("", Vec::new(), decode_count).await.is_err());
    assert_eq!(slot.value(), Some(4));
    assert_eq!(slot.status(SlotOp::Fetch).error(), Some("Service Unavailable"));
}

#[tokio::test]
async fn update_applies_response_against_current() {
    let (slot, mock) = number_slot();
    mock.push_ok(json!({ "count": 4 }));
    slot.fetch_with("", Vec::new(), decode_count).await.unwrap();

    mock.push_ok(json!({ "delta": 3 }));
    let request = slot.spoofed_put(1).with_body(RequestBody::Empty);
    let updated = slot
        .update_with(request, |current, body| {
            Ok(current.unwrap_or_default() + body["delta"].as_u64().unwrap_or_default())
        })
        .await
        .unwrap();
    assert_eq!(updated, 7);
    assert_eq!(slot.value(), Some(7));

    let sent = mock.last_request();
    assert_eq!(sent.method, Method::Post);
    assert_eq!(sent.path, "/super-admin/counter/1");
    assert_eq!(sent.query_value("_method"), Some("put"));
}

#[tokio::test]
async fn update_failure_is_recorded() {
    let (slot, mock) = number_slot();
    mock.push_api_err(422, "The value field is invalid.");
    let request = slot.spoofed_put(1);
    assert!(slot.update_with(request, |_, _| Ok(1)).await.is_err());
    assert_eq!(slot.status(SlotOp::Update).error(), Some("The value field is invalid."));
    assert_eq!(slot.value(), None);

    slot.clear_error(SlotOp::Update);
    assert_eq!(slot.status(SlotOp::Update), OpStatus::Idle);
}

#[tokio::test]
async fn reject_update_records_without_request() {
    let (slot, mock) = number_slot();
    slot.reject_update(&ClientError::Validation("missing id".into()));
    assert_eq!(slot.status(SlotOp::Update).error(), Some("missing id"));
    assert_eq!(mock.request_count(), 0);
    slot.clear_all_errors();
    assert_eq!(slot.snapshot(), SlotState::default());
}

#[tokio::test]
async fn clear_drops_value() {
    let (slot, mock) = number_slot();
    mock.push_ok(json!({ "count": 1 }));
    slot.fetch_with("", Vec::new(), decode_count).await.unwrap();
    slot.clear();
    assert_eq!(slot.value(), None);
}

#[tokio::test]
async fn clear_settles_superseded_fetch() {
    let (slot, transport) = gated_slot(vec![json!({ "count": 1 })]);
    let (fetched, ()) = tokio::join!(slot.fetch_with("", Vec::new(), decode_count), async {
        assert!(slot.status(SlotOp::Fetch).is_pending());
        slot.clear();
        transport.gate.notify_one();
    });

    assert_eq!(fetched.unwrap(), Some(1));
    assert_eq!(slot.status(SlotOp::Fetch), OpStatus::Idle);
    assert_eq!(slot.value(), None);
}

#[tokio::test]
async fn update_applies_against_value_fetched_meanwhile() {
    let (slot, transport) = gated_slot(vec![json!({ "delta": 3 }), json!({ "count": 10 })]);
    let request = slot.spoofed_put(1).with_body(RequestBody::Empty);
    let (updated, ()) = tokio::join!(
        slot.update_with(request, |current, body| {
            Ok(current.unwrap_or_default() + body["delta"].as_u64().unwrap_or_default())
        }),
        async {
            slot.fetch_with("", Vec::new(), decode_count).await.unwrap();
            transport.gate.notify_one();
        }
    );

    assert_eq!(updated.unwrap(), 13);
    assert_eq!(slot.value(), Some(13));
    assert_eq!(slot.status(SlotOp::Update), OpStatus::Idle);
}
