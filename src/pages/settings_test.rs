use super::*;
use crate::net::mock::client_with_token;
use crate::net::{Method, RequestBody};
use crate::state::record_slot::SlotOp;
use crate::state::settings::SETTINGS_ID_MISSING;
use crate::state::status::OpStatus;
use serde_json::json;
use wire::Attachment;

#[tokio::test]
async fn submit_updates_then_reloads() {
    let (client, mock) = client_with_token(Some("tok"));
    let page = SettingsPage::new(SettingsSlice::new(client, "/super-admin/settings"));
    mock.push_ok(json!({ "data": [
        { "id": 1, "key": "support_email", "value": "a@b.co" },
        { "id": 7, "key": "app_images", "value": { "home_screen": "old.png" } }
    ] }));
    assert_eq!(page.mount().await.unwrap().unwrap().id, 7);

    mock.push_ok(json!({ "message": "updated" }));
    mock.push_ok(json!({ "data": [{ "id": 7, "key": "app_images", "value": { "home_screen": "new.png" } }] }));
    let update = SettingsUpdate {
        home_screen: Some(Attachment::new("new.png", vec![1, 2])),
        images_to_delete: vec!["31".into()],
        ..SettingsUpdate::default()
    };
    page.submit(update).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].method, Method::Post);
    assert_eq!(requests[1].path, "/super-admin/settings/7");
    assert_eq!(requests[1].query_value("_method"), Some("put"));
    assert!(matches!(&requests[1].body, RequestBody::Form(form) if form.files()[0].0 == "home_screen"));
    assert_eq!(
        page.settings().settings().unwrap().value,
        Some(json!({ "home_screen": "new.png" }))
    );
}

#[tokio::test]
async fn submit_without_loaded_settings_is_rejected_locally() {
    let (client, mock) = client_with_token(Some("tok"));
    let page = SettingsPage::new(SettingsSlice::new(client, "/super-admin/settings"));
    let err = page.submit(SettingsUpdate::default()).await.unwrap_err();
    assert_eq!(err.reason(), SETTINGS_ID_MISSING);
    assert_eq!(mock.request_count(), 0);
    assert_eq!(page.settings().slot().status(SlotOp::Update), OpStatus::Failed(SETTINGS_ID_MISSING.into()));

    page.unmount();
    assert_eq!(page.settings().slot().status(SlotOp::Update), OpStatus::Idle);
}
