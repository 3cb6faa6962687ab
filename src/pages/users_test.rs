use super::*;
use crate::net::mock::{MockTransport, client_with_token};
use crate::state::status::{OpKind, OpStatus};
use serde_json::json;
use std::sync::Arc;

fn page(mode: UserMode) -> (UsersPage, Arc<MockTransport>) {
    let (client, mock) = client_with_token(Some("tok"));
    (UsersPage::new(ResourceSlice::new(client, "/super-admin/users"), mode), mock)
}

fn users_body(ids: &[u64], current: u64, last: u64, total: u64) -> Value {
    let data: Vec<Value> = ids.iter().map(|id| json!({ "id": id, "user_name": format!("u{id}") })).collect();
    json!({ "data": data, "meta": { "current_page": current, "last_page": last, "per_page": 10, "total": total } })
}

#[tokio::test]
async fn trainees_mount_lists_first_page_with_role() {
    let (page, mock) = page(UserMode::Trainees);
    mock.push_ok(users_body(&[1, 2], 1, 3, 25));
    page.mount().await.unwrap();

    let request = mock.last_request();
    assert_eq!(request.path, "/super-admin/users");
    assert_eq!(request.query_value("page"), Some("1"));
    assert_eq!(request.query_value("role"), Some("trainee"));
    assert_eq!(request.query_value("search"), None);
    assert_eq!(page.users().items().len(), 2);
}

#[tokio::test]
async fn all_users_mode_sends_no_role() {
    let (page, mock) = page(UserMode::All);
    page.mount().await.unwrap();
    assert_eq!(mock.last_request().query_value("role"), None);
}

#[tokio::test]
async fn change_page_clamps_and_keeps_search() {
    let (page, mock) = page(UserMode::Coaches);
    mock.push_ok(users_body(&[1], 1, 3, 25));
    page.search("sara").await.unwrap();

    mock.push_ok(users_body(&[21], 3, 3, 25));
    page.change_page(9).await.unwrap();

    let request = mock.last_request();
    assert_eq!(request.query_value("page"), Some("3"));
    assert_eq!(request.query_value("role"), Some("coach"));
    assert_eq!(request.query_value("search"), Some("sara"));
    assert_eq!(page.users().cursor().current_page(), 3);
}

#[tokio::test]
async fn blank_search_clears_filter() {
    let (page, mock) = page(UserMode::All);
    page.search("  ").await.unwrap();
    assert_eq!(mock.last_request().query_value("search"), None);
}

#[tokio::test]
async fn create_stamps_role_and_refetches_current_page() {
    let (page, mock) = page(UserMode::Trainees);
    mock.push_ok(users_body(&[1], 1, 3, 25));
    page.mount().await.unwrap();
    mock.push_ok(users_body(&[11], 2, 3, 25));
    page.change_page(2).await.unwrap();

    mock.push_ok(json!({ "data": { "id": 30, "user_name": "new" } }));
    mock.push_ok(users_body(&[11, 30], 2, 3, 26));
    page.create(FormPayload::new().field("user_name", "new")).await.unwrap();

    let requests = mock.requests();
    let create = &requests[requests.len() - 2];
    assert_eq!(create.body, crate::net::RequestBody::Json(json!({ "user_name": "new", "role": "trainee" })));
    let refetch = mock.last_request();
    assert_eq!(refetch.query_value("page"), Some("2"));
    assert_eq!(refetch.query_value("role"), Some("trainee"));
    assert_eq!(page.users().cursor().total, 26);
}

#[tokio::test]
async fn update_drops_empty_password() {
    let (page, mock) = page(UserMode::All);
    mock.push_ok(users_body(&[4], 1, 1, 1));
    page.mount().await.unwrap();

    mock.push_ok(json!({ "data": { "id": 4, "user_name": "renamed" } }));
    let payload = FormPayload::new().field("user_name", "renamed").field("password", "");
    page.update(4, payload).await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests[1].path, "/super-admin/users/4");
    assert_eq!(requests[1].body, crate::net::RequestBody::Json(json!({ "user_name": "renamed" })));
}

#[tokio::test]
async fn update_ack_on_unmounted_page_still_refetches() {
    let (page, mock) = page(UserMode::Coaches);
    mock.push_ok(json!({ "message": "User updated successfully" }));
    mock.push_ok(users_body(&[4], 1, 1, 1));

    let updated = page.update(4, FormPayload::new().field("user_name", "renamed")).await.unwrap();
    assert_eq!(updated, None);
    assert_eq!(page.users().status(OpKind::Update), OpStatus::Idle);
    assert_eq!(mock.request_count(), 2);
    assert_eq!(page.users().items().len(), 1);
}

#[tokio::test]
async fn failed_delete_skips_refetch() {
    let (page, mock) = page(UserMode::All);
    mock.push_api_err(403, "Forbidden");
    let err = page.delete(4).await.unwrap_err();
    assert_eq!(err.reason(), "Forbidden");
    assert_eq!(mock.request_count(), 1);
    assert_eq!(page.users().status(OpKind::Delete), OpStatus::Failed("Forbidden".into()));

    page.unmount();
    assert_eq!(page.users().status(OpKind::Delete), OpStatus::Idle);
}

#[tokio::test]
async fn restore_refetches() {
    let (page, mock) = page(UserMode::Coaches);
    mock.push_ok(json!({ "message": "restored" }));
    page.restore(7).await.unwrap();
    assert_eq!(mock.request_count(), 2);
    assert_eq!(mock.requests()[0].path, "/super-admin/users/7/restore");
    assert_eq!(mock.last_request().query_value("role"), Some("coach"));
}

#[test]
fn with_country_copies_dialling_code() {
    let countries: Vec<Country> = serde_json::from_value(json!([
        { "id": 1, "country_code": "+966" },
        { "id": 2, "country_code": "+20" }
    ]))
    .unwrap();
    let payload = with_country(FormPayload::new().field("country_id", "2"), &countries);
    assert_eq!(payload.get("phone_country"), Some(&json!("+20")));

    let unknown = with_country(FormPayload::new().field("country_id", 9), &countries);
    assert!(unknown.get("phone_country").is_none());
}
