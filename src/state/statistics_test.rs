use super::*;
use crate::net::mock::client_with_token;
use serde_json::json;

#[tokio::test]
async fn fetch_with_date_range() {
    let (client, mock) = client_with_token(Some("tok"));
    let stats = StatisticsSlice::new(client, "/super-admin/dashboard/statistics");
    mock.push_ok(json!({ "data": { "total_coaches": 12, "total_trainees": 40 } }));

    let range = DateRange::new(Some("2024-01-01".into()), None);
    let fetched = stats.fetch(&range).await.unwrap().unwrap();
    assert_eq!(fetched.figure("total_trainees"), Some(40.0));

    let sent = mock.last_request();
    assert_eq!(sent.query_value("date_from"), Some("2024-01-01"));
    assert_eq!(sent.query_value("date_to"), None);
}

#[tokio::test]
async fn fetch_failure_recorded_and_clearable() {
    let (client, mock) = client_with_token(Some("tok"));
    let stats = StatisticsSlice::new(client, "/super-admin/dashboard/statistics");
    mock.push_api_err(500, "Server error");
    assert!(stats.fetch(&DateRange::default()).await.is_err());
    assert_eq!(stats.snapshot().fetch.error(), Some("Server error"));
    stats.clear_error();
    assert!(stats.snapshot().fetch.error().is_none());
}

#[test]
fn decode_unwrapped_and_array_data() {
    let bare = decode_statistics(json!({ "revenue": "10.5" })).unwrap().unwrap();
    assert_eq!(bare.figure("revenue"), Some(10.5));

    let listed = decode_statistics(json!({ "data": [1, 2], "total": 2 })).unwrap().unwrap();
    assert_eq!(listed.figure("total"), Some(2.0));
    assert!(listed.0.contains_key("data"));

    assert_eq!(decode_statistics(Value::Null).unwrap(), None);
    assert!(decode_statistics(json!([1])).is_err());
}
