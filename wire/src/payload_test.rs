use super::*;
use serde_json::json;

#[test]
fn payload_without_files_is_json() {
    let payload = FormPayload::new().field("name_en", "Strength").field("slug", "strength");
    assert!(!payload.is_multipart());
    assert_eq!(payload.to_json(), json!({ "name_en": "Strength", "slug": "strength" }));
}

#[test]
fn payload_with_file_is_multipart() {
    let payload = FormPayload::new()
        .field("title", "Summer")
        .file("image", Attachment::new("banner.png", vec![1, 2, 3]));
    assert!(payload.is_multipart());
    assert_eq!(payload.files().len(), 1);
    assert_eq!(payload.files()[0].0, "image");
}

#[test]
fn form_fields_flatten_nested_answers() {
    let payload = FormPayload::from_json(json!({
        "type": "multiple_choice",
        "answers": [
            { "description": { "en": "Yes", "ar": "نعم" } },
            { "description": { "en": "No", "ar": "لا" } }
        ]
    }));
    let fields = payload.form_fields();
    assert!(fields.contains(&("type".to_owned(), "multiple_choice".to_owned())));
    assert!(fields.contains(&("answers[0][description][en]".to_owned(), "Yes".to_owned())));
    assert!(fields.contains(&("answers[1][description][ar]".to_owned(), "لا".to_owned())));
    assert_eq!(fields.len(), 5);
}

#[test]
fn form_fields_skip_nulls_and_encode_scalars() {
    let payload = FormPayload::from_json(json!({ "value": null, "active": true, "count": 3 }));
    let fields = payload.form_fields();
    assert_eq!(fields.len(), 2);
    assert!(fields.contains(&("active".to_owned(), "1".to_owned())));
    assert!(fields.contains(&("count".to_owned(), "3".to_owned())));
}

#[test]
fn images_to_delete_use_indexed_keys() {
    let payload = FormPayload::new().field("images_to_delete", json!([11, 12]));
    assert_eq!(
        payload.form_fields(),
        vec![
            ("images_to_delete[0]".to_owned(), "11".to_owned()),
            ("images_to_delete[1]".to_owned(), "12".to_owned()),
        ]
    );
}

#[test]
fn attachment_guesses_mime_from_extension() {
    assert_eq!(Attachment::new("home.jpg", Vec::new()).mime, "image/jpeg");
    assert_eq!(Attachment::new("splash.png", Vec::new()).mime, "image/png");
    assert_eq!(Attachment::new("notes", Vec::new()).mime, "application/octet-stream");
}

#[test]
fn from_json_ignores_non_objects() {
    assert_eq!(FormPayload::from_json(json!([1, 2])), FormPayload::new());
}

#[test]
fn remove_field_drops_value() {
    let mut payload = FormPayload::new().field("password", "");
    assert_eq!(payload.remove_field("password"), Some(json!("")));
    assert!(payload.get("password").is_none());
}

#[test]
fn forced_multipart_without_files() {
    let payload = FormPayload::new().field("title_en", "Warmup").multipart();
    assert!(payload.is_multipart());
    assert!(payload.files().is_empty());
    assert_eq!(payload.form_fields(), vec![("title_en".to_owned(), "Warmup".to_owned())]);
}
