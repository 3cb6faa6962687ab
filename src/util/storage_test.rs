use super::*;

#[test]
fn memory_storage_round_trip() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get("theme"), None);
    storage.set("theme", "dark").unwrap();
    assert_eq!(storage.get("theme").as_deref(), Some("dark"));
    storage.remove("theme").unwrap();
    assert_eq!(storage.get("theme"), None);
}

#[test]
fn file_storage_missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("state.json"));
    assert_eq!(storage.get("admin_dashboard_token"), None);
}

#[test]
fn file_storage_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");

    let storage = FileStorage::open(&path);
    storage.set("admin_dashboard_token", "tok").unwrap();
    storage.set("language", "ar").unwrap();
    drop(storage);

    let reopened = FileStorage::open(&path);
    assert_eq!(reopened.get("admin_dashboard_token").as_deref(), Some("tok"));
    assert_eq!(reopened.get("language").as_deref(), Some("ar"));

    reopened.remove("admin_dashboard_token").unwrap();
    let again = FileStorage::open(&path);
    assert_eq!(again.get("admin_dashboard_token"), None);
    assert_eq!(again.get("language").as_deref(), Some("ar"));
}

#[test]
fn file_storage_corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();

    let storage = FileStorage::open(&path);
    assert_eq!(storage.get("anything"), None);
    storage.set("theme", "light").unwrap();
    assert_eq!(FileStorage::open(&path).get("theme").as_deref(), Some("light"));
}

#[test]
fn removing_absent_key_does_not_create_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    FileStorage::open(&path).remove("missing").unwrap();
    assert!(!path.exists());
}
