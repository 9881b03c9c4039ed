use storage::repository::{KeyValueRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_kv_overwrites_and_removes() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("redshift_session").await.unwrap(), None);

    repo.set("redshift_session", r#"{"name":"Alex"}"#)
        .await
        .unwrap();
    repo.set("redshift_session", r#"{"name":"Sam"}"#)
        .await
        .unwrap();
    assert_eq!(
        repo.get("redshift_session").await.unwrap().as_deref(),
        Some(r#"{"name":"Sam"}"#)
    );

    repo.remove("redshift_session").await.unwrap();
    repo.remove("redshift_session").await.unwrap();
    assert_eq!(repo.get("redshift_session").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.set("k", "v").await.unwrap();
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_exposes_kv() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.kv.set("a", "1").await.unwrap();
    assert_eq!(storage.kv.get("a").await.unwrap().as_deref(), Some("1"));
}
