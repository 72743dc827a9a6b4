use std::sync::Arc;
use std::time::Duration;

use cms_rest::http_server::{HttpServer, ServiceConfig};
use cms_rest::query::Query;
use cms_rest::rest_api::{DeleteResponse, UpdateResponse};
use cms_rest::store::{
    DocumentId, DocumentStore, InMemoryDocumentStore, StoreFuture, WriteConcern, WriteReceipt,
};
use serde_json::{json, Value};

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_with(config: ServiceConfig, store: Arc<dyn DocumentStore>) -> String {
    let app = HttpServer::with_store(config, store).router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_test_server() -> String {
    spawn_with(
        ServiceConfig::default(),
        Arc::new(InMemoryDocumentStore::new()),
    )
    .await
}

async fn insert(client: &reqwest::Client, base: &str, record: Value) -> Value {
    let resp = client
        .post(format!("{}/cms", base))
        .json(&record)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

async fn find(client: &reqwest::Client, base: &str, q: &str) -> reqwest::Response {
    client
        .get(format!("{}/cms/find", base))
        .query(&[("q", q)])
        .send()
        .await
        .unwrap()
}

fn id_of(record: &Value) -> String {
    record["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn insert_then_get_returns_stored_record() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let stored = insert(&client, &base, json!({"title": "Welcome", "views": 3})).await;
    assert_eq!(stored["title"], "Welcome");
    let id = id_of(&stored);

    let resp = client
        .get(format!("{}/cms/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, stored);
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let base = spawn_test_server().await;
    let id = DocumentId::generate().to_string();

    let resp = reqwest::get(format!("{}/cms/{}", base, id)).await.unwrap();
    assert_eq!(resp.status(), 404);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "ID not found.");
    assert_eq!(body["id"], id);
}

#[tokio::test]
async fn get_malformed_id_is_server_error() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/cms/not-an-id", base)).await.unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("not-an-id"));
}

#[tokio::test]
async fn find_with_regex_is_case_insensitive() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    insert(&client, &base, json!({"title": "Hello World", "tag": "news"})).await;
    insert(&client, &base, json!({"title": "Goodbye", "tag": "news"})).await;
    insert(&client, &base, json!({"title": "hello again", "tag": "blog"})).await;

    let resp = find(&client, &base, r#"{"title": /^HELLO/}"#).await;
    assert_eq!(resp.status(), 200);
    let records: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(records.len(), 2);

    let resp = find(&client, &base, r#"{"title": /hello/, "tag": "blog"}"#).await;
    let records: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "hello again");
}

#[tokio::test]
async fn find_with_equality_and_quoted_regex() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    insert(&client, &base, json!({"title": "Release notes", "tag": "news"})).await;
    insert(&client, &base, json!({"title": "Roadmap", "tag": "plans"})).await;

    let records: Vec<Value> = find(&client, &base, r#"{"tag": "plans"}"#)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Roadmap");

    let records: Vec<Value> = find(&client, &base, r#"{"title": "/notes$/"}"#)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["tag"], "news");
}

#[tokio::test]
async fn find_without_matches_is_not_found() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    insert(&client, &base, json!({"title": "Only"})).await;

    let resp = find(&client, &base, r#"{"title": "Missing"}"#).await;
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No records found.");
}

#[tokio::test]
async fn find_without_matches_can_be_empty_success() {
    let config = ServiceConfig {
        empty_find_is_not_found: false,
        ..Default::default()
    };
    let base = spawn_with(config, Arc::new(InMemoryDocumentStore::new())).await;
    let client = reqwest::Client::new();

    let resp = find(&client, &base, r#"{"title": "Missing"}"#).await;
    assert_eq!(resp.status(), 200);
    let records: Vec<Value> = resp.json().await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn find_with_bad_query_is_server_error() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    for q in [r#"{"title": "#, "[1, 2]", r#"{"a": /x/, "b": /y/}"#] {
        let resp = find(&client, &base, q).await;
        assert_eq!(resp.status(), 500, "query {:?}", q);

        let body: Value = resp.json().await.unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON object passed in query"));
    }

    let resp = client
        .get(format!("{}/cms/find", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn insert_invalid_json_is_server_error() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/cms", base))
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON object passed in body"));
}

#[tokio::test]
async fn non_utf8_body_is_server_error() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let stored = insert(&client, &base, json!({"title": "Draft"})).await;
    let payload: &'static [u8] = b"{\"a\":\"\xFF\"}";

    let requests = [
        client.post(format!("{}/cms", base)),
        client.put(format!("{}/cms/{}", base, id_of(&stored))),
    ];

    for request in requests {
        let resp = request
            .header("content-type", "application/json")
            .body(payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);

        let body: Value = resp.json().await.unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON object passed in body"));
    }

    let current: Value = reqwest::get(format!("{}/cms/{}", base, id_of(&stored)))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current, stored);
}

#[tokio::test]
async fn writes_to_find_segment_are_bad_ids() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{}/cms/find", base))
        .json(&json!({"title": "Nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("find"));

    let resp = client
        .delete(format!("{}/cms/find", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("find"));
}

#[tokio::test]
async fn script_tags_rejected_unless_bypassed() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let record = json!({"body": "<SCRIPT>alert(1)</SCRIPT>"});

    let resp = client
        .post(format!("{}/cms", base))
        .json(&record)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Script tags are not allowed.");

    let resp = client
        .post(format!("{}/cms?script=1", base))
        .json(&record)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn script_bypass_can_be_disabled() {
    let config = ServiceConfig {
        allow_script_bypass: false,
        ..Default::default()
    };
    let base = spawn_with(config, Arc::new(InMemoryDocumentStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/cms?script=1", base))
        .json(&json!({"body": "<script src=x>"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn update_replaces_whole_record() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let stored = insert(&client, &base, json!({"title": "Draft", "tags": ["a"]})).await;
    let id = id_of(&stored);

    let resp = client
        .put(format!("{}/cms/{}", base, id))
        .json(&json!({"title": "Published"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: UpdateResponse = resp.json().await.unwrap();
    assert_eq!(body.updated, 1);
    assert_eq!(body.document, json!({"_id": id, "title": "Published"}));

    let current: Value = reqwest::get(format!("{}/cms/{}", base, id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(current.get("tags").is_none());
}

#[tokio::test]
async fn update_unknown_id_creates_nothing() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let id = DocumentId::generate().to_string();

    let resp = client
        .put(format!("{}/cms/{}", base, id))
        .json(&json!({"title": "Ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No record updated");

    let resp = reqwest::get(format!("{}/cms/{}", base, id)).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_twice_is_not_found() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let stored = insert(&client, &base, json!({"title": "Temporary"})).await;
    let id = id_of(&stored);

    let resp = client
        .delete(format!("{}/cms/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: DeleteResponse = resp.json().await.unwrap();
    assert_eq!(body.id, id);
    assert_eq!(body.deleted, 1);

    let resp = client
        .delete(format!("{}/cms/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No record deleted");
}

#[tokio::test]
async fn routes_follow_configured_base_path() {
    let config = ServiceConfig {
        base_path: "/api/pages".to_string(),
        ..Default::default()
    };
    let base = spawn_with(config, Arc::new(InMemoryDocumentStore::new())).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/pages", base))
        .json(&json!({"title": "Moved"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .post(format!("{}/cms", base))
        .json(&json!({"title": "Old"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn concurrent_inserts_and_finds_stay_consistent() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    // Unrelated record that a burst query must never return
    insert(&client, &base, json!({"title": "other", "kind": "steady"})).await;

    let mut writers = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let base = base.clone();
        writers.push(tokio::spawn(async move {
            insert(&client, &base, json!({"title": format!("post-{}", i), "kind": "burst"})).await
        }));
    }

    let mut readers = Vec::new();
    for _ in 0..16 {
        let client = client.clone();
        let base = base.clone();
        readers.push(tokio::spawn(async move {
            let resp = find(&client, &base, r#"{"kind": "burst"}"#).await;
            let status = resp.status();
            let body: Value = resp.json().await.unwrap();
            (status, body)
        }));
    }

    for reader in readers {
        let (status, body) = reader.await.unwrap();
        if status == 404 {
            // Ran before the first insert landed
            assert_eq!(body["error"], "No records found.");
            continue;
        }
        assert_eq!(status, 200);

        let records = body.as_array().expect("find returns an array");
        assert!(records.len() <= 16);
        for record in records {
            assert_eq!(record["kind"], "burst");
            assert!(record["_id"].is_string());
        }
    }

    let mut ids = Vec::new();
    for writer in writers {
        ids.push(id_of(&writer.await.unwrap()));
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);

    let records: Vec<Value> = find(&client, &base, r#"{"kind": "burst"}"#)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(records.len(), 16);
}

/// Store whose operations never complete
struct HungStore;

impl DocumentStore for HungStore {
    fn find_one<'a>(&'a self, _: &'a str, _: DocumentId) -> StoreFuture<'a, Option<Value>> {
        Box::pin(std::future::pending())
    }

    fn find<'a>(&'a self, _: &'a str, _: &'a Query) -> StoreFuture<'a, Vec<Value>> {
        Box::pin(std::future::pending())
    }

    fn insert_one<'a>(
        &'a self,
        _: &'a str,
        _: Value,
        _: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<Value>> {
        Box::pin(std::future::pending())
    }

    fn replace_one<'a>(
        &'a self,
        _: &'a str,
        _: DocumentId,
        _: Value,
        _: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<Option<Value>>> {
        Box::pin(std::future::pending())
    }

    fn delete_one<'a>(
        &'a self,
        _: &'a str,
        _: DocumentId,
        _: WriteConcern,
    ) -> StoreFuture<'a, WriteReceipt<u64>> {
        Box::pin(std::future::pending())
    }
}

// No request timeout is applied: a store that never answers leaves the client hanging.
#[tokio::test]
async fn hung_store_never_answers() {
    let base = spawn_with(ServiceConfig::default(), Arc::new(HungStore)).await;
    let id = DocumentId::generate().to_string();

    let pending = tokio::time::timeout(
        Duration::from_millis(300),
        reqwest::get(format!("{}/cms/{}", base, id)),
    )
    .await;
    assert!(pending.is_err());

    // Routes that skip the store still answer
    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
}
