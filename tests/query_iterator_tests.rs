//! Integration tests for paged feeds and queries over HTTP.
//!
//! These tests drive [`QueryIterator`] through a mock gateway to verify
//! continuation-token handling, empty-page skipping, restarts, and the
//! three request shapes of a feed (list, POST query, jpath GET query).

use documentdb_client::resources::RequestOptions;
use documentdb_client::{ClientConfig, DocumentClient, IteratorState, ServiceEndpoint};
use serde_json::{json, Map};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCS_PATH: &str = "/dbs/db1/colls/coll1/docs/";
const COLLECTION: &str = "dbs/db1/colls/coll1";

fn client(server: &MockServer) -> DocumentClient {
    let config = ClientConfig::builder()
        .endpoint(ServiceEndpoint::new(server.uri()).unwrap())
        .build()
        .unwrap();
    DocumentClient::new(config).unwrap()
}

/// Mounts three pages: `[a, b]`, an empty page, then `[c]`.
///
/// Continuation-specific mocks are mounted first so they take precedence
/// over the first-page mock.
async fn mount_paged_documents(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(header("x-ms-continuation", "tok2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_count": 1,
            "Documents": [{"id": "c"}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(header("x-ms-continuation", "tok1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"_count": 0, "Documents": []}))
                .insert_header("x-ms-continuation", "tok2"),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "_count": 2,
                    "Documents": [{"id": "a"}, {"id": "b"}]
                }))
                .insert_header("x-ms-continuation", "tok1"),
        )
        .mount(server)
        .await;
}

fn ids(items: &[serde_json::Value]) -> Vec<&str> {
    items.iter().filter_map(|item| item["id"].as_str()).collect()
}

#[tokio::test]
async fn test_to_array_follows_continuations_across_empty_pages() {
    let server = MockServer::start().await;
    mount_paged_documents(&server).await;

    let client = client(&server);
    let mut iterator = client.read_documents(COLLECTION, RequestOptions::new().max_item_count(2));
    let items = iterator.to_array().await.unwrap();

    assert_eq!(ids(&items), vec!["a", "b", "c"]);
    assert_eq!(iterator.state(), IteratorState::Ended);
    assert!(!iterator.has_more_results());
}

#[tokio::test]
async fn test_next_item_pulls_one_at_a_time() {
    let server = MockServer::start().await;
    mount_paged_documents(&server).await;

    let client = client(&server);
    let mut iterator = client.read_documents(COLLECTION, RequestOptions::default());

    assert_eq!(iterator.state(), IteratorState::Start);
    let first = iterator.next_item().await.unwrap().unwrap();
    assert_eq!(first["id"], "a");
    assert_eq!(iterator.state(), IteratorState::InProgress);
    assert_eq!(iterator.current().map(|v| v["id"].clone()), Some(json!("b")));

    assert_eq!(iterator.next_item().await.unwrap().unwrap()["id"], "b");
    assert_eq!(iterator.next_item().await.unwrap().unwrap()["id"], "c");
    assert!(iterator.next_item().await.unwrap().is_none());
    assert_eq!(iterator.state(), IteratorState::Ended);
}

#[tokio::test]
async fn test_for_each_stops_when_callback_returns_false() {
    let server = MockServer::start().await;
    mount_paged_documents(&server).await;

    let client = client(&server);
    let mut iterator = client.read_documents(COLLECTION, RequestOptions::default());

    let mut seen = Vec::new();
    iterator
        .for_each(|item| {
            seen.push(item["id"].as_str().unwrap_or_default().to_string());
            seen.len() < 2
        })
        .await
        .unwrap();
    assert_eq!(seen, vec!["a", "b"]);

    // A second for_each starts over from the first page.
    let mut all = Vec::new();
    iterator
        .for_each(|item| {
            all.push(item);
            true
        })
        .await
        .unwrap();
    assert_eq!(ids(&all), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_execute_next_returns_raw_pages() {
    let server = MockServer::start().await;
    mount_paged_documents(&server).await;

    let client = client(&server);
    let mut iterator = client.read_documents(COLLECTION, RequestOptions::default());

    let page = iterator.execute_next().await.unwrap();
    assert_eq!(ids(&page.items), vec!["a", "b"]);
    assert_eq!(page.continuation(), Some("tok1"));

    let page = iterator.execute_next().await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.continuation(), Some("tok2"));

    let page = iterator.execute_next().await.unwrap();
    assert_eq!(ids(&page.items), vec!["c"]);
    assert_eq!(page.continuation(), None);
}

#[tokio::test]
async fn test_query_is_posted_as_sql() {
    let server = MockServer::start().await;
    let query = "SELECT * FROM root r WHERE r.n = 1";
    Mock::given(method("POST"))
        .and(path(DOCS_PATH))
        .and(header("x-ms-documentdb-isquery", "true"))
        .and(header("Content-Type", "application/sql"))
        .and(body_string(query))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Documents": [{"id": "a", "n": 1}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let items = client
        .query_documents(COLLECTION, query, RequestOptions::default())
        .to_array()
        .await
        .unwrap();
    assert_eq!(ids(&items), vec!["a"]);
}

#[tokio::test]
async fn test_jpath_query_is_sent_in_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .and(header("x-ms-documentdb-isquery", "true"))
        .and(header("x-ms-documentdb-query", "/name=\"ada\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Documents": [{"id": "a"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let items = client
        .query_documents(COLLECTION, "/name=\"ada\"", RequestOptions::new().jpath(true))
        .to_array()
        .await
        .unwrap();
    assert_eq!(ids(&items), vec!["a"]);
}

#[tokio::test]
async fn test_feed_items_are_read_from_the_type_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dbs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_rid": "",
            "Databases": [{"id": "db1"}, {"id": "db2"}],
            "_count": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dbs/db1/colls/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "DocumentCollections": [{"id": "coll1"}]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let databases = client
        .read_databases(RequestOptions::default())
        .to_array()
        .await
        .unwrap();
    assert_eq!(ids(&databases), vec!["db1", "db2"]);

    let collections = client
        .read_collections("dbs/db1", RequestOptions::default())
        .to_array()
        .await
        .unwrap();
    assert_eq!(ids(&collections), vec!["coll1"]);
}

#[tokio::test]
async fn test_failed_page_ends_iteration_with_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DOCS_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let client = client(&server);
    let mut iterator = client.read_documents(COLLECTION, RequestOptions::default());

    let err = iterator.to_array().await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
    assert_eq!(iterator.state(), IteratorState::Ended);
}

#[tokio::test]
async fn test_table_read_and_delete_by_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DOCS_PATH))
        .and(body_string(r#"SELECT * FROM root r WHERE r["team"] = "core""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Documents": [
                {"id": "a", "_self": "dbs/rid1/colls/rid2/docs/rid3/"},
                {"id": "b"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/dbs/rid1/colls/rid2/docs/rid3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/dbs/db1/colls/coll1/docs/b"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let table = client.table(COLLECTION);

    let mut filter = Map::new();
    filter.insert("team".to_string(), json!("core"));

    let members = table.read(Some(&table.filter(&filter))).await.unwrap();
    assert_eq!(ids(&members), vec!["a", "b"]);

    let removed = table.del(&filter).await.unwrap();
    assert_eq!(removed, 2);
}
