//! Tests for request routing
//!
//! Drives the router directly with method, URL and body, without a socket.

use std::fs;
use std::sync::Arc;

use serde_json::{Value, json};
use shopping_list::api::{ApiPolicy, MissingDelete, MutationStatus};
use shopping_list::core::ports::ItemStore;
use shopping_list::server::{MAX_BODY_BYTES, Reply, ReplyBody, Router, StaticFiles};
use tempfile::TempDir;
use tiny_http::Method;

use crate::common::mocks::FailingItemStore;
use crate::common::{SEED_NAMES, names, seeded_store};

fn send(router: &Router, method: &Method, url: &str, body: &str) -> Reply {
    router.handle(method, url, &mut body.as_bytes())
}

fn json_of(reply: &Reply) -> Value {
    serde_json::from_str(reply.text()).unwrap()
}

fn seeded_router(policy: ApiPolicy) -> (Router, Arc<dyn ItemStore>, Vec<String>) {
    let (store, items) = seeded_store();
    let store: Arc<dyn ItemStore> = store;
    let ids = items.iter().map(|item| item.id.to_string()).collect();
    (Router::new(Arc::clone(&store), policy), store, ids)
}

// =============================================================================
// COLLECTION ROUTES
// =============================================================================

#[test]
fn test_list_returns_seeded_items() {
    let (router, _, ids) = seeded_router(ApiPolicy::default());
    let reply = send(&router, &Method::Get, "/items", "");

    assert_eq!(reply.status, 200);
    let expected: Vec<Value> = ids
        .iter()
        .zip(SEED_NAMES)
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    assert_eq!(json_of(&reply), Value::Array(expected));
}

#[test]
fn test_list_ignores_query_string() {
    let (router, _, _) = seeded_router(ApiPolicy::default());
    let reply = send(&router, &Method::Get, "/items?sort=name", "");
    assert_eq!(reply.status, 200);
    assert_eq!(json_of(&reply).as_array().unwrap().len(), 3);
}

#[test]
fn test_head_items_answers_like_get() {
    let (router, _, _) = seeded_router(ApiPolicy::default());
    let head = send(&router, &Method::Head, "/items", "");
    let get = send(&router, &Method::Get, "/items", "");
    assert_eq!(head.status, 200);
    assert_eq!(head, get);
}

#[test]
fn test_create_returns_201_with_new_item() {
    let (router, store, ids) = seeded_router(ApiPolicy::default());
    let reply = send(&router, &Method::Post, "/items", r#"{"name": "Kale"}"#);

    assert_eq!(reply.status, 201);
    let created = json_of(&reply);
    assert_eq!(created["name"], "Kale");
    let new_id = created["id"].as_str().unwrap();
    assert!(!ids.iter().any(|id| id == new_id));
    assert_eq!(names(store.as_ref()), ["Broad beans", "Tomatoes", "Peppers", "Kale"]);
}

#[test]
fn test_create_with_id_is_malformed() {
    let (router, store, _) = seeded_router(ApiPolicy::default());
    let reply = send(&router, &Method::Post, "/items", r#"{"id": "abc", "name": "Kale"}"#);

    assert_eq!(reply.status, 400);
    assert_eq!(json_of(&reply), json!({"message": "Malformed Message"}));
    assert_eq!(names(store.as_ref()), SEED_NAMES);
}

#[test]
fn test_create_rejects_bad_bodies() {
    let (router, store, _) = seeded_router(ApiPolicy::default());
    for body in ["", "not json", "[1, 2]", r#""Kale""#, r#"{"name": 7}"#, r#"{"name": " "}"#] {
        let reply = send(&router, &Method::Post, "/items", body);
        assert_eq!(reply.status, 400, "{body:?}");
        assert_eq!(json_of(&reply), json!({"message": "Malformed Message"}));
    }
    assert_eq!(names(store.as_ref()), SEED_NAMES);
}

#[test]
fn test_oversized_body_is_malformed() {
    let (router, store, _) = seeded_router(ApiPolicy::default());
    let padding = " ".repeat(usize::try_from(MAX_BODY_BYTES).unwrap());
    let body = format!(r#"{{"name": "Kale"}}{padding}"#);

    let reply = send(&router, &Method::Post, "/items", &body);

    assert_eq!(reply.status, 400);
    assert_eq!(json_of(&reply), json!({"message": "Malformed Message"}));
    assert_eq!(names(store.as_ref()), SEED_NAMES);

    // A body right at the limit is still accepted
    let exact = r#"{"name": "Kale"}"#;
    let fill = " ".repeat(usize::try_from(MAX_BODY_BYTES).unwrap() - exact.len());
    let reply = send(&router, &Method::Post, "/items", &format!("{exact}{fill}"));
    assert_eq!(reply.status, 201);
}

// =============================================================================
// ITEM ROUTES
// =============================================================================

#[test]
fn test_replace_updates_item() {
    let (router, store, ids) = seeded_router(ApiPolicy::default());
    let url = format!("/items/{}", ids[2]);
    let body = json!({"id": ids[2], "name": "Bob"}).to_string();

    let reply = send(&router, &Method::Put, &url, &body);

    assert_eq!(reply.status, 200);
    assert_eq!(json_of(&reply), json!({"id": ids[2], "name": "Bob"}));
    assert_eq!(names(store.as_ref()), ["Broad beans", "Tomatoes", "Bob"]);
}

#[test]
fn test_replace_id_mismatch_is_malformed() {
    let (router, store, ids) = seeded_router(ApiPolicy::default());
    let url = format!("/items/{}", ids[0]);
    let body = json!({"id": ids[1], "name": "Bob"}).to_string();

    let reply = send(&router, &Method::Put, &url, &body);

    assert_eq!(reply.status, 400);
    assert_eq!(json_of(&reply), json!({"message": "Malformed Message"}));
    assert_eq!(names(store.as_ref()), SEED_NAMES);
}

#[test]
fn test_replace_unknown_id_creates_item() {
    let (router, store, _) = seeded_router(ApiPolicy::default());
    let reply = send(&router, &Method::Put, "/items/new-id", r#"{"id": "new-id", "name": "Leeks"}"#);

    assert_eq!(reply.status, 200);
    assert_eq!(names(store.as_ref()), ["Broad beans", "Tomatoes", "Peppers", "Leeks"]);
}

#[test]
fn test_delete_returns_empty_object() {
    let (router, store, ids) = seeded_router(ApiPolicy::default());
    let reply = send(&router, &Method::Delete, &format!("/items/{}", ids[2]), "");

    assert_eq!(reply.status, 200);
    assert_eq!(json_of(&reply), json!({}));
    assert_eq!(names(store.as_ref()), ["Broad beans", "Tomatoes"]);
}

#[test]
fn test_delete_missing_is_idempotent_by_default() {
    let (router, store, _) = seeded_router(ApiPolicy::default());
    let reply = send(&router, &Method::Delete, "/items/missing", "");
    assert_eq!(reply.status, 200);
    assert_eq!(names(store.as_ref()), SEED_NAMES);
}

#[test]
fn test_delete_missing_with_strict_policy() {
    let policy = ApiPolicy {
        missing_delete: MissingDelete::NotFound,
        ..ApiPolicy::default()
    };
    let (router, _, _) = seeded_router(policy);
    let reply = send(&router, &Method::Delete, "/items/missing", "");
    assert_eq!(reply.status, 404);
    assert_eq!(json_of(&reply), json!({"message": "Not Found"}));
}

#[test]
fn test_no_content_policy() {
    let policy = ApiPolicy {
        mutation_status: MutationStatus::NoContent,
        ..ApiPolicy::default()
    };
    let (router, _, ids) = seeded_router(policy);

    let url = format!("/items/{}", ids[0]);
    let body = json!({"id": ids[0], "name": "Bob"}).to_string();
    let replaced = send(&router, &Method::Put, &url, &body);
    assert_eq!(replaced.status, 204);
    assert_eq!(replaced.body, ReplyBody::Empty);

    let deleted = send(&router, &Method::Delete, &url, "");
    assert_eq!(deleted.status, 204);

    // Creation always answers 201
    let created = send(&router, &Method::Post, "/items", r#"{"name": "Kale"}"#);
    assert_eq!(created.status, 201);
}

// =============================================================================
// STORE FAILURES
// =============================================================================

#[test]
fn test_store_failure_is_internal_error_on_every_route() {
    let store = Arc::new(FailingItemStore::new());
    let router = Router::new(Arc::clone(&store) as Arc<dyn ItemStore>, ApiPolicy::default());

    let cases = [
        (Method::Get, "/items", ""),
        (Method::Post, "/items", r#"{"name": "Kale"}"#),
        (Method::Put, "/items/x", r#"{"id": "x", "name": "Kale"}"#),
        (Method::Delete, "/items/x", ""),
    ];
    for (method, url, body) in &cases {
        let reply = send(&router, method, url, body);
        assert_eq!(reply.status, 500, "{method} {url}");
        assert_eq!(reply.text(), r#"{"message":"Internal Server Error"}"#);
    }
    assert_eq!(store.calls(), cases.len());
}

#[test]
fn test_validation_runs_before_store_access() {
    let store = Arc::new(FailingItemStore::new());
    let router = Router::new(Arc::clone(&store) as Arc<dyn ItemStore>, ApiPolicy::default());

    let bad_create = send(&router, &Method::Post, "/items", r#"{"id": "x", "name": "Kale"}"#);
    assert_eq!(bad_create.status, 400);

    let bad_replace = send(&router, &Method::Put, "/items/x", r#"{"id": "y", "name": "Kale"}"#);
    assert_eq!(bad_replace.status, 400);

    assert_eq!(store.calls(), 0);
}

// =============================================================================
// ROUTING MISSES
// =============================================================================

#[test]
fn test_unknown_routes_are_not_found() {
    let (router, store, ids) = seeded_router(ApiPolicy::default());
    let item_url = format!("/items/{}", ids[0]);
    let nested_url = format!("/items/{}/extra", ids[0]);

    let cases = [
        (Method::Get, "/"),
        (Method::Get, "/nope"),
        (Method::Get, item_url.as_str()),
        (Method::Put, "/items"),
        (Method::Delete, "/items"),
        (Method::Patch, "/items"),
        (Method::Post, item_url.as_str()),
        (Method::Delete, "/items/"),
        (Method::Put, "/items/"),
        (Method::Delete, nested_url.as_str()),
        (Method::Post, "/other"),
    ];
    for (method, url) in &cases {
        let reply = send(&router, method, url, r#"{"name": "Kale"}"#);
        assert_eq!(reply.status, 404, "{method} {url}");
        assert_eq!(json_of(&reply), json!({"message": "Not Found"}));
    }
    assert_eq!(names(store.as_ref()), SEED_NAMES);
}

// =============================================================================
// STATIC FILES
// =============================================================================

#[test]
fn test_static_files_served_for_unmatched_get() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("index.html"), "<h1>Shopping</h1>").unwrap();
    fs::write(temp.path().join("app.js"), "console.log(1);").unwrap();

    let (router, _, _) = seeded_router(ApiPolicy::default());
    let router = router.with_static_files(StaticFiles::new(temp.path()));

    let index = send(&router, &Method::Get, "/", "");
    assert_eq!(index.status, 200);
    assert_eq!(index.text(), "<h1>Shopping</h1>");
    assert!(matches!(
        index.body,
        ReplyBody::File { content_type: "text/html; charset=utf-8", .. }
    ));

    let script = send(&router, &Method::Get, "/app.js", "");
    assert_eq!(script.status, 200);
    assert_eq!(script.text(), "console.log(1);");

    // The API still wins over a same-named file
    let items = send(&router, &Method::Get, "/items", "");
    assert_eq!(json_of(&items).as_array().unwrap().len(), 3);
}

#[test]
fn test_static_files_miss_and_traversal() {
    let temp = TempDir::new().unwrap();
    let public = temp.path().join("public");
    fs::create_dir(&public).unwrap();
    fs::write(temp.path().join("secret.txt"), "hidden").unwrap();

    let (router, _, _) = seeded_router(ApiPolicy::default());
    let router = router.with_static_files(StaticFiles::new(&public));

    for url in ["/missing.css", "/../secret.txt"] {
        let reply = send(&router, &Method::Get, url, "");
        assert_eq!(reply.status, 404, "{url}");
    }

    // Static files only answer GET
    fs::write(public.join("form.html"), "<form>").unwrap();
    let reply = send(&router, &Method::Post, "/form.html", "");
    assert_eq!(reply.status, 404);
}
