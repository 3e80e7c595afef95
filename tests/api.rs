//! End-to-end customer workflow against a seeded in-memory store.
//!
//! Requests are injected straight into the router, so each test runs without
//! a socket or a database.

use std::sync::Arc;

use customer_service::routes::{self, Mount};
use customer_service::store::{MemoryStore, SharedStore};
use customer_service::{Request, Response, Router, fixtures};
use http::{HeaderValue, Method, StatusCode, header};
use serde_json::{Value, json};

struct Api {
    router: Router<SharedStore>,
    prefix: &'static str,
}

impl Api {
    async fn seeded(prefix: &'static str) -> Self {
        let store: SharedStore = Arc::new(MemoryStore::new());
        fixtures::seed(store.as_ref()).await.unwrap();
        Self { router: routes::router(store, &Mount::defaults()), prefix }
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Response {
        let body = body.map(|b| serde_json::to_vec(&b).unwrap()).unwrap_or_default();
        let url = format!("{}{path}", self.prefix);
        self.router.handle(Request::new(method, url, body)).await
    }

    async fn create(&self, customer: Value) -> Response {
        self.send(Method::POST, "/customers", Some(customer)).await
    }

    async fn list(&self) -> Response {
        self.send(Method::GET, "/customers", None).await
    }

    async fn get(&self, id: &str) -> Response {
        self.send(Method::GET, &format!("/customers/{id}"), None).await
    }

    async fn update(&self, id: &str, customer: Value) -> Response {
        self.send(Method::PUT, &format!("/customers/{id}"), Some(customer)).await
    }

    async fn delete(&self, id: &str) -> Response {
        self.send(Method::DELETE, &format!("/customers/{id}"), None).await
    }

    async fn create_id(&self, customer: Value) -> String {
        let res = self.create(customer).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        body(&res)["id"].as_str().unwrap().to_owned()
    }

    /// Asserts the list holds exactly `expected` (ignoring `_id`), sorted by name.
    async fn assert_list_sorted(&self, expected: Vec<Value>) {
        let res = self.list().await;
        assert_eq!(res.status(), StatusCode::OK);

        let listed: Vec<Value> = body(&res)
            .as_array()
            .unwrap()
            .iter()
            .map(|c| {
                assert!(c["_id"].is_string(), "missing _id in {c}");
                without_id(c)
            })
            .collect();

        let mut expected = expected;
        expected.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
        assert_eq!(listed, expected);
    }
}

fn body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).unwrap()
}

fn without_id(customer: &Value) -> Value {
    let mut customer = customer.clone();
    customer.as_object_mut().unwrap().remove("_id");
    customer
}

fn fixture_values() -> Vec<Value> {
    fixtures::customers().into_iter().map(Value::Object).collect()
}

#[tokio::test]
async fn creates_customer() {
    let api = Api::seeded("/v1").await;
    let input = json!({ "name": "Xuxa da Silva", "phone": "123456789" });

    let res = api.create(input.clone()).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let mut result = body(&res);
    let id = result.as_object_mut().unwrap().remove("id").unwrap();
    assert_eq!(id.as_str().map(|s| s.len()), Some(24));
    assert_eq!(result, json!({ "message": "user Xuxa da Silva created!" }));

    let mut expected = fixture_values();
    expected.push(input);
    api.assert_list_sorted(expected).await;
}

#[tokio::test]
async fn lists_only_fixtures_initially() {
    let api = Api::seeded("/v1").await;
    api.assert_list_sorted(fixture_values()).await;
}

#[tokio::test]
async fn lists_many_customers_sorted_by_name() {
    let api = Api::seeded("/v1").await;
    let customers = vec![
        json!({ "name": "Erick Wendel", "phone": "123456789" }),
        json!({ "name": "Ana Neri", "phone": "123456789" }),
        json!({ "name": "Shrek de Souza", "phone": "123456789" }),
        json!({ "name": "Nemo de Oliveira", "phone": "123456789" }),
        json!({ "name": "Buzz da Rocha", "phone": "123456789" }),
    ];
    for customer in &customers {
        api.create(customer.clone()).await;
    }

    let mut expected = fixture_values();
    expected.extend(customers);
    api.assert_list_sorted(expected).await;
}

#[tokio::test]
async fn list_keeps_extra_fields() {
    let api = Api::seeded("/v1").await;
    api.create_id(json!({ "name": "Zeca", "phone": "1", "email": "zeca@example.com" })).await;

    let res = api.list().await;
    let listed = body(&res);
    let zeca = listed.as_array().unwrap().last().unwrap();
    assert_eq!(zeca["email"], "zeca@example.com");
}

#[tokio::test]
async fn integers_past_i64_are_stored_as_doubles() {
    let api = Api::seeded("/v1").await;
    api.create_id(json!({ "name": "Zeca", "phone": "1", "n": u64::MAX })).await;

    let res = api.list().await;
    let listed = body(&res);
    let zeca = listed.as_array().unwrap().last().unwrap();
    assert!(zeca["n"].is_f64());
    assert_eq!(zeca["n"].as_f64(), Some(u64::MAX as f64));
}

#[tokio::test]
async fn list_sort_is_case_sensitive() {
    let api = Api::seeded("/v1").await;
    api.create_id(json!({ "name": "alice", "phone": "1" })).await;
    api.create_id(json!({ "name": "Zoe", "phone": "1" })).await;

    let res = api.list().await;
    let names: Vec<String> = body(&res)
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["Ana Neri", "Erick Wendel", "Shrek de Souza", "Zoe", "alice"]);
}

#[tokio::test]
async fn retrieves_customer_by_id() {
    let api = Api::seeded("/v1").await;
    let id = api.create_id(json!({ "name": "Test User", "phone": "123456789", "vip": true })).await;

    let res = api.get(&id).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res), json!({ "id": id, "name": "Test User", "phone": "123456789" }));
}

#[tokio::test]
async fn missing_customer_is_404() {
    let api = Api::seeded("/v1").await;
    let res = api.get("66fbfd09785d518f5c747366").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body(&res),
        json!({ "message": "User not found", "id": "66fbfd09785d518f5c747366" }),
    );
}

#[tokio::test]
async fn get_with_invalid_id_is_400() {
    let api = Api::seeded("/v1").await;
    let res = api.get("123").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), json!({ "message": "the id is invalid!", "id": "123" }));
}

#[tokio::test]
async fn updates_customer() {
    let api = Api::seeded("/v1").await;
    let id = api.create_id(json!({ "name": "Update User", "phone": "123456789" })).await;

    let updated = json!({ "name": "Updated Name", "phone": "987654321" });
    let res = api.update(&id, updated).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res), json!({ "message": format!("User {id} updated!"), "id": id }));

    let fetched = api.get(&id).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(
        body(&fetched),
        json!({ "id": id, "name": "Updated Name", "phone": "987654321" }),
    );
}

#[tokio::test]
async fn update_without_changes_is_404() {
    let api = Api::seeded("/v1").await;
    let same = json!({ "name": "Same User", "phone": "123456789" });
    let id = api.create_id(same.clone()).await;

    let res = api.update(&id, same).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body(&res),
        json!({ "message": "User not found or no changes made", "id": id }),
    );
}

#[tokio::test]
async fn update_with_invalid_id_is_400() {
    let api = Api::seeded("/v1").await;
    let res = api.update("123", json!({ "name": "New Name", "phone": "123" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), json!({ "message": "the id is invalid!", "id": "123" }));
}

#[tokio::test]
async fn create_requires_name_and_phone() {
    let api = Api::seeded("/v1").await;

    let res = api.create(json!({ "name": "No Phone" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), json!({ "message": "body must have required property 'phone'" }));

    let res = api.send(Method::POST, "/customers", None).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    api.assert_list_sorted(fixture_values()).await;
}

#[tokio::test]
async fn head_on_customer_list_has_no_body() {
    let api = Api::seeded("").await;
    let res = api.send(Method::HEAD, "/customers", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.body().is_empty());
}

#[tokio::test]
async fn deletes_customer() {
    let api = Api::seeded("/v1").await;
    let id = api.create_id(json!({ "name": "Delete User", "phone": "123456789" })).await;

    let res = api.delete(&id).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res), json!({ "message": format!("User {id} deleted!"), "id": id }));

    let fetched = api.get(&id).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);

    let again = api.delete(&id).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(&again), json!({ "message": "User not found", "id": id }));
}

#[tokio::test]
async fn delete_with_invalid_id_is_400() {
    let api = Api::seeded("/v1").await;
    let res = api.delete("123").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(&res), json!({ "message": "the id is invalid!", "id": "123" }));
}

#[tokio::test]
async fn unprefixed_mount_serves_same_data_without_cors() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    fixtures::seed(store.as_ref()).await.unwrap();
    let router = routes::router(store, &Mount::defaults());

    let v1 = router.handle(Request::new(Method::GET, "/v1/customers", "")).await;
    let bare = router.handle(Request::new(Method::GET, "/customers", "")).await;

    assert_eq!(v1.status(), StatusCode::OK);
    assert_eq!(bare.status(), StatusCode::OK);
    assert_eq!(body(&v1), body(&bare));
    assert_eq!(v1.header("access-control-allow-origin"), Some("*"));
    assert_eq!(bare.header("access-control-allow-origin"), None);
}

#[tokio::test]
async fn preflight_is_answered_under_v1_only() {
    let api = Api::seeded("/v1").await;
    let preflight = Request::new(Method::OPTIONS, "/v1/customers/66fbfd09785d518f5c747366", "")
        .with_header(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"))
        .with_header(header::ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("PUT"));
    let res = api.router.handle(preflight).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.body().is_empty());
    assert_eq!(res.header("access-control-allow-origin"), Some("*"));

    let bare = Api::seeded("").await;
    let res = bare.send(Method::OPTIONS, "/customers", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
