use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use todo_server::{app, router, SequentialIds, Todo, TodoStore, UpdateMode};
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn sequential_app(mode: UpdateMode) -> Router {
    router(Arc::new(TodoStore::<SequentialIds>::new(mode)), false)
}

async fn send(app: &Router, req: Request<String>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

// --- list ---

#[tokio::test]
async fn list_todos_empty() {
    let resp = app().oneshot(empty_request("GET", "/todos/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo<Uuid>> = body_json(resp).await;
    assert!(todos.is_empty());
}

#[tokio::test]
async fn collection_route_accepts_both_spellings() {
    let app = sequential_app(UpdateMode::Strict);
    send(&app, json_request("POST", "/todos", r#"{"title":"a"}"#)).await;
    send(&app, json_request("POST", "/todos/", r#"{"title":"b"}"#)).await;

    let with_slash: Vec<Todo<u64>> = body_json(send(&app, empty_request("GET", "/todos/")).await).await;
    let without: Vec<Todo<u64>> = body_json(send(&app, empty_request("GET", "/todos")).await).await;
    assert_eq!(with_slash.len(), 2);
    assert_eq!(with_slash, without);
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/todos/", r#"{"title":"Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo<Uuid> = body_json(resp).await;
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.description, None);
    assert!(!todo.completed);
}

#[tokio::test]
async fn create_todo_ignores_client_id() {
    let app = sequential_app(UpdateMode::Strict);
    let resp = send(
        &app,
        json_request("POST", "/todos/", r#"{"id":99,"title":"Mine","description":"d"}"#),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo<u64> = body_json(resp).await;
    assert_eq!(todo.id, 1);
    assert_eq!(todo.description.as_deref(), Some("d"));
}

#[tokio::test]
async fn create_todo_missing_title_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/todos/", r#"{"not_title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["detail"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn create_todo_blank_title_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/todos/", r#"{"title":"  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"], "title must not be blank");
}

#[tokio::test]
async fn create_todo_bad_json_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/todos/", r#"{"title":"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn create_todo_without_content_type_returns_415() {
    let req = Request::builder()
        .method("POST")
        .uri("/todos/")
        .body(r#"{"title":"x"}"#.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// --- get ---

#[tokio::test]
async fn get_todo_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/todos/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn get_todo_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/todos/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn get_todo_non_integer_id_returns_400() {
    let resp = send(&sequential_app(UpdateMode::Strict), empty_request("GET", "/todos/abc")).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- update ---

#[tokio::test]
async fn update_todo_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/todos/00000000-0000-0000-0000-000000000000",
            r#"{"title":"Nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_todo_id_mismatch_returns_422() {
    let app = sequential_app(UpdateMode::Strict);
    send(&app, json_request("POST", "/todos/", r#"{"title":"a"}"#)).await;

    let resp = send(&app, json_request("PUT", "/todos/1", r#"{"id":2,"title":"a"}"#)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn upsert_mode_inserts_missing_id() {
    let app = sequential_app(UpdateMode::Upsert);

    let resp = send(&app, json_request("PUT", "/todos/7", r#"{"title":"Seven"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let todo: Todo<u64> = body_json(resp).await;
    assert_eq!(todo.id, 7);

    let resp = send(&app, json_request("POST", "/todos/", r#"{"title":"Next"}"#)).await;
    let next: Todo<u64> = body_json(resp).await;
    assert_eq!(next.id, 8);
}

#[tokio::test]
async fn upsert_at_max_id_then_create_returns_503() {
    let app = sequential_app(UpdateMode::Upsert);

    let resp = send(
        &app,
        json_request("PUT", "/todos/18446744073709551615", r#"{"title":"Last"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, json_request("POST", "/todos/", r#"{"title":"Overflow"}"#)).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "ids_exhausted");

    // The store is still usable afterwards.
    let todos: Vec<Todo<u64>> = body_json(send(&app, empty_request("GET", "/todos/")).await).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, u64::MAX);
}

#[tokio::test]
async fn update_todo_with_matching_body_id_succeeds() {
    let app = sequential_app(UpdateMode::Strict);
    send(&app, json_request("POST", "/todos/", r#"{"title":"a"}"#)).await;

    let resp = send(
        &app,
        json_request("PUT", "/todos/1", r#"{"id":1,"title":"b","completed":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let todo: Todo<u64> = body_json(resp).await;
    assert_eq!(todo.title, "b");
}

// --- delete ---

#[tokio::test]
async fn delete_todo_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/todos/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- cors ---

#[tokio::test]
async fn cors_allows_any_origin_when_enabled() {
    let app = router(Arc::new(TodoStore::<SequentialIds>::default()), true);
    let req = Request::builder()
        .uri("/todos/")
        .header(http::header::ORIGIN, "http://localhost:3000")
        .body(String::new())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(
        resp.headers()
            .get(http::header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_headers_absent_by_default() {
    let req = Request::builder()
        .uri("/todos/")
        .header(http::header::ORIGIN, "http://localhost:3000")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert!(resp
        .headers()
        .get(http::header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = sequential_app(UpdateMode::Strict).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/todos/", r#"{"title":"Buy milk"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Todo<u64> = body_json(resp).await;
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);

    // list contains the one todo
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/todos/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo<u64>> = body_json(resp).await;
    assert_eq!(todos, vec![created.clone()]);

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/todos/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Todo<u64> = body_json(resp).await;
    assert_eq!(fetched, created);

    // update replaces every field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            "/todos/1",
            r#"{"title":"Buy milk","description":"2%","completed":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo<u64> = body_json(resp).await;
    assert_eq!(updated.id, 1);
    assert_eq!(updated.description.as_deref(), Some("2%"));
    assert!(updated.completed);

    // a second update without description clears it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", "/todos/1", r#"{"title":"Buy oat milk"}"#))
        .await
        .unwrap();
    let updated: Todo<u64> = body_json(resp).await;
    assert_eq!(updated.title, "Buy oat milk");
    assert_eq!(updated.description, None);
    assert!(!updated.completed);

    // delete returns a confirmation with the removed record
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/todos/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Todo deleted");
    assert_eq!(body["todo"]["id"], 1);
    assert_eq!(body["todo"]["title"], "Buy oat milk");

    // get after delete is a 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/todos/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete is empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/todos/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let todos: Vec<Todo<u64>> = body_json(resp).await;
    assert!(todos.is_empty());
}

#[tokio::test]
async fn seeded_config_serves_seed_set() {
    let config = todo_server::ServerConfig {
        seed: true,
        id_scheme: todo_server::IdKind::Sequential,
        ..Default::default()
    };
    let app = todo_server::build_router(&config).await.unwrap();
    let resp = app.oneshot(empty_request("GET", "/todos/")).await.unwrap();

    let todos: Vec<Todo<u64>> = body_json(resp).await;
    assert_eq!(todos.len(), todo_server::store::seed_todos().len());
    assert_eq!(todos[0].id, 1);
}
