use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use larder_server::config::ServerConfig;
use larder_server::router;
use larder_server::state::AppState;

const BOUNDARY: &str = "larder-test-boundary";

fn config(dir: &Path) -> ServerConfig {
    ServerConfig {
        data_file: dir.join("recipes.json"),
        uploads_dir: dir.join("uploads"),
        ..ServerConfig::default()
    }
}

fn app(dir: &Path) -> Router {
    let config = config(dir);
    router(AppState::open(&config), &config)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let (status, bytes) = send(app, builder.body(body).unwrap()).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn multipart(method: Method, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn create(app: &Router, title: &str, amounts: &[&str]) -> Value {
    let ingredients: Vec<Value> = amounts
        .iter()
        .map(|amount| json!({"name": "item", "amount": amount, "notes": "Quantity: 1"}))
        .collect();
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/recipes",
        Some(json!({"title": title, "ingredients": ingredients})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn titles(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn create_and_fetch_recipe() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let soup = create(&app, "Soup", &["200g", "50g"]).await;
    assert_eq!(soup["totalWeight"], 250.0);
    assert_eq!(soup["ingredientsCount"], 2);
    assert_eq!(soup["isPinned"], false);
    assert_eq!(soup["imageUrl"], Value::Null);

    let id = soup["id"].as_str().unwrap();
    let (status, fetched) = send_json(&app, Method::GET, &format!("/api/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, soup);

    let (status, list) = send_json(&app, Method::GET, "/api/recipes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_without_title_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) =
        send_json(&app, Method::POST, "/api/recipes", Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Recipe title is required");

    let (_, list) = send_json(&app, Method::GET, "/api/recipes", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_recipe_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    for (method, uri) in [
        (Method::GET, "/api/recipes/missing"),
        (Method::DELETE, "/api/recipes/missing"),
        (Method::GET, "/api/recipes/missing/ingredients"),
    ] {
        let (status, body) = send_json(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["error"].as_str().unwrap().contains("missing"));
    }

    let (status, _) = send_json(
        &app,
        Method::PATCH,
        "/api/recipes/missing/pin",
        Some(json!({"isPinned": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sorted_listing_puts_pinned_first() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    create(&app, "Banana", &["300g"]).await;
    create(&app, "apple", &["100g"]).await;
    let cherry = create(&app, "Cherry", &["200g"]).await;

    let (_, list) = send_json(&app, Method::GET, "/api/recipes?sort=name-asc", None).await;
    assert_eq!(titles(&list), ["apple", "Banana", "Cherry"]);

    let id = cherry["id"].as_str().unwrap();
    let (status, pinned) = send_json(
        &app,
        Method::PATCH,
        &format!("/api/recipes/{id}/pin"),
        Some(json!({"isPinned": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pinned["isPinned"], true);

    let (_, list) = send_json(&app, Method::GET, "/api/recipes?sort=name-asc", None).await;
    assert_eq!(titles(&list), ["Cherry", "apple", "Banana"]);

    let (_, list) = send_json(&app, Method::GET, "/api/recipes?sort=weight-desc", None).await;
    assert_eq!(titles(&list), ["Cherry", "Banana", "apple"]);
}

#[tokio::test]
async fn pinning_second_recipe_unpins_first() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let a = create(&app, "A", &[]).await;
    let b = create(&app, "B", &[]).await;
    for recipe in [&a, &b] {
        let id = recipe["id"].as_str().unwrap();
        send_json(
            &app,
            Method::PATCH,
            &format!("/api/recipes/{id}/pin"),
            Some(json!({"isPinned": true})),
        )
        .await;
    }

    let (_, list) = send_json(&app, Method::GET, "/api/recipes", None).await;
    let pinned: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["isPinned"] == true)
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(pinned, ["B"]);
}

#[tokio::test]
async fn multipart_create_stores_image_and_delete_removes_it() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let ingredients =
        r#"[{"ingredientId":1,"amount":"150g","notes":"Quantity: 3"},{"ingredientId":2,"amount":"2.5 kg","notes":"Quantity: 1"}]"#;
    let request = multipart(
        Method::POST,
        "/api/recipes",
        &[
            Part::Text("title", "Stew"),
            Part::Text("description", "slow"),
            Part::Text("ingredients", ingredients),
            Part::File {
                name: "image",
                file_name: "stew.png",
                content_type: "image/png",
                bytes: b"\x89PNG fake",
            },
        ],
    );
    let (status, bytes) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let stew: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stew["totalWeight"], 152.5);
    assert_eq!(stew["ingredients"][0]["ingredientId"], 1);

    let image_url = stew["imageUrl"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/"));

    let (status, served) = send(
        &app,
        Request::builder().uri(&image_url).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, b"\x89PNG fake");

    let id = stew["id"].as_str().unwrap();
    let (_, lines) =
        send_json(&app, Method::GET, &format!("/api/recipes/{id}/ingredients"), None).await;
    assert_eq!(lines[0]["weight"], 150.0);
    assert_eq!(lines[0]["quantity"], 3);

    let (status, _) = send_json(&app, Method::DELETE, &format!("/api/recipes/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let file_name = image_url.trim_start_matches("/uploads/");
    assert!(!dir.path().join("uploads").join(file_name).exists());
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let request = multipart(
        Method::POST,
        "/api/recipes",
        &[
            Part::Text("title", "Script"),
            Part::File {
                name: "image",
                file_name: "run.sh",
                content_type: "text/x-shellscript",
                bytes: b"echo hi",
            },
        ],
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_replaces_image_and_keeps_other_fields() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let request = multipart(
        Method::POST,
        "/api/recipes",
        &[
            Part::Text("title", "Tart"),
            Part::File {
                name: "image",
                file_name: "old.jpg",
                content_type: "image/jpeg",
                bytes: b"old",
            },
        ],
    );
    let (_, bytes) = send(&app, request).await;
    let tart: Value = serde_json::from_slice(&bytes).unwrap();
    let id = tart["id"].as_str().unwrap();
    let old_image = tart["imageUrl"].as_str().unwrap().to_string();

    let request = multipart(
        Method::PUT,
        &format!("/api/recipes/{id}"),
        &[
            Part::Text("description", "crisp"),
            Part::File {
                name: "image",
                file_name: "new.jpg",
                content_type: "image/jpeg",
                bytes: b"new",
            },
        ],
    );
    let (status, bytes) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(updated["title"], "Tart");
    assert_eq!(updated["description"], "crisp");
    assert_ne!(updated["imageUrl"], old_image.as_str());

    let old_name = old_image.trim_start_matches("/uploads/");
    assert!(!dir.path().join("uploads").join(old_name).exists());
}

#[tokio::test]
async fn json_update_with_invalid_title_keeps_recipe() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let pie = create(&app, "Pie", &["100g"]).await;
    let id = pie["id"].as_str().unwrap();

    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/api/recipes/{id}"),
        Some(json!({"title": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        &format!("/api/recipes/{id}"),
        Some(json!({"ingredients": [{"amount": "40g"}, {"amount": "2g"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Pie");
    assert_eq!(updated["totalWeight"], 42.0);
    assert_eq!(updated["ingredientsCount"], 2);
}

#[tokio::test]
async fn recipes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let soup = {
        let app = app(dir.path());
        create(&app, "Soup", &["200g", "50g"]).await
    };

    let app = app(dir.path());
    let (_, list) = send_json(&app, Method::GET, "/api/recipes", None).await;
    assert_eq!(list, json!([soup]));
}

#[tokio::test]
async fn health_reports_collection_totals() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    create(&app, "A", &["100g"]).await;
    create(&app, "B", &["25g"]).await;

    let (status, health) = send_json(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "OK");
    assert_eq!(health["database"]["recipes"], 2);
    assert_eq!(health["database"]["totalWeight"], 125.0);

    let (status, info) = send_json(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["endpoints"]["recipes"], "/api/recipes");
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let (status, body) = send_json(&app, Method::GET, "/api/nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}

#[tokio::test]
async fn numeric_ingredient_amounts_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/recipes",
        Some(json!({"title": "Rice", "ingredients": [{"amount": 150}, {"amount": null}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["totalWeight"], 150.0);
    assert_eq!(body["ingredients"][0]["amount"], "150");
}

#[tokio::test]
async fn malformed_ingredient_text_is_bad_request_in_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/recipes",
        Some(json!({"title": "Broken", "ingredients": "[{oops"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = multipart(
        Method::POST,
        "/api/recipes",
        &[Part::Text("title", "Broken"), Part::Text("ingredients", "[{oops")],
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send_json(
        &app,
        Method::POST,
        "/api/recipes",
        Some(json!({"title": "Encoded", "ingredients": "[{\"amount\":\"20g\"}]"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["totalWeight"], 20.0);

    let (_, list) = send_json(&app, Method::GET, "/api/recipes", None).await;
    assert_eq!(titles(&list), ["Encoded"]);
}

#[tokio::test]
async fn oversized_bodies_are_payload_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig {
        max_upload_bytes: 1024,
        ..config(dir.path())
    };
    let app = router(AppState::open(&config), &config);
    let filler = "x".repeat(4096);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/recipes",
        Some(json!({"title": "Big", "description": filler})),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());

    let request = multipart(
        Method::POST,
        "/api/recipes",
        &[Part::Text("title", "Big"), Part::Text("description", &filler)],
    );
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (_, list) = send_json(&app, Method::GET, "/api/recipes", None).await;
    assert!(list.as_array().unwrap().is_empty());
}
