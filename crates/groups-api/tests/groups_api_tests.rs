// HTTP surface tests against the in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use groups_api::{build_router, AppState};
use groups_core::{Actor, Permission, RelationshipKind};
use groups_infrastructure::MemoryGroupRepository;
use groups_shared::config::AppConfig;

struct TestApp {
    router: Router,
    repo: Arc<MemoryGroupRepository>,
    state: AppState,
}

fn app() -> TestApp {
    let repo = Arc::new(MemoryGroupRepository::new());
    let mut config = AppConfig::defaults().unwrap();
    config.uploads.max_total_bytes = 1024;

    let state = AppState::new(repo.clone(), config);
    TestApp {
        router: build_router(state.clone()),
        repo,
        state,
    }
}

impl TestApp {
    fn token(&self, actor: &Actor) -> String {
        self.state.jwt.generate_access_token(actor).unwrap()
    }

    async fn send(&self, method: Method, uri: &str, actor: Option<&Actor>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(actor) = actor {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", self.token(actor)));
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_group(&self, actor: &Actor, name: &str) -> String {
        let (status, body) = self
            .send(Method::POST, "/api/v1/groups", Some(actor), Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

fn admin(tenant: Uuid) -> Actor {
    Actor::new(Uuid::new_v4(), tenant, vec![Permission::Admin])
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = app();
    let (status, body) = app.send(Method::GET, "/api/v1/groups", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn membership_round_trip() {
    let app = app();
    let tenant = Uuid::new_v4();
    let actor = admin(tenant);
    let user = Uuid::new_v4();
    app.repo
        .register_member(RelationshipKind::Users, user, tenant)
        .await
        .unwrap();

    let id = app.create_group(&actor, "Editors").await;
    let member_uri = format!("/api/v1/groups/{}/users/{}", id, user);

    for _ in 0..2 {
        let (status, body) = app.send(Method::POST, &member_uri, Some(&actor), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["users"], json!([user.to_string()]));
    }

    let (status, body) = app.send(Method::DELETE, &member_uri, Some(&actor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"], json!([]));

    let (status, body) = app.send(Method::GET, "/api/v1/groups", Some(&actor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn foreign_member_is_a_server_side_integrity_error() {
    let app = app();
    let tenant = Uuid::new_v4();
    let actor = admin(tenant);
    let stranger = Uuid::new_v4();
    app.repo
        .register_member(RelationshipKind::Assistants, stranger, Uuid::new_v4())
        .await
        .unwrap();

    let id = app.create_group(&actor, "Editors").await;
    let uri = format!("/api/v1/groups/{}/assistants/{}", id, stranger);
    let (status, body) = app.send(Method::POST, &uri, Some(&actor), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "RELATIONSHIP_VIOLATION");

    let (_, body) = app
        .send(Method::GET, &format!("/api/v1/groups/{}", id), Some(&actor), None)
        .await;
    assert_eq!(body["data"]["assistants"], json!([]));
}

#[tokio::test]
async fn other_tenant_sees_not_found() {
    let app = app();
    let owner = admin(Uuid::new_v4());
    let outsider = admin(Uuid::new_v4());

    let id = app.create_group(&owner, "Editors").await;
    let (status, _) = app
        .send(Method::GET, &format!("/api/v1/groups/{}", id), Some(&outsider), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_admin_is_forbidden() {
    let app = app();
    let tenant = Uuid::new_v4();
    let viewer = Actor::new(Uuid::new_v4(), tenant, vec![Permission::Assistants]);

    let (status, body) = app
        .send(Method::POST, "/api/v1/groups", Some(&viewer), Some(json!({ "name": "Editors" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (_, body) = app.send(Method::GET, "/api/v1/groups", Some(&admin(tenant)), None).await;
    assert_eq!(body["data"]["count"], 0);

    let id = app.create_group(&admin(tenant), "Editors").await;
    let (status, _) = app
        .send(Method::GET, &format!("/api/v1/groups/{}", id), Some(&viewer), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn patch_then_delete_twice() {
    let app = app();
    let actor = admin(Uuid::new_v4());
    let id = app.create_group(&actor, "Editors").await;
    let uri = format!("/api/v1/groups/{}", id);

    let (status, body) = app
        .send(Method::PATCH, &uri, Some(&actor), Some(json!({ "name": "Reviewers" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Reviewers");
    assert_eq!(body["data"]["version"], 2);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&actor), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::DELETE, &uri, Some(&actor), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn multipart_request(app: &TestApp, actor: &Actor, content_type: &str, content: &[u8]) -> Request<Body> {
    let boundary = "X-GROUPS-TEST-BOUNDARY";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n");
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/files")
        .header(AUTHORIZATION, format!("Bearer {}", app.token(actor)))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_reports_checksum() {
    let app = app();
    let actor = admin(Uuid::new_v4());

    let request = multipart_request(&app, &actor, "text/plain", b"abc");
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"][0]["size"], 3);
    assert_eq!(
        body["data"][0]["checksum"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[tokio::test]
async fn upload_rejects_unsupported_and_oversized_files() {
    let app = app();
    let actor = admin(Uuid::new_v4());

    let request = multipart_request(&app, &actor, "application/x-msdownload", b"MZ");
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let request = multipart_request(&app, &actor, "text/plain", &[b'a'; 2048]);
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn upload_beyond_body_limit_is_too_large() {
    let app = app();
    let actor = admin(Uuid::new_v4());

    // Larger than the router body limit, not just the upload limit
    let request = multipart_request(&app, &actor, "text/plain", &vec![b'a'; 200 * 1024]);
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");
}
