// ABOUTME: Tests for the HTTP repository client against a local axum server.
// ABOUTME: Verifies endpoints, auth headers, payload parsing and status classification.

use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use central_publish::client::{
    Bundle, CentralClient, ClientConfig, ClientErrorKind, DeploymentState, ErrorsPayload,
    ListRequest, RepositoryApi,
};
use central_publish::types::{Coordinates, DeploymentId, PublishMode};
use serde_json::{Value, json};
use std::collections::HashMap;

const TOKEN: &str = "secret-token";

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

fn client(base_url: &str) -> CentralClient {
    CentralClient::new(ClientConfig::new(TOKEN).base_url(base_url)).unwrap()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

/// Answers with the status code named in the path; anything else is 204.
async fn status_from_path(Path(code): Path<String>) -> impl IntoResponse {
    match code.parse::<u16>().ok().and_then(|c| StatusCode::from_u16(c).ok()) {
        Some(status) => (status, format!("server said {code}")),
        None => (StatusCode::NO_CONTENT, String::new()),
    }
}

async fn status_handler(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad token"})));
    }
    let id = query.get("id").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "deploymentId": id,
            "deploymentName": "widget-1.0.0",
            "deploymentState": "FAILED",
            "createTimestamp": 1700000000000i64,
            "errors": {"pkg:maven/org.example/widget@1.0.0": ["bad checksum"]},
            "deployedComponentVersions": [
                {"name": "widget", "path": "org/example/widget/1.0.0", "purl": "pkg:maven/org.example/widget@1.0.0", "errors": []}
            ]
        })),
    )
}

#[tokio::test]
async fn status_is_parsed_with_map_errors() {
    let base = serve(Router::new().route("/api/v1/publisher/status", post(status_handler))).await;

    let status = client(&base)
        .deployment_status(&DeploymentId::new("dep-7"))
        .await
        .unwrap();

    assert_eq!(status.id().as_str(), "dep-7");
    assert_eq!(status.state(), &DeploymentState::Failed);
    assert_eq!(status.create_timestamp, Some(1700000000000));
    assert!(matches!(status.errors, ErrorsPayload::Map(ref m) if m.len() == 1));
    assert_eq!(
        status.purls().collect::<Vec<_>>(),
        vec!["pkg:maven/org.example/widget@1.0.0"]
    );
}

#[tokio::test]
async fn wrong_token_is_an_auth_error() {
    let base = serve(Router::new().route("/api/v1/publisher/status", post(status_handler))).await;
    let client = CentralClient::new(ClientConfig::new("wrong").base_url(&base)).unwrap();

    let err = client
        .deployment_status(&DeploymentId::new("dep-7"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ClientErrorKind::Auth);
    assert_eq!(err.status_code(), Some(401));
    assert!(err.body().unwrap_or_default().contains("bad token"));
}

#[tokio::test]
async fn http_statuses_map_to_error_kinds() {
    let app = Router::new().route(
        "/api/v1/publisher/deployment/:code",
        post(status_from_path).delete(status_from_path),
    );
    let base = serve(app).await;
    let client = client(&base);

    let cases = [
        ("400", ClientErrorKind::BadRequest),
        ("401", ClientErrorKind::Auth),
        ("403", ClientErrorKind::Auth),
        ("404", ClientErrorKind::NotFound),
        ("500", ClientErrorKind::ServerError),
        ("502", ClientErrorKind::UnexpectedStatus),
    ];
    for (code, kind) in cases {
        let err = client
            .publish_deployment(&DeploymentId::new(code))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), kind, "status {code}");
        assert_eq!(err.body(), Some(format!("server said {code}").as_str()));
    }

    // 204 without a body is success
    client
        .publish_deployment(&DeploymentId::new("ok"))
        .await
        .unwrap();
    client
        .drop_deployment(&DeploymentId::new("ok"))
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_sends_name_and_type_and_reads_quoted_id() {
    async fn upload(Query(query): Query<HashMap<String, String>>, body: Bytes) -> impl IntoResponse {
        let name_ok = query.get("name").map(String::as_str) == Some("widget-1.0.0");
        let type_ok = query.get("publishingType").map(String::as_str) == Some("AUTOMATIC");
        let has_part = String::from_utf8_lossy(&body).contains("name=\"bundle\"");
        if name_ok && type_ok && has_part {
            (StatusCode::CREATED, "\"dep-42\"".to_string())
        } else {
            (StatusCode::BAD_REQUEST, format!("unexpected request {query:?}"))
        }
    }
    let base = serve(Router::new().route("/api/v1/publisher/upload", post(upload))).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("widget-1.0.0.zip");
    std::fs::write(&path, b"PK\x03\x04").unwrap();
    let bundle = Bundle::new(&path, None).unwrap();

    let id = client(&base)
        .upload_bundle(&bundle, PublishMode::Automatic)
        .await
        .unwrap();

    assert_eq!(id.as_str(), "dep-42");
}

#[tokio::test]
async fn empty_upload_response_is_a_decode_failure() {
    async fn upload() -> impl IntoResponse {
        (StatusCode::OK, "")
    }
    let base = serve(Router::new().route("/api/v1/publisher/upload", post(upload))).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.zip");
    std::fs::write(&path, b"zip").unwrap();
    let bundle = Bundle::new(&path, Some("custom")).unwrap();

    let err = client(&base)
        .upload_bundle(&bundle, PublishMode::UserManaged)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ClientErrorKind::Decode);
}

#[tokio::test]
async fn list_posts_sort_order_and_tolerates_missing_array() {
    async fn list(Json(body): Json<Value>) -> Json<Value> {
        if body["namespace"] == "empty" {
            return Json(json!({}));
        }
        assert_eq!(body["sortField"], "createTimestamp");
        assert_eq!(body["sortDirection"], "desc");
        Json(json!({
            "deployments": [
                {"deploymentId": "a", "deploymentState": "VALIDATED", "errors": "[]"},
                {"deploymentId": "b", "deploymentState": "SOMETHING_NEW", "deployedComponentVersions": null}
            ]
        }))
    }
    let base = serve(Router::new().route("/api/v1/publisher/deployments/files", post(list))).await;
    let client = client(&base);

    let deployments = client
        .list_deployments(&ListRequest::newest_first("org.example", 500))
        .await
        .unwrap();
    assert_eq!(deployments.len(), 2);
    assert_eq!(deployments[0].state(), &DeploymentState::Validated);
    assert_eq!(deployments[1].state().as_str(), "SOMETHING_NEW");
    assert!(deployments[1].deployed_component_versions.is_empty());

    let empty = client
        .list_deployments(&ListRequest::newest_first("empty", 500))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn published_check_reads_flag() {
    async fn published(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
        let hit = query.get("namespace").map(String::as_str) == Some("org.example")
            && query.get("name").map(String::as_str) == Some("widget")
            && query.get("version").map(String::as_str) == Some("1.0.0");
        Json(json!({ "published": hit }))
    }
    let base = serve(Router::new().route("/api/v1/publisher/published", get(published))).await;
    let coordinates = Coordinates::new("org.example", "widget", "1.0.0").unwrap();

    assert!(client(&base).is_published(&coordinates).await.unwrap());
}

#[tokio::test]
async fn malformed_status_body_is_a_decode_failure() {
    async fn garbage() -> &'static str {
        "<html>maintenance</html>"
    }
    let base = serve(Router::new().route("/api/v1/publisher/status", post(garbage))).await;

    let err = client(&base)
        .deployment_status(&DeploymentId::new("x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ClientErrorKind::Decode);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/api/v1"))
        .drop_deployment(&DeploymentId::new("x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ClientErrorKind::Transport);
    assert!(err.is_transient());
}

#[tokio::test]
async fn deployment_id_is_sent_as_one_path_segment() {
    async fn drop_one(Path(id): Path<String>) -> StatusCode {
        if id == "a/b?c" {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::BAD_REQUEST
        }
    }
    let app = Router::new().route("/api/v1/publisher/deployment/:id", delete(drop_one));
    let base = serve(app).await;

    client(&base)
        .drop_deployment(&DeploymentId::new("a/b?c"))
        .await
        .unwrap();
}

#[tokio::test]
async fn blank_deployment_id_never_reaches_the_server() {
    // Nothing listens here; a request that went out would be a transport failure.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client(&format!("http://{addr}/api/v1"));

    for id in ["", "  "] {
        let err = client
            .drop_deployment(&DeploymentId::new(id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ClientErrorKind::Validation);
        let err = client
            .publish_deployment(&DeploymentId::new(id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ClientErrorKind::Validation);
    }
}

#[test]
fn missing_bundle_fails_before_any_request() {
    let err = Bundle::new("/definitely/not/here.zip", None).unwrap_err();
    assert_eq!(err.kind(), ClientErrorKind::Validation);
}
