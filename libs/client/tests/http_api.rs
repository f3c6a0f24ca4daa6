//! HTTP-level tests of the API client against a mock server.

use serde_json::json;
use strato_client::{ApiClient, ApiError, ResourceKind};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), None).expect("client should build")
}

#[tokio::test]
async fn get_instance_decodes_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instances/inst-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "inst-1",
            "name": "web-0",
            "cpus": 2,
            "memory_mib": 2048,
            "node": "node-a",
            "state": "created",
            "power_state": "on",
            "disks": [],
            "video": {"model": "cirrus", "memory_kb": 16384}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let instance = client(&server).await.get_instance("inst-1").await.unwrap();
    assert_eq!(instance.uuid, "inst-1");
    assert_eq!(instance.cpus, 2);
    assert_eq!(instance.console_port, None);
}

#[tokio::test]
async fn missing_instance_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instances/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "instance not found"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .get_instance("gone")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("instance not found"));
}

#[tokio::test]
async fn non_json_error_body_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/instances/inst-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("scheduler on fire"))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .delete_instance("inst-1")
        .await
        .unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "scheduler on fire");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instances/inst-1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .get_instance("inst-1")
        .await
        .unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 503);
            assert!(!message.is_empty());
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn set_metadata_puts_value_under_kind_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/instances/inst-1/metadata/env"))
        .and(body_json(json!({"value": "prod"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .await
        .set_metadata(ResourceKind::Instance, "inst-1", "env", "prod")
        .await
        .unwrap();
}

#[tokio::test]
async fn get_metadata_returns_flat_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instances/inst-1/metadata"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"env": "prod", "tier": "web"})),
        )
        .mount(&server)
        .await;

    let metadata = client(&server)
        .await
        .get_metadata(ResourceKind::Instance, "inst-1")
        .await
        .unwrap();
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata.get("env").map(String::as_str), Some("prod"));
}

#[tokio::test]
async fn bearer_token_is_sent_on_every_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instances/inst-1/metadata"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), Some("secret-token")).unwrap();
    client
        .get_metadata(ResourceKind::Instance, "inst-1")
        .await
        .unwrap();
}
