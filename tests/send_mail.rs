use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use mailtrap_forward::config::Config;
use mailtrap_forward::dispatch::HttpDispatcher;
use mailtrap_forward::server::router;

const BOUNDARY: &str = "mailtrap-forward-test-boundary";

struct File<'a> {
    filename: &'a str,
    content_type: &'a str,
    content: &'a [u8],
}

fn app(provider: &Server) -> Router {
    app_for(provider.url())
}

fn app_for(send_base_url: String) -> Router {
    let config = Config {
        host: "127.0.0.1".into(),
        port: 0,
        send_base_url,
        max_upload_bytes: 1024 * 1024,
    };
    router(Arc::new(HttpDispatcher::default()), &config)
}

fn form(fields: &[(&str, &str)], files: &[File<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"attachments\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("senderEmail", "john@example.com"),
        ("senderName", "John Doe"),
        ("recipientEmail", "jane@example.com"),
        ("recipientName", "Jane Smith"),
        ("subject", "Test Subject"),
        ("text", "Hello, World!"),
    ]
}

fn send_request(version: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/api/{version}/MailSender/sendMail"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(token) = token {
        builder = builder.header("token", token);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let versions = response
        .headers()
        .get("api-supported-versions")
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, versions, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_send_mail_end_to_end() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("POST", "/send")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Json(json!({
            "from": {"name": "John Doe", "email": "john@example.com"},
            "to": [{"name": "Jane Smith", "email": "jane@example.com"}],
            "subject": "Test Subject",
            "text": "Hello, World!"
        })))
        .with_status(200)
        .with_body(r#"{"success":true,"message_ids":["1a2b"]}"#)
        .create_async()
        .await;

    let (status, versions, body) = call(
        app(&provider),
        send_request("v1", Some("test-token"), form(&valid_fields(), &[])),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(versions.as_deref(), Some("1.0"));
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message_ids"], json!(["1a2b"]));
}

#[tokio::test]
async fn test_attachments_are_forwarded_as_base64() {
    let pdf: &[u8] = b"%PDF-1.4\x00\x01\xff";
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("POST", "/send")
        .match_body(Matcher::PartialJson(json!({
            "attachments": [
                {
                    "content": STANDARD.encode(pdf),
                    "filename": "report.pdf",
                    "type": "application/pdf",
                    "disposition": "attachment"
                },
                {
                    "filename": "empty.txt",
                    "type": "text/plain",
                    "disposition": "attachment"
                }
            ]
        })))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let files = [
        File {
            filename: "report.pdf",
            content_type: "application/pdf",
            content: pdf,
        },
        File {
            filename: "empty.txt",
            content_type: "text/plain",
            content: b"",
        },
    ];
    let (status, _, _) = call(
        app(&provider),
        send_request("v1.0", Some("test-token"), form(&valid_fields(), &files)),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_request_is_rejected_before_dispatch() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("POST", "/send")
        .expect(0)
        .create_async()
        .await;

    let mut fields = valid_fields();
    fields[0] = ("senderEmail", "bademail");
    fields.retain(|(name, _)| *name != "subject");

    let (status, _, body) = call(
        app(&provider),
        send_request("v1", Some("test-token"), form(&fields, &[])),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "resultCode": 400,
            "messages": [{
                "field": "Resource validation error",
                "message": "Validation failed: Sender's email is not a valid email address.; Email subject is required."
            }]
        })
    );
}

#[tokio::test]
async fn test_rejected_token_maps_to_401_envelope() {
    let mut provider = Server::new_async().await;
    provider
        .mock("POST", "/send")
        .with_status(401)
        .with_body(r#"{"errors":["Unauthorized"]}"#)
        .create_async()
        .await;

    let (status, _, body) = call(
        app(&provider),
        send_request("v1", Some("invalid_token"), form(&valid_fields(), &[])),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({
            "resultCode": 401,
            "messages": [{"field": "Authorization error", "message": "Token is not correct"}]
        })
    );
}

#[tokio::test]
async fn test_provider_failure_is_answered_with_empty_result() {
    let mut provider = Server::new_async().await;
    provider
        .mock("POST", "/send")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let (status, _, body) = call(
        app(&provider),
        send_request("v1", Some("test-token"), form(&valid_fields(), &[])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_unknown_version_is_not_found() {
    let provider = Server::new_async().await;

    let (status, versions, body) = call(
        app(&provider),
        send_request("v2", Some("test-token"), form(&valid_fields(), &[])),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(versions.as_deref(), Some("1.0"));
    assert_eq!(body["resultCode"], json!(404));
    assert_eq!(body["messages"][0]["field"], json!("Resource not found"));
}

#[tokio::test]
async fn test_missing_token_header_is_a_validation_error() {
    let provider = Server::new_async().await;

    let (status, _, body) = call(
        app(&provider),
        send_request("v1", None, form(&valid_fields(), &[])),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["messages"][0]["message"], json!("Token header is required."));
}

#[tokio::test]
async fn test_form_field_names_are_case_insensitive() {
    let mut provider = Server::new_async().await;
    let mock = provider
        .mock("POST", "/send")
        .match_body(Matcher::PartialJson(json!({"subject": "Test Subject"})))
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let fields: Vec<_> = [
        ("SenderEmail", "john@example.com"),
        ("SenderName", "John Doe"),
        ("RecipientEmail", "jane@example.com"),
        ("RecipientName", "Jane Smith"),
        ("Subject", "Test Subject"),
        ("Html", "<p>Hi</p>"),
    ]
    .to_vec();

    let (status, _, body) = call(
        app(&provider),
        send_request("v1", Some("test-token"), form(&fields, &[])),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_unreachable_provider_hides_transport_error() {
    let (status, _, body) = call(
        app_for("http://127.0.0.1:1".into()),
        send_request("v1", Some("test-token"), form(&valid_fields(), &[])),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "resultCode": 500,
            "messages": [{"field": "Internal error", "message": "Something went wrong"}]
        })
    );
    let text = body.to_string();
    assert!(!text.contains("127.0.0.1"));
    assert!(!text.contains("provider request failed"));
}
