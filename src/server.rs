//! HTTP boundary: the versioned `sendMail` route and the server that hosts it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::dispatch::MailDispatcher;
use crate::error::ApiError;
use crate::request::{Attachment, SendRequest};
use crate::schema::SendResult;
use crate::service;

pub const SEND_MAIL_PATH: &str = "/api/{version}/MailSender/sendMail";

const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";
const SUPPORTED_VERSIONS: &str = "1.0";
const TOKEN_HEADER: &str = "token";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<dyn MailDispatcher>,
    send_base_url: Arc<str>,
}

pub fn router(dispatcher: Arc<dyn MailDispatcher>, config: &Config) -> Router {
    let state = AppState {
        dispatcher,
        send_base_url: config.send_base_url.as_str().into(),
    };
    Router::new()
        .route(SEND_MAIL_PATH, post(send_mail))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn send_mail(
    State(state): State<AppState>,
    Path(version): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let result = handle_send_mail(&state, &version, &headers, multipart)
        .await
        .map(Json);
    ([(SUPPORTED_VERSIONS_HEADER, SUPPORTED_VERSIONS)], result)
}

async fn handle_send_mail(
    state: &AppState,
    version: &str,
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<SendResult, ApiError> {
    check_version(version)?;
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::validation("Token header is required."))?;
    let multipart = multipart.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let request = read_form(multipart).await?;

    service::send_mail(
        state.dispatcher.as_ref(),
        &state.send_base_url,
        token,
        &request,
    )
    .await
}

/// Accepts `v1` and `v1.0`.
fn check_version(segment: &str) -> Result<(), ApiError> {
    let version = segment
        .strip_prefix('v')
        .or_else(|| segment.strip_prefix('V'));
    match version {
        Some("1") | Some("1.0") => Ok(()),
        _ => Err(ApiError::NotFound(format!(
            "API version '{segment}' is not supported"
        ))),
    }
}

/// Binds form parts to a [`SendRequest`]. Names match case-insensitively and
/// unknown parts are skipped.
async fn read_form(mut multipart: Multipart) -> Result<SendRequest, ApiError> {
    let mut request = SendRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_ascii_lowercase();
        match name.as_str() {
            "attachments" => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    tracing::debug!("skipping attachments part without a filename");
                    continue;
                };
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                let content = field.bytes().await?.to_vec();
                request.attachments.push(Attachment {
                    filename,
                    content_type,
                    content,
                });
            }
            "senderemail" => request.sender_email = field.text().await?,
            "sendername" => request.sender_name = field.text().await?,
            "recipientemail" => request.recipient_email = field.text().await?,
            "recipientname" => request.recipient_name = field.text().await?,
            "subject" => request.subject = field.text().await?,
            "text" => request.text = Some(field.text().await?),
            "html" => request.html = Some(field.text().await?),
            _ => tracing::trace!("ignoring form part {name}"),
        }
    }

    Ok(request)
}

/// Listens on the configured address and serves the router.
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    pub async fn bind(config: &Config, dispatcher: Arc<dyn MailDispatcher>) -> Result<Self> {
        let listener = TcpListener::bind(config.addr()).await?;
        Ok(Self {
            listener,
            router: router(dispatcher, config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn serve(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
