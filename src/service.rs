use crate::dispatch::MailDispatcher;
use crate::error::ApiError;
use crate::mapper;
use crate::request::SendRequest;
use crate::schema::SendResult;
use crate::validate;

/// Validates the request, builds the provider payload and sends it.
/// Nothing goes over the wire if validation fails.
pub async fn send_mail(
    dispatcher: &dyn MailDispatcher,
    base_url: &str,
    token: &str,
    request: &SendRequest,
) -> Result<SendResult, ApiError> {
    validate::ensure_valid(request)?;

    let outbound = mapper::to_provider_payload(request, token, base_url);
    let json = serde_json::to_string(&outbound.message)?;
    tracing::info!(
        url = %outbound.settings.url,
        attachments = outbound.message.attachments.len(),
        "dispatching mail"
    );
    dispatcher
        .dispatch(&outbound.settings.url, json, &outbound.settings.token)
        .await
}
