//! Turns a validated [`SendRequest`] into what the provider's `/send`
//! endpoint expects.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::request::{self, SendRequest};
use crate::validate::is_blank;
use crate::schema::{Attachment, Contact, Message};

const DISPOSITION: &str = "attachment";

/// Where and with which credential a [`Message`] is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchSettings {
    pub token: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outbound {
    pub message: Message,
    pub settings: DispatchSettings,
}

pub fn to_provider_payload(request: &SendRequest, token: &str, base_url: &str) -> Outbound {
    let text = request.text.clone().filter(|t| !is_blank(t));
    // html only goes out when there is no text
    let html = match text {
        Some(_) => None,
        None => request.html.clone(),
    };

    let message = Message {
        from: Contact {
            name: request.sender_name.clone(),
            email: request.sender_email.clone(),
        },
        to: vec![Contact {
            name: request.recipient_name.clone(),
            email: request.recipient_email.clone(),
        }],
        subject: request.subject.clone(),
        text,
        html,
        attachments: request.attachments.iter().map(to_wire_attachment).collect(),
    };

    Outbound {
        message,
        settings: DispatchSettings {
            token: token.to_string(),
            url: send_url(base_url),
        },
    }
}

pub fn send_url(base_url: &str) -> String {
    format!("{}/send", base_url.trim_end_matches('/'))
}

fn to_wire_attachment(attachment: &request::Attachment) -> Attachment {
    let content = if attachment.content.is_empty() {
        None
    } else {
        Some(STANDARD.encode(&attachment.content))
    };
    Attachment {
        content,
        filename: attachment.filename.clone(),
        mime: attachment.content_type.clone(),
        disposition: DISPOSITION.to_string(),
    }
}
