/// Inbound "send mail" request as bound from the multipart form.
///
/// Missing text fields are bound as empty strings; the validator treats
/// missing, empty and whitespace-only alike.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendRequest {
    pub sender_name: String,
    pub sender_email: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub attachments: Vec<Attachment>,
}

/// An uploaded file part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}
