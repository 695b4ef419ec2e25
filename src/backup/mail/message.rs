use crate::backup::mail::address::Recipients;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use bon::Builder;
use derive_more::Display;
use getset::Getters;
use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::Message;
use std::path::{Path, PathBuf};

/// How the body is rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentKind {
    #[default]
    PlainText,
    Html,
}

impl ContentKind {
    /// `text/plain` is plain text, any other mime type is treated as HTML.
    pub fn from_mime<S: AsRef<str>>(mime: S) -> Self {
        if mime.as_ref() == "text/plain" {
            Self::PlainText
        } else {
            Self::Html
        }
    }

    fn content_type(self) -> ContentType {
        match self {
            Self::PlainText => ContentType::TEXT_PLAIN,
            Self::Html => ContentType::TEXT_HTML,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
pub enum Priority {
    #[display("1 (Highest)")]
    Highest,
    #[display("2 (High)")]
    High,
    #[default]
    #[display("3 (Normal)")]
    Normal,
    #[display("4 (Low)")]
    Low,
    #[display("5 (Lowest)")]
    Lowest,
}

impl Priority {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Highest),
            2 => Some(Self::High),
            3 => Some(Self::Normal),
            4 => Some(Self::Low),
            5 => Some(Self::Lowest),
            _ => None,
        }
    }
}

/// The `X-Priority` header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XPriority(pub Priority);

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let level = s.split_whitespace().next().unwrap_or_default().parse::<u8>()?;
        Priority::from_level(level)
            .map(Self)
            .ok_or_else(|| format!("invalid priority {s:?}").into())
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.to_string())
    }
}

#[derive(Clone, Debug, Builder, Getters)]
#[getset(get = "pub")]
pub struct MailMessage {
    #[builder(into)]
    subject: String,
    #[builder(into)]
    body: String,
    #[builder(into)]
    recipients: Recipients,
    #[builder(default, into)]
    attachments: Vec<PathBuf>,
    #[builder(default)]
    content_kind: ContentKind,
    #[builder(default)]
    priority: Priority,
}

impl MailMessage {
    /// Attachment paths that point at regular files, in order
    pub fn existing_attachments(&self) -> impl Iterator<Item = &Path> {
        self.attachments
            .iter()
            .map(PathBuf::as_path)
            .filter(|path| path.is_file())
    }

    pub fn to_message(&self, from: Mailbox) -> Result<Message> {
        let recipients = &self.recipients;
        let mut builder = recipients
            .to
            .iter()
            .fold(Message::builder(), |email, to| email.to(to.clone()));
        builder = recipients
            .cc
            .iter()
            .fold(builder, |email, cc| email.cc(cc.clone()));
        builder = recipients
            .bcc
            .iter()
            .fold(builder, |email, bcc| email.bcc(bcc.clone()));
        let builder = builder
            .from(from)
            .header(XPriority(self.priority))
            .subject(self.subject.as_str());

        let content_type = self.content_kind.content_type();
        let mut attachments = self.existing_attachments().peekable();
        if attachments.peek().is_none() {
            return Ok(builder.header(content_type).body(self.body.clone())?);
        }

        let mut multipart = MultiPart::mixed().singlepart(
            SinglePart::builder()
                .header(content_type)
                .body(self.body.clone()),
        );
        for path in attachments {
            multipart = multipart.singlepart(attachment(path)?);
        }

        Ok(builder.multipart(multipart)?)
    }
}

fn attachment(path: &Path) -> Result<SinglePart> {
    let content = std::fs::read(path)
        .map_err(Error::from)
        .with_msg(format!("Failed to read attachment {:?}", path))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = ContentType::parse(guess_mime(path))?;

    Ok(Attachment::new(file_name).body(content, content_type))
}

fn guess_mime(path: &Path) -> &'static str {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") || name.ends_with(".gz") {
        "application/gzip"
    } else if name.ends_with(".tar") {
        "application/x-tar"
    } else if name.ends_with(".sql") {
        "application/sql"
    } else if name.ends_with(".txt") {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}
