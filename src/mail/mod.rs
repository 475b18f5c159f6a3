pub mod templates;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("Email has no recipients")]
    NoRecipients,
    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// HTML email ready to hand to a [`Mailer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl OutgoingEmail {
    pub fn to(address: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: vec![address.into()],
            bcc: Vec::new(),
            subject: subject.into(),
            html: html.into(),
        }
    }

    pub fn with_bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = bcc;
        self
    }

    pub fn has_recipients(&self) -> bool {
        !self.to.is_empty() || !self.bcc.is_empty()
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Mailer backed by an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };
        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.password.clone()))
            .build();

        Ok(Self {
            transport,
            from: parse_mailbox(&config.from_header())?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(&self.from, &email)?;
        self.transport.send(message).await?;
        tracing::info!(
            "Email '{}' sent to {} recipient(s) and {} bcc",
            email.subject,
            email.to.len(),
            email.bcc.len()
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.trim().parse().map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, MailError> {
    if !email.has_recipients() {
        return Err(MailError::NoRecipients);
    }

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML);
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    for bcc in &email.bcc {
        builder = builder.bcc(parse_mailbox(bcc)?);
    }
    Ok(builder.body(email.html.clone())?)
}
