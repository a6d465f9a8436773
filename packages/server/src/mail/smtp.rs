use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, instrument};

use super::{MailError, Mailer, OutgoingMail};
use crate::config::SmtpConfig;

/// Port on which SMTP servers expect implicit TLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// [`Mailer`] over an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

impl SmtpMailer {
    /// Build a mailer from configuration.
    ///
    /// Returns `Ok(None)` when host, port, user or pass is missing: the
    /// transport is simply not configured. The sender defaults to `user`
    /// and so does the recipient when `contact_email` is absent.
    pub fn from_config(config: &SmtpConfig) -> Result<Option<Self>, MailError> {
        let (Some(host), Some(port), Some(user), Some(pass)) = (
            non_empty(config.host.as_ref()),
            config.port,
            non_empty(config.user.as_ref()),
            non_empty(config.pass.as_ref()),
        ) else {
            return Ok(None);
        };

        let from = mailbox(non_empty(config.from.as_ref()).unwrap_or(user))?;
        let to = mailbox(non_empty(config.contact_email.as_ref()).unwrap_or(user))?;

        let implicit_tls = config.secure || port == IMPLICIT_TLS_PORT;
        let builder = if implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        };
        let transport = builder
            .port(port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        info!(host, port, implicit_tls, "SMTP transport configured");
        Ok(Some(Self { transport, from, to }))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, mail), fields(subject = %mail.subject))]
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(mail.subject);
        if let Some(reply_to) = mail.reply_to.as_deref() {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(e) => debug!(error = %e, "Ignoring unusable reply-to address"),
            }
        }
        let message = builder.multipart(MultiPart::alternative_plain_html(mail.text, mail.html))?;

        let response = self.transport.send(message).await?;
        debug!(code = %response.code(), "Message accepted by relay");
        Ok(())
    }
}
