//! Outbound mail.

mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, warn};

pub use smtp::SmtpMailer;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid mail address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// A message addressed to the site owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub subject: String,
    pub text: String,
    pub html: String,
    /// Address of the person who filled in the form, if they gave one.
    pub reply_to: Option<String>,
}

/// Delivers form submissions. Sends are attempted once and never retried.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Mail transport for the forms, or `None` when mail is unavailable.
///
/// A broken SMTP configuration disables the forms only: it is logged here
/// and submissions are later refused as not configured.
pub fn mailer_from_config(config: &SmtpConfig) -> Option<Arc<dyn Mailer>> {
    match SmtpMailer::from_config(config) {
        Ok(Some(mailer)) => Some(Arc::new(mailer)),
        Ok(None) => {
            warn!("SMTP not configured; form submissions will be refused");
            None
        }
        Err(e) => {
            error!(error = %e, "Invalid SMTP configuration; form submissions will be refused");
            None
        }
    }
}
