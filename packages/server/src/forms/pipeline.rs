use std::time::Duration;

use chrono::{DateTime, Utc};
use common::rate_limit::{RateDecision, RateLimiter};
use tracing::{debug, error, info, warn};

use super::email::{contact_mail, review_mail};
use super::validation::{ContactForm, ReviewForm};
use crate::mail::{Mailer, OutgoingMail};

/// A validated-and-mailed form.
pub trait Submission: Send + Sync {
    /// Short label used in logs.
    const KIND: &'static str;

    fn validate(&self) -> Vec<&'static str>;

    fn compose(&self, received_at: DateTime<Utc>) -> OutgoingMail;
}

impl Submission for ContactForm {
    const KIND: &'static str = "contact";

    fn validate(&self) -> Vec<&'static str> {
        ContactForm::validate(self)
    }

    fn compose(&self, _received_at: DateTime<Utc>) -> OutgoingMail {
        contact_mail(self)
    }
}

impl Submission for ReviewForm {
    const KIND: &'static str = "review";

    fn validate(&self) -> Vec<&'static str> {
        ReviewForm::validate(self)
    }

    fn compose(&self, received_at: DateTime<Utc>) -> OutgoingMail {
        review_mail(self, received_at)
    }
}

/// Terminal state of one submission. Nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Sent,
    Rejected(Vec<&'static str>),
    RateLimited { retry_after: Duration },
    /// No mail transport is configured on the server.
    NotConfigured,
    /// The transport failed. Details are logged, never returned.
    SendFailed,
}

/// Run a submission through rate limiting, validation and delivery.
///
/// A caller whose window is already exhausted is turned away before
/// validation. Only submissions that pass validation are counted against
/// the window.
pub async fn process<S: Submission>(
    form: &S,
    caller: &str,
    limiter: &RateLimiter,
    mailer: Option<&dyn Mailer>,
) -> SubmissionOutcome {
    if let RateDecision::Limited { retry_after } = limiter.check(caller) {
        warn!(kind = S::KIND, caller, "Submission rate limited");
        return SubmissionOutcome::RateLimited { retry_after };
    }

    let errors = form.validate();
    if !errors.is_empty() {
        debug!(kind = S::KIND, count = errors.len(), "Submission rejected");
        return SubmissionOutcome::Rejected(errors);
    }

    if let RateDecision::Limited { retry_after } = limiter.acquire(caller) {
        warn!(kind = S::KIND, caller, "Submission rate limited");
        return SubmissionOutcome::RateLimited { retry_after };
    }

    let Some(mailer) = mailer else {
        error!(kind = S::KIND, "SMTP not configured");
        return SubmissionOutcome::NotConfigured;
    };

    match mailer.send(form.compose(Utc::now())).await {
        Ok(()) => {
            info!(kind = S::KIND, "Submission delivered");
            SubmissionOutcome::Sent
        }
        Err(e) => {
            error!(kind = S::KIND, error = %e, "Failed to deliver submission");
            SubmissionOutcome::SendFailed
        }
    }
}
