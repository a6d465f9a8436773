//! Contact and review form submissions.

mod email;
pub mod messages;
mod pipeline;
mod validation;

pub use pipeline::{Submission, SubmissionOutcome, process};
pub use validation::{ContactForm, ReviewForm, is_valid_email, is_valid_phone};
