//! Normalized submissions and their validation rules.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;

use super::messages;
use crate::models::forms::{ContactRequest, ReviewRequest};

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9\s\-()]{10,20}$").expect("phone pattern is valid")
});
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const NAME_CHARS: RangeInclusive<usize> = 2..=100;
const LOCATION_CHARS: RangeInclusive<usize> = 2..=100;
const MESSAGE_CHARS: RangeInclusive<usize> = 10..=2000;
const REVIEW_TEXT_CHARS: RangeInclusive<usize> = 20..=1000;
const RATING: RangeInclusive<i64> = 1..=5;

fn length_within(value: &str, bounds: &RangeInclusive<usize>) -> bool {
    bounds.contains(&value.chars().count())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trimmed contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: String,
}

impl From<ContactRequest> for ContactForm {
    fn from(req: ContactRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            phone: req.phone.trim().to_string(),
            email: trimmed(req.email),
            message: req.message.trim().to_string(),
        }
    }
}

impl ContactForm {
    /// Every rule is checked; all violations are returned together.
    pub fn validate(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        if !length_within(&self.name, &NAME_CHARS) {
            errors.push(messages::NAME_LENGTH);
        }
        if !is_valid_phone(&self.phone) {
            errors.push(messages::PHONE_INVALID);
        }
        if let Some(email) = &self.email
            && !is_valid_email(email)
        {
            errors.push(messages::EMAIL_INVALID);
        }
        if !length_within(&self.message, &MESSAGE_CHARS) {
            errors.push(messages::MESSAGE_LENGTH);
        }
        errors
    }
}

/// Trimmed review form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub name: String,
    pub location: Option<String>,
    pub rating: i64,
    pub text: String,
}

impl From<ReviewRequest> for ReviewForm {
    fn from(req: ReviewRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            location: trimmed(req.location),
            rating: req.rating.unwrap_or_default(),
            text: req.text.trim().to_string(),
        }
    }
}

impl ReviewForm {
    pub fn validate(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        if !length_within(&self.name, &NAME_CHARS) {
            errors.push(messages::NAME_LENGTH);
        }
        if let Some(location) = &self.location
            && !length_within(location, &LOCATION_CHARS)
        {
            errors.push(messages::LOCATION_LENGTH);
        }
        if !RATING.contains(&self.rating) {
            errors.push(messages::RATING_REQUIRED);
        }
        if !length_within(&self.text, &REVIEW_TEXT_CHARS) {
            errors.push(messages::REVIEW_TEXT_LENGTH);
        }
        errors
    }
}
