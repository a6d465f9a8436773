//! Notification emails for form submissions.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::messages;
use super::validation::{ContactForm, ReviewForm};
use crate::mail::OutgoingMail;

/// Minsk is UTC+3 all year.
const MINSK_UTC_OFFSET_SECS: i32 = 3 * 3600;

const CONTACT_STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
.container { max-width: 600px; margin: 0 auto; padding: 20px; }
.header { background: #64748b; color: white; padding: 20px; border-radius: 5px 5px 0 0; }
.content { background: #f9f9f9; padding: 20px; border: 1px solid #ddd; border-radius: 0 0 5px 5px; }
.field { margin-bottom: 15px; }
.label { font-weight: bold; color: #666; }
.value { margin-top: 5px; padding: 10px; background: white; border-left: 3px solid #64748b; }
.message { white-space: pre-wrap; }";

const REVIEW_STYLE: &str = "\
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
.container { max-width: 600px; margin: 0 auto; padding: 20px; }
.header { background: #f59e0b; color: white; padding: 20px; border-radius: 5px 5px 0 0; }
.content { background: #f9f9f9; padding: 20px; border: 1px solid #ddd; border-radius: 0 0 5px 5px; }
.field { margin-bottom: 15px; }
.label { font-weight: bold; color: #666; }
.value { margin-top: 5px; padding: 10px; background: white; border-left: 3px solid #f59e0b; }
.stars { font-size: 24px; color: #f59e0b; }
.review-text { white-space: pre-wrap; font-style: italic; }
.notice { margin-top: 20px; padding: 15px; background: #fef3c7; border-radius: 5px; font-size: 14px; }";

/// `★★★★☆` for a rating of 4. Out-of-range ratings are clamped.
pub fn star_rating(rating: i64) -> String {
    let filled = rating.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Local Minsk time in the `dd.mm.yyyy, hh:mm:ss` form.
pub fn minsk_timestamp(at: DateTime<Utc>) -> String {
    let minsk = FixedOffset::east_opt(MINSK_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    at.with_timezone(&minsk).format("%d.%m.%Y, %H:%M:%S").to_string()
}

fn page(style: &str, heading: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                style { (PreEscaped(style)) }
            }
            body {
                div.container {
                    div.header {
                        h2 style="margin: 0;" { (heading) }
                    }
                    div.content { (body) }
                }
            }
        }
    }
    .into_string()
}

fn field(label: &str, value: &str) -> Markup {
    html! {
        div.field {
            div.label { (label) }
            div.value { (value) }
        }
    }
}

pub fn contact_mail(form: &ContactForm) -> OutgoingMail {
    let email = form.email.as_deref().unwrap_or(messages::NOT_PROVIDED);

    let text = format!(
        "{heading}\n\nИмя: {name}\nТелефон: {phone}\nEmail: {email}\n\nСообщение:\n{message}",
        heading = messages::CONTACT_HEADING,
        name = form.name,
        phone = form.phone,
        message = form.message,
    );

    let html = page(
        CONTACT_STYLE,
        messages::CONTACT_HEADING,
        html! {
            (field("Имя:", &form.name))
            (field("Телефон:", &form.phone))
            (field("Email:", email))
            div.field {
                div.label { "Сообщение:" }
                div.value.message { (form.message) }
            }
        },
    );

    OutgoingMail {
        subject: messages::CONTACT_SUBJECT.to_string(),
        text,
        html,
        reply_to: form.email.clone(),
    }
}

pub fn review_mail(form: &ReviewForm, received_at: DateTime<Utc>) -> OutgoingMail {
    let stars = star_rating(form.rating);
    let location = form.location.as_deref().unwrap_or(messages::NOT_PROVIDED);
    let received = minsk_timestamp(received_at);

    let text = format!(
        "{heading}\n\nИмя: {name}\nГород/район: {location}\nОценка: {stars} ({rating}/5)\n\n\
         Текст отзыва:\n{text}\n\n---\nДата: {received}\nДля публикации добавьте этот отзыв в CMS.",
        heading = messages::REVIEW_HEADING,
        name = form.name,
        rating = form.rating,
        text = form.text,
    );

    let html = page(
        REVIEW_STYLE,
        &format!("⭐ {}", messages::REVIEW_HEADING),
        html! {
            (field("Имя:", &form.name))
            (field("Город/район:", location))
            div.field {
                div.label { "Оценка:" }
                div.value {
                    span.stars { (stars) }
                    span style="color: #666; margin-left: 10px;" { "(" (form.rating) " из 5)" }
                }
            }
            div.field {
                div.label { "Текст отзыва:" }
                div.value."review-text" { "\u{201c}" (form.text) "\u{201d}" }
            }
            div.notice {
                strong { "Для публикации:" } " добавьте этот отзыв в CMS."
                br;
                strong { "Дата получения:" } " " (received)
            }
        },
    );

    OutgoingMail {
        subject: format!("{} - {} от {}", messages::REVIEW_SUBJECT, stars, form.name),
        text,
        html,
        reply_to: None,
    }
}
