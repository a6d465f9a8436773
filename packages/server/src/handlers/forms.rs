use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, instrument};

use crate::content::tags;
use crate::extractors::client_key::ClientKey;
use crate::forms::messages::{self, rate_limit_detail};
use crate::forms::{ContactForm, ReviewForm, SubmissionOutcome, process};
use crate::models::forms::{ContactRequest, FormResponse, ReviewRequest};
use crate::state::AppState;

fn invalid_body(rejection: JsonRejection) -> Response {
    debug!(error = %rejection.body_text(), "Unreadable form body");
    (
        StatusCode::BAD_REQUEST,
        Json(FormResponse::failed(
            messages::FORM_ERRORS,
            vec![messages::INVALID_BODY.to_string()],
        )),
    )
        .into_response()
}

/// Map a pipeline outcome to the visitor-facing response.
fn respond(outcome: SubmissionOutcome, success: &str, max_requests: u32) -> Response {
    match outcome {
        SubmissionOutcome::Sent => (StatusCode::OK, Json(FormResponse::ok(success))).into_response(),
        SubmissionOutcome::Rejected(errors) => (
            StatusCode::BAD_REQUEST,
            Json(FormResponse::failed(
                messages::FORM_ERRORS,
                errors.into_iter().map(str::to_string).collect(),
            )),
        )
            .into_response(),
        SubmissionOutcome::RateLimited { retry_after } => {
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(FormResponse::failed(
                    messages::RATE_LIMIT,
                    vec![rate_limit_detail(max_requests)],
                )),
            )
                .into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
            response
        }
        SubmissionOutcome::NotConfigured => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(FormResponse::failed(
                messages::SMTP_NOT_CONFIGURED,
                vec![messages::SMTP_ERROR.to_string()],
            )),
        )
            .into_response(),
        SubmissionOutcome::SendFailed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FormResponse::failed(
                messages::SERVER_ERROR,
                vec![messages::INTERNAL_ERROR.to_string()],
            )),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/contact",
    tag = "Forms",
    operation_id = "submitContact",
    summary = "Send a contact request",
    description = "Validates the request and mails it to the site owner. \
        At most `rate_limit.contact_max` accepted submissions per caller per window.",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Request delivered", body = FormResponse),
        (status = 400, description = "Validation failed", body = FormResponse),
        (status = 429, description = "Too many submissions", body = FormResponse,
            headers(("Retry-After" = u64, description = "Seconds until the window resets"))),
        (status = 500, description = "Mail delivery failed", body = FormResponse),
        (status = 503, description = "Mail transport not configured", body = FormResponse),
    ),
)]
#[instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<AppState>,
    caller: ClientKey,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    let form = ContactForm::from(request);
    let limiter = &state.contact_limiter;

    let outcome = process(
        &form,
        &caller.or_placeholder("contact"),
        limiter,
        state.mailer.as_deref(),
    )
    .await;

    if outcome == SubmissionOutcome::Sent {
        let tag = tags::seo_slug_tag(tags::CONTACTS_PAGE);
        let dropped = state.cache.invalidate(&tag).await;
        info!(tag = %tag, dropped, "Revalidated contacts page");
    }

    respond(outcome, messages::CONTACT_SUCCESS, limiter.max_requests())
}

#[utoipa::path(
    post,
    path = "/review",
    tag = "Forms",
    operation_id = "submitReview",
    summary = "Send a review for moderation",
    description = "Validates the review and mails it to the site owner. \
        Reviews appear on the site only after being published in the CMS.",
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review delivered", body = FormResponse),
        (status = 400, description = "Validation failed", body = FormResponse),
        (status = 429, description = "Too many submissions", body = FormResponse,
            headers(("Retry-After" = u64, description = "Seconds until the window resets"))),
        (status = 500, description = "Mail delivery failed", body = FormResponse),
        (status = 503, description = "Mail transport not configured", body = FormResponse),
    ),
)]
#[instrument(skip_all)]
pub async fn submit_review(
    State(state): State<AppState>,
    caller: ClientKey,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_body(rejection),
    };
    let form = ReviewForm::from(request);
    let limiter = &state.review_limiter;

    let outcome = process(
        &form,
        &caller.or_placeholder("review"),
        limiter,
        state.mailer.as_deref(),
    )
    .await;

    respond(outcome, messages::REVIEW_SUCCESS, limiter.max_requests())
}
