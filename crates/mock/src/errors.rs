use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use console_client::Envelope;

/// Business codes used by the mock.
pub const TOKEN_INVALID: &str = "A0230";
pub const BAD_CREDENTIALS: &str = "A0210";
pub const BAD_CAPTCHA: &str = "A0240";

/// Enveloped error response: `{code, data: null, msg}`.
pub fn envelope_error(status: StatusCode, code: &'static str, msg: impl Into<String>) -> Response {
    (status, Json(Envelope::error(code, msg))).into_response()
}

pub fn unauthorized() -> Response {
    envelope_error(StatusCode::UNAUTHORIZED, TOKEN_INVALID, "token invalid or expired")
}
