//! Request correlation ids.
//!
//! A caller supplied `x-request-id` is echoed back when it is short printable
//! ASCII; anything else is replaced with a fresh v7 UUID.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::Response,
};
use tracing::{debug, warn};
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

pub(super) fn resolve_request_id(incoming: Option<String>) -> String {
    match incoming {
        Some(candidate) if is_acceptable(&candidate) => candidate,
        Some(rejected) => {
            debug!(
                len = rejected.len(),
                "ignoring unusable incoming request id"
            );

            Uuid::now_v7().to_string()
        }
        None => Uuid::now_v7().to_string(),
    }
}

fn is_acceptable(candidate: &str) -> bool {
    !candidate.trim().is_empty()
        && candidate.len() <= MAX_REQUEST_ID_LEN
        && candidate.bytes().all(|byte| byte.is_ascii_graphic())
}

pub(super) fn echo_request_id(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => warn!(request_id, "request id is not a valid header value: {source}"),
    }
}

/// Handlers that never set a status answered 200.
pub(super) fn final_status(status_code: Option<StatusCode>) -> StatusCode {
    status_code.unwrap_or(StatusCode::OK)
}
