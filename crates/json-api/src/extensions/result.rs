//! Result helpers for handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Collapse unexpected failures into a logged 500.
pub(crate) trait ResultExt<T> {
    fn or_500(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|source| {
            error!(context, "{source}");

            StatusError::internal_server_error()
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn test_or_500_keeps_ok_values() {
        let ok: Result<u32, String> = Ok(7);

        assert_eq!(ok.or_500("unused").ok(), Some(7));
    }

    #[test]
    fn test_or_500_maps_errors() {
        let failed: Result<u32, String> = Err("pool timed out".to_string());

        let status = failed.or_500("failed to fetch orders").err().map(|err| err.code);

        assert_eq!(status, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
