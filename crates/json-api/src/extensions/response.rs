//! Response helpers for created resources.

use salvo::{
    http::{StatusCode, header::LOCATION},
    prelude::{Response, StatusError},
};

use super::result::ResultExt as _;

pub(crate) trait ResponseExt {
    /// Mark the response `201 Created` with `Location` pointing at `path`.
    fn created_at(&mut self, path: String) -> Result<(), StatusError>;
}

impl ResponseExt for Response {
    fn created_at(&mut self, path: String) -> Result<(), StatusError> {
        self.add_header(LOCATION, path, true)
            .or_500("failed to set location header")?
            .status_code(StatusCode::CREATED);

        Ok(())
    }
}
