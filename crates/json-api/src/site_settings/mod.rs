//! Site Settings

mod errors;
mod handlers;

pub(crate) use handlers::*;
