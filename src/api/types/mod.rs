//! API types

pub mod error;

pub use error::{ApiError, ApiErrorBody, COOLDOWN_MESSAGE, INTERNAL_ERROR_MESSAGE};
