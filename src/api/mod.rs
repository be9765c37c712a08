//! JSON action boundary.

pub mod error;
pub mod handler;
pub mod types;

pub use error::ErrorResponse;
pub use handler::{parse_depth, ActionHandler, ActionResponse};
pub use types::{ActionRequest, DEFAULT_DEPTH};
