use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope returned with every error status.
///
/// `message` carries all problems as one line, `errors` lists them one by one.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(message: Option<String>, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message,
            errors,
        }
    }
}
