pub mod auth;
pub mod health;
pub mod profile;
pub mod swagger;

use serde::Serialize;

/// Envelope de sucesso: {message, data}.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: &str, data: T) -> Self {
        Self {
            message: message.to_string(),
            data,
        }
    }
}
