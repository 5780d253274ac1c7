use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::models::Role;

/// Erro de domínio levantado pelo auth flow. Não conhece HTTP.
#[derive(Debug)]
pub enum ServiceError {
    AlreadyExists(Role),
    Store(mongodb::error::Error),
}

impl ServiceError {
    pub fn name(&self) -> String {
        match self {
            ServiceError::AlreadyExists(role) => format!("{}AlreadyExistsError", role),
            ServiceError::Store(_) => "UnknownError".to_string(),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::AlreadyExists(role) => write!(f, "{} already exists", role),
            ServiceError::Store(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Erro da camada de request: mensagem + status + nome discriminável.
/// O impl de `ResponseError` abaixo é o ponto único onde erros internos
/// viram wire format.
#[derive(Debug, Clone)]
pub struct RequestError {
    pub message: String,
    pub status: StatusCode,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    message: &'a str,
    error_name: &'a str,
}

impl RequestError {
    pub fn new(message: impl Into<String>, status: StatusCode, name: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            name: name.into(),
        }
    }

    pub fn missing_fields() -> Self {
        Self::new(
            "Missing walletId or role",
            StatusCode::BAD_REQUEST,
            "MissingFieldsError",
        )
    }

    pub fn invalid_role() -> Self {
        Self::new("Invalid role", StatusCode::BAD_REQUEST, "InvalidRoleError")
    }

    pub fn unauthorized() -> Self {
        Self::new(
            "Missing authorization token",
            StatusCode::UNAUTHORIZED,
            "UnauthorizedError",
        )
    }

    pub fn token_expired() -> Self {
        Self::new("Token expired", StatusCode::UNAUTHORIZED, "TokenExpiredError")
    }

    pub fn invalid_token() -> Self {
        Self::new("Invalid token", StatusCode::UNAUTHORIZED, "InvalidTokenError")
    }

    pub fn role_not_authorized(required: Role) -> Self {
        Self::new(
            format!("Requires {} role", required),
            StatusCode::FORBIDDEN,
            "RoleNotAuthorizedError",
        )
    }

    pub fn user_not_found() -> Self {
        Self::new("User not found", StatusCode::NOT_FOUND, "UserNotFoundError")
    }

    pub fn internal() -> Self {
        Self::new(
            "Something went wrong. Please try again later.",
            StatusCode::INTERNAL_SERVER_ERROR,
            "UnknownError",
        )
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl ResponseError for RequestError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorBody {
            message: &self.message,
            error_name: &self.name,
        })
    }
}

impl From<ServiceError> for RequestError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::AlreadyExists(_) => {
                Self::new(err.to_string(), StatusCode::CONFLICT, err.name())
            }
            ServiceError::Store(e) => {
                log::error!("❌ Store error: {}", e);
                Self::internal()
            }
        }
    }
}

impl From<mongodb::error::Error> for RequestError {
    fn from(err: mongodb::error::Error) -> Self {
        log::error!("❌ Database error: {}", err);
        Self::internal()
    }
}
