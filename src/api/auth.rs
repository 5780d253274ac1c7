use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::api::ApiResponse;
use crate::database::UserStore;
use crate::models::{Role, UserResponse};
use crate::services::{auth_service, token_service};
use crate::utils::error::RequestError;

/// Body do signup/login. Campos opcionais de propósito: a validação de
/// presença é nossa, não do deserializer, para responder 400 com nome de
/// erro próprio.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    #[serde(default)]
    pub wallet_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthData {
    pub user: UserResponse,
    pub token: String,
}

/// Checagens de presença/enum, antes de qualquer acesso ao store.
fn validate(request: &AuthRequest) -> Result<(&str, Role), RequestError> {
    let wallet_id = request.wallet_id.as_deref().filter(|w| !w.is_empty());
    let role = request.role.as_deref().filter(|r| !r.is_empty());

    let (wallet_id, role) = match (wallet_id, role) {
        (Some(wallet_id), Some(role)) => (wallet_id, role),
        _ => return Err(RequestError::missing_fields()),
    };

    let role = role.parse::<Role>().map_err(|_| RequestError::invalid_role())?;
    Ok((wallet_id, role))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth",
    tag = "Auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Authenticated; returns the user document and a 24h bearer token"),
        (status = 400, description = "Missing walletId/role or invalid role"),
        (status = 409, description = "Lost the creation race for this (walletId, role) pair")
    )
)]
pub async fn authenticate(
    store: web::Data<UserStore>,
    request: web::Json<AuthRequest>,
) -> Result<HttpResponse, RequestError> {
    let (wallet_id, role) = validate(&request)?;
    log::info!("🔐 POST /api/v1/auth - wallet: {}, role: {}", wallet_id, role);

    let user = match role {
        Role::Talent => auth_service::talent_auth(&store, wallet_id).await,
        Role::Employee => auth_service::employee_auth(&store, wallet_id).await,
    }?;

    let token = token_service::issue_token(wallet_id, role)?;

    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Authentication successful",
        AuthData {
            user: user.into(),
            token,
        },
    )))
}
