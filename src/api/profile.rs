use actix_web::{web, HttpResponse};

use crate::api::ApiResponse;
use crate::database::UserStore;
use crate::models::{AuthContext, UserResponse};
use crate::services::profile_service::{self, EmployeeProfilePatch, TalentProfilePatch};
use crate::utils::error::RequestError;

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Current user's document"),
        (status = 401, description = "Missing, expired or invalid token"),
        (status = 404, description = "No document for the authenticated (walletId, role)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    store: web::Data<UserStore>,
    ctx: AuthContext,
) -> Result<HttpResponse, RequestError> {
    log::info!("👤 GET /api/v1/profile - wallet: {}, role: {}", ctx.wallet_id, ctx.role);

    let user = profile_service::get_profile(&store, &ctx).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Profile retrieved", UserResponse::from(user))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/profile/talent",
    tag = "Profile",
    request_body = TalentProfilePatch,
    responses(
        (status = 200, description = "Updated document"),
        (status = 401, description = "Missing, expired or invalid token"),
        (status = 403, description = "Authenticated but not a Talent"),
        (status = 404, description = "No document for the authenticated (walletId, role)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_talent_profile(
    store: web::Data<UserStore>,
    ctx: AuthContext,
    patch: web::Json<TalentProfilePatch>,
) -> Result<HttpResponse, RequestError> {
    log::info!("📝 PATCH /api/v1/profile/talent - wallet: {}", ctx.wallet_id);

    let user = profile_service::update_talent_profile(&store, &ctx, &patch).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Profile updated", UserResponse::from(user))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/profile/employee",
    tag = "Profile",
    request_body = EmployeeProfilePatch,
    responses(
        (status = 200, description = "Updated document"),
        (status = 401, description = "Missing, expired or invalid token"),
        (status = 403, description = "Authenticated but not an Employee"),
        (status = 404, description = "No document for the authenticated (walletId, role)")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_employee_profile(
    store: web::Data<UserStore>,
    ctx: AuthContext,
    patch: web::Json<EmployeeProfilePatch>,
) -> Result<HttpResponse, RequestError> {
    log::info!("📝 PATCH /api/v1/profile/employee - wallet: {}", ctx.wallet_id);

    let user = profile_service::update_employee_profile(&store, &ctx, &patch).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Profile updated", UserResponse::from(user))))
}
