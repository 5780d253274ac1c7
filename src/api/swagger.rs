use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Identity Service API",
        version = "1.0.0",
        description = "Identity and profile service for a two-role (Talent/Employee) platform.\n\n**Authentication:** wallet-based signup/login issuing a 24h JWT bearer token. Profile endpoints require the token; the PATCH endpoints additionally require the matching role."
    ),
    paths(
        crate::api::auth::authenticate,
        crate::api::profile::get_profile,
        crate::api::profile::update_talent_profile,
        crate::api::profile::update_employee_profile,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::api::auth::AuthRequest,
            crate::api::auth::AuthData,
            crate::api::health::HealthResponse,
            crate::models::UserResponse,
            crate::models::Role,
            crate::models::Profile,
            crate::models::TalentProfile,
            crate::models::EmployeeProfile,
            crate::models::PrivacySettings,
            crate::models::NotificationSettings,
            crate::models::ChannelPrefs,
            crate::services::profile_service::TalentProfilePatch,
            crate::services::profile_service::EmployeeProfilePatch,
        )
    ),
    tags(
        (name = "Auth", description = "Wallet-based signup/login. First call for a (walletId, role) pair creates the user; later calls are idempotent lookups."),
        (name = "Profile", description = "Authenticated profile read and role-scoped partial updates."),
        (name = "Health", description = "Liveness endpoint."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
