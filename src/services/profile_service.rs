use mongodb::bson::{self, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use crate::database::UserStore;
use crate::models::{AuthContext, NotificationSettings, PrivacySettings, User};
use crate::utils::error::RequestError;

// ==================== REQUEST MODELS ====================

/// Patch parcial do perfil Talent - campos ausentes não são tocados.
#[derive(Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TalentProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacySettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<NotificationSettings>,
}

/// Patch parcial do perfil Employee.
#[derive(Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

// ==================== SERVICE FUNCTIONS ====================

pub async fn get_profile(store: &UserStore, ctx: &AuthContext) -> Result<User, RequestError> {
    store
        .find_by_wallet(&ctx.wallet_id, ctx.role)
        .await?
        .ok_or_else(RequestError::user_not_found)
}

pub async fn update_talent_profile(
    store: &UserStore,
    ctx: &AuthContext,
    patch: &TalentProfilePatch,
) -> Result<User, RequestError> {
    apply_patch(store, ctx, patch).await
}

pub async fn update_employee_profile(
    store: &UserStore,
    ctx: &AuthContext,
    patch: &EmployeeProfilePatch,
) -> Result<User, RequestError> {
    apply_patch(store, ctx, patch).await
}

async fn apply_patch<P: Serialize>(
    store: &UserStore,
    ctx: &AuthContext,
    patch: &P,
) -> Result<User, RequestError> {
    let set = build_set_document(patch).map_err(|e| {
        log::error!("❌ Failed to serialize profile patch: {}", e);
        RequestError::internal()
    })?;

    store
        .update(&ctx.wallet_id, ctx.role, set)
        .await?
        .ok_or_else(RequestError::user_not_found)
}

/// Monta o documento `$set` só com os campos presentes no patch
/// (None é pulado na serialização) e carimba updatedAt.
fn build_set_document<P: Serialize>(patch: &P) -> Result<Document, bson::ser::Error> {
    let mut set = bson::to_document(patch)?;
    set.insert("updatedAt", BsonDateTime::now());
    Ok(set)
}
