use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Papel do usuário na plataforma. Também é a tag discriminadora do
/// documento na collection "users".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Role {
    Talent,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Talent => "Talent",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Talent" => Ok(Role::Talent),
            "Employee" => Ok(Role::Employee),
            _ => Err(()),
        }
    }
}

/// Documento da collection "users": base compartilhada + variante por role,
/// achatada num único documento (layout de discriminator).
/// Único por (walletId, role) - índice composto criado no startup.
/// Forma de storage - nas respostas HTTP vai como [`UserResponse`].
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub wallet_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<BsonDateTime>,
}

/// Forma wire do documento: `id` como hex puro (sem `_id`), timestamps
/// ISO-8601. BSON extended JSON nunca vaza para o cliente.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub wallet_id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|oid| oid.to_hex()),
            wallet_id: user.wallet_id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            profile: user.profile,
            created_at: user
                .created_at
                .and_then(|d| d.try_to_rfc3339_string().ok()),
            updated_at: user
                .updated_at
                .and_then(|d| d.try_to_rfc3339_string().ok()),
        }
    }
}

/// Campos específicos de cada role, discriminados pelo campo "role".
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(tag = "role")]
pub enum Profile {
    Talent(TalentProfile),
    Employee(EmployeeProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Talent(_) => Role::Talent,
            Profile::Employee(_) => Role::Employee,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TalentProfile {
    #[serde(default)]
    pub experience_level: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub privacy: PrivacySettings,
    #[serde(default)]
    pub notification_settings: NotificationSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    #[serde(default)]
    pub company_name: String,
}

/// Flags de visibilidade do perfil Talent, cada uma com seu próprio default.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    #[serde(default)]
    pub show_email: bool,
    #[serde(default)]
    pub show_wallet: bool,
    #[serde(default = "default_true")]
    pub show_location: bool,
    #[serde(default = "default_true")]
    pub show_skills: bool,
    #[serde(default = "default_true")]
    pub searchable: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            show_email: false,
            show_wallet: false,
            show_location: true,
            show_skills: true,
            searchable: true,
        }
    }
}

/// Preferências email/push por categoria de notificação.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default)]
    pub messages: ChannelPrefs,
    #[serde(default)]
    pub job_alerts: ChannelPrefs,
    #[serde(default = "updates_prefs")]
    pub platform_updates: ChannelPrefs,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            messages: ChannelPrefs::default(),
            job_alerts: ChannelPrefs::default(),
            platform_updates: updates_prefs(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct ChannelPrefs {
    #[serde(default = "default_true")]
    pub email: bool,
    #[serde(default = "default_true")]
    pub push: bool,
}

impl Default for ChannelPrefs {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn updates_prefs() -> ChannelPrefs {
    ChannelPrefs {
        email: true,
        push: false,
    }
}

impl User {
    /// Documento novo com todos os defaults do role, timestamps incluídos.
    pub fn new(wallet_id: &str, role: Role) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: None,
            wallet_id: wallet_id.to_string(),
            name: String::new(),
            email: String::new(),
            avatar: String::new(),
            profile: match role {
                Role::Talent => Profile::Talent(TalentProfile::default()),
                Role::Employee => Profile::Employee(EmployeeProfile::default()),
            },
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }
}

/// Identidade autenticada da request, derivada de um token verificado.
/// Vive nas extensions da request (escopo por request) e é descartada
/// junto com ela. Nunca persistida.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub wallet_id: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn role_parses_and_displays() {
        assert_eq!("Talent".parse::<Role>(), Ok(Role::Talent));
        assert_eq!("Employee".parse::<Role>(), Ok(Role::Employee));
        assert!("Admin".parse::<Role>().is_err());
        assert!("talent".parse::<Role>().is_err());
        assert_eq!(Role::Talent.to_string(), "Talent");
    }

    #[test]
    fn fresh_talent_has_documented_defaults() {
        let user = User::new("w1", Role::Talent);
        assert_eq!(user.wallet_id, "w1");
        assert_eq!(user.role(), Role::Talent);
        assert_eq!(user.name, "");
        assert_eq!(user.email, "");
        assert_eq!(user.avatar, "");
        assert!(user.created_at.is_some());

        let profile = match &user.profile {
            Profile::Talent(p) => p,
            Profile::Employee(_) => panic!("expected Talent profile"),
        };
        assert_eq!(profile.experience_level, "");
        assert!(profile.skills.is_empty());
        assert!(!profile.privacy.show_email);
        assert!(!profile.privacy.show_wallet);
        assert!(profile.privacy.show_location);
        assert!(profile.privacy.show_skills);
        assert!(profile.privacy.searchable);
        assert!(profile.notification_settings.messages.email);
        assert!(profile.notification_settings.messages.push);
        assert!(profile.notification_settings.job_alerts.push);
        assert!(profile.notification_settings.platform_updates.email);
        assert!(!profile.notification_settings.platform_updates.push);
    }

    #[test]
    fn document_carries_role_tag() {
        let user = User::new("w1", Role::Talent);
        let doc = bson::to_document(&user).unwrap();
        assert_eq!(doc.get_str("role").unwrap(), "Talent");
        assert_eq!(doc.get_str("walletId").unwrap(), "w1");

        let back: User = bson::from_document(doc).unwrap();
        assert_eq!(back.role(), Role::Talent);
        assert_eq!(back.wallet_id, "w1");
    }

    #[test]
    fn wire_shape_uses_plain_id_and_iso_timestamps() {
        let mut user = User::new("w1", Role::Talent);
        user.id = Some(ObjectId::new());

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json["id"].is_string());
        assert_eq!(json["id"].as_str().unwrap().len(), 24);
        assert!(json.get("_id").is_none());
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
        assert_eq!(json["walletId"], "w1");
        assert_eq!(json["role"], "Talent");
    }

    #[test]
    fn minimal_employee_document_deserializes_with_defaults() {
        let doc = doc! { "walletId": "w2", "role": "Employee" };
        let user: User = bson::from_document(doc).unwrap();
        assert_eq!(user.role(), Role::Employee);
        match user.profile {
            Profile::Employee(p) => assert_eq!(p.company_name, ""),
            Profile::Talent(_) => panic!("expected Employee profile"),
        }
    }
}
