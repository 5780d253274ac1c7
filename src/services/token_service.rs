use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::{AuthContext, Role};
use crate::utils::error::RequestError;

/// Validade fixa da sessão.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub wallet_id: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn sign(claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_secret().as_ref()),
    )
}

/// Emite um token HS256 com {walletId, role} e expiry de 24h.
pub fn issue_token(wallet_id: &str, role: Role) -> Result<String, RequestError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

    let claims = Claims {
        wallet_id: wallet_id.to_string(),
        role,
        iat,
        exp,
    };

    sign(&claims).map_err(|e| {
        log::error!("❌ Failed to sign token: {}", e);
        RequestError::internal()
    })
}

/// Verifica assinatura e expiry, distinguindo expirado de inválido.
pub fn verify_token(token: &str) -> Result<AuthContext, RequestError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| AuthContext {
        wallet_id: data.claims.wallet_id,
        role: data.claims.role,
    })
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => RequestError::token_expired(),
        _ => RequestError::invalid_token(),
    })
}

/// Extrai o token de um header "Authorization: Bearer <token>".
/// Header ausente, sem o esquema Bearer ou sem token é malformado - 401
/// de não-autenticado, não de token inválido.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, RequestError> {
    match header.and_then(|value| value.strip_prefix("Bearer ")) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(RequestError::unauthorized()),
    }
}

/// Header Authorization → identidade verificada.
pub fn authenticate(header: Option<&str>) -> Result<AuthContext, RequestError> {
    verify_token(extract_bearer(header)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_and_round_trips() {
        let token = issue_token("w1", Role::Talent).unwrap();
        let ctx = verify_token(&token).unwrap();
        assert_eq!(ctx.wallet_id, "w1");
        assert_eq!(ctx.role, Role::Talent);
    }

    #[test]
    fn expired_token_is_distinguished() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            wallet_id: "w1".to_string(),
            role: Role::Employee,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = sign(&claims).unwrap();

        let err = verify_token(&token).unwrap_err();
        assert_eq!(err.name, "TokenExpiredError");
        assert_eq!(err.status, actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = verify_token("not-a-token").unwrap_err();
        assert_eq!(err.name, "InvalidTokenError");

        let err = verify_token("aaa.bbb.ccc").unwrap_err();
        assert_eq!(err.name, "InvalidTokenError");
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(extract_bearer(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(extract_bearer(None).unwrap_err().name, "UnauthorizedError");
        assert_eq!(
            extract_bearer(Some("Token abc")).unwrap_err().name,
            "UnauthorizedError"
        );
    }

    #[test]
    fn bearer_scheme_without_token_is_unauthorized() {
        let err = extract_bearer(Some("Bearer ")).unwrap_err();
        assert_eq!(err.name, "UnauthorizedError");

        let err = authenticate(Some("Bearer ")).unwrap_err();
        assert_eq!(err.name, "UnauthorizedError");
    }

    #[test]
    fn authenticate_rejects_tampered_token() {
        let token = issue_token("w1", Role::Talent).unwrap();
        let tampered = format!("{}x", token);
        let header = format!("Bearer {}", tampered);
        let err = authenticate(Some(&header)).unwrap_err();
        assert_eq!(err.name, "InvalidTokenError");
    }
}
