use crate::database::{is_duplicate_key, UserStore};
use crate::models::{Role, User};
use crate::utils::error::ServiceError;

pub async fn talent_auth(store: &UserStore, wallet_id: &str) -> Result<User, ServiceError> {
    wallet_auth(store, wallet_id, Role::Talent).await
}

pub async fn employee_auth(store: &UserStore, wallet_id: &str) -> Result<User, ServiceError> {
    wallet_auth(store, wallet_id, Role::Employee).await
}

/// Find-or-create por (walletId, role). A leitura-depois-escrita é propensa
/// a corrida entre requests concorrentes: duas podem ver "ausente" e ambas
/// tentar criar. O índice único rejeita a perdedora com duplicate-key, que
/// aqui vira conflito de domínio em vez de erro opaco. Qualquer outro erro
/// do store propaga sem tradução.
async fn wallet_auth(store: &UserStore, wallet_id: &str, role: Role) -> Result<User, ServiceError> {
    if let Some(user) = store
        .find_by_wallet(wallet_id, role)
        .await
        .map_err(ServiceError::Store)?
    {
        return Ok(user);
    }

    match store.create(User::new(wallet_id, role)).await {
        Ok(user) => {
            log::info!("✅ Created {} for wallet {}", user.role(), wallet_id);
            Ok(user)
        }
        Err(e) if is_duplicate_key(&e) => Err(ServiceError::AlreadyExists(role)),
        Err(e) => Err(ServiceError::Store(e)),
    }
}
