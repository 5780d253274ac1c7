use mongodb::bson::{doc, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;
use std::time::Duration;

use crate::models::{Role, User};

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let db = client.database(database_name(uri));

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Cria o índice único composto (walletId, role). É ele que garante
    /// no máximo um documento por par - a aplicação não usa lock nenhum,
    /// então a falha aqui é fatal no startup.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let users = self.db.collection::<Document>("users");

        let wallet_role_index = IndexModel::builder()
            .keys(doc! { "walletId": 1, "role": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        users.create_index(wallet_role_index).await?;
        log::info!("   ✅ Index ready: users(walletId, role) unique");

        Ok(())
    }

    /// Factory do handle da collection "users": construído uma vez no
    /// startup e injetado nos handlers via web::Data.
    pub fn user_store(&self) -> UserStore {
        UserStore {
            users: self.db.collection::<User>("users"),
        }
    }
}

/// Acesso CRUD à collection "users". Dono da identidade dos documentos;
/// unicidade fica por conta do índice do MongoDB.
#[derive(Clone)]
pub struct UserStore {
    users: Collection<User>,
}

impl UserStore {
    pub async fn find_by_wallet(
        &self,
        wallet_id: &str,
        role: Role,
    ) -> Result<Option<User>, mongodb::error::Error> {
        self.users
            .find_one(doc! { "walletId": wallet_id, "role": role.as_str() })
            .await
    }

    pub async fn create(&self, mut user: User) -> Result<User, mongodb::error::Error> {
        let result = self.users.insert_one(&user).await?;
        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    /// Aplica um patch `$set` e devolve o documento pós-update.
    pub async fn update(
        &self,
        wallet_id: &str,
        role: Role,
        set: Document,
    ) -> Result<Option<User>, mongodb::error::Error> {
        self.users
            .find_one_and_update(
                doc! { "walletId": wallet_id, "role": role.as_str() },
                doc! { "$set": set },
            )
            .return_document(ReturnDocument::After)
            .await
    }
}

/// Nome do database vindo do path da URI, depois do segmento de
/// authority. URI sem path (mongodb://host:27017) cai no default.
fn database_name(uri: &str) -> &str {
    uri.splitn(2, "://")
        .nth(1)
        .and_then(|rest| rest.split_once('/'))
        .and_then(|(_, path)| path.split('?').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("wallet_identity")
}

/// Violação de chave duplicada (code 11000) - o perdedor da corrida de
/// criação contra o índice único.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_name_from_uri_path() {
        assert_eq!(database_name("mongodb://localhost:27017/identity"), "identity");
        assert_eq!(
            database_name("mongodb://user:pw@host:27017/identity?retryWrites=true"),
            "identity"
        );
    }

    #[test]
    fn uri_without_path_falls_back_to_default() {
        assert_eq!(database_name("mongodb://localhost:27017"), "wallet_identity");
        assert_eq!(database_name("mongodb://localhost:27017/"), "wallet_identity");
        assert_eq!(
            database_name("mongodb+srv://cluster.example.net"),
            "wallet_identity"
        );
    }
}
