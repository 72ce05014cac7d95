use crate::models::{Category, UserProfile, VendorRecord};
use crate::services::{PostgresClient, PostgresError, RestClient, RestError, VendorSource};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Rest(#[from] RestError),

    #[error(transparent)]
    Postgres(#[from] PostgresError),
}

/// Data store backend selected by configuration
pub enum DataStore {
    Rest(RestClient),
    Postgres(PostgresClient),
}

impl DataStore {
    pub fn backend_name(&self) -> &'static str {
        match self {
            DataStore::Rest(_) => "rest",
            DataStore::Postgres(_) => "postgres",
        }
    }
}

impl VendorSource for DataStore {
    type Error = StoreError;

    async fn fetch_approved_vendors(
        &self,
        categories: &[Category],
    ) -> Result<Vec<VendorRecord>, StoreError> {
        match self {
            DataStore::Rest(client) => Ok(client.fetch_approved_vendors(categories).await?),
            DataStore::Postgres(client) => Ok(client.fetch_approved_vendors(categories).await?),
        }
    }

    async fn fetch_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        match self {
            DataStore::Rest(client) => Ok(client.fetch_user_profile(user_id).await?),
            DataStore::Postgres(client) => Ok(client.fetch_user_profile(user_id).await?),
        }
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        match self {
            DataStore::Rest(client) => Ok(client.health_check().await?),
            DataStore::Postgres(client) => Ok(client.health_check().await?),
        }
    }
}
