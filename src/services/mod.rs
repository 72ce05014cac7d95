// Service exports
pub mod auth;
pub mod postgres;
pub mod recommender;
pub mod rest;
pub mod store;

use std::future::Future;
use crate::models::{Category, UserProfile, VendorRecord};

pub use auth::{AuthError, Claims, SessionContext, SessionVerifier};
pub use postgres::{PostgresClient, PostgresError};
pub use recommender::{RecommendError, RecommendationFeed, Recommender, VendorQuery};
pub use rest::{RestClient, RestError, RestTables};
pub use store::{DataStore, StoreError};

/// Read access to the marketplace data store
///
/// Both reads are idempotent and safe to retry.
pub trait VendorSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch approved vendors, restricted to `categories` unless it is empty
    fn fetch_approved_vendors(
        &self,
        categories: &[Category],
    ) -> impl Future<Output = Result<Vec<VendorRecord>, Self::Error>> + Send;

    /// Fetch the planning profile of a signed-in user, if one exists
    fn fetch_user_profile(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>, Self::Error>> + Send;

    fn health_check(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
