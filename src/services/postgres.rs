use crate::models::{
    clamp_count, lenient_tag, Category, Region, SubscriptionPlan, UserProfile, VendorRecord, VendorStatus,
};
use crate::services::VendorSource;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Direct PostgreSQL reader for the marketplace tables
///
/// Used when the service runs next to the database instead of going through
/// the hosted REST API. Never writes.
pub struct PostgresClient {
    pool: PgPool,
    vendors_table: String,
    profiles_table: String,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self::from_pool(pool))
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool using the default table names
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            vendors_table: "vendors".to_string(),
            profiles_table: "profiles".to_string(),
        }
    }

    pub fn with_tables(mut self, vendors_table: String, profiles_table: String) -> Self {
        self.vendors_table = vendors_table;
        self.profiles_table = profiles_table;
        self
    }

    fn vendors_query(&self) -> String {
        format!(
            r#"
            SELECT
                id::text AS id,
                name,
                category::text AS category,
                region::text AS region,
                starting_price_usd::float8 AS starting_price_usd,
                COALESCE(portfolio_images, '{{}}')::text[] AS portfolio_images,
                COALESCE(shortlist_count, 0)::int8 AS shortlist_count,
                description,
                COALESCE(is_featured, false) AS is_featured,
                subscription_plan::text AS subscription_plan,
                status::text AS status
            FROM {}
            WHERE status::text = 'approved'
              AND (cardinality($1::text[]) = 0 OR category::text = ANY($1::text[]))
            "#,
            self.vendors_table
        )
    }
}

impl VendorSource for PostgresClient {
    type Error = PostgresError;

    async fn fetch_approved_vendors(
        &self,
        categories: &[Category],
    ) -> Result<Vec<VendorRecord>, PostgresError> {
        let filter: Vec<String> = categories.iter().map(|c| c.as_str().to_string()).collect();

        let rows = sqlx::query(&self.vendors_query())
            .bind(filter)
            .fetch_all(&self.pool)
            .await?;

        let total = rows.len();
        let vendors: Vec<VendorRecord> = rows
            .iter()
            .filter_map(|row| match vendor_from_row(row) {
                Ok(vendor) => Some(vendor),
                Err(e) => {
                    tracing::warn!("Skipping malformed vendor row: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} vendors ({} rows)", vendors.len(), total);

        Ok(vendors)
    }

    async fn fetch_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, PostgresError> {
        let query = format!(
            r#"
            SELECT id::text AS id, estimated_budget_usd::float8 AS estimated_budget_usd
            FROM {}
            WHERE id::text = $1
            LIMIT 1
            "#,
            self.profiles_table
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| -> Result<UserProfile, PostgresError> {
            Ok(UserProfile {
                id: row.try_get("id")?,
                estimated_budget_usd: row.try_get("estimated_budget_usd")?,
            })
        })
        .transpose()
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Build a vendor from a row
///
/// Unknown optional tags read as `None`; an unknown status rejects the row.
fn vendor_from_row(row: &PgRow) -> Result<VendorRecord, PostgresError> {
    let category: Option<String> = row.try_get("category")?;
    let region: Option<String> = row.try_get("region")?;
    let plan: Option<String> = row.try_get("subscription_plan")?;
    let status: String = row.try_get("status")?;
    let shortlist_count: i64 = row.try_get("shortlist_count")?;

    Ok(VendorRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: lenient_tag::<Category>(category.as_deref()),
        region: lenient_tag::<Region>(region.as_deref()),
        starting_price_usd: row.try_get("starting_price_usd")?,
        portfolio_images: row.try_get("portfolio_images")?,
        shortlist_count: clamp_count(shortlist_count),
        description: row.try_get("description")?,
        is_featured: row.try_get("is_featured")?,
        subscription_plan: lenient_tag::<SubscriptionPlan>(plan.as_deref()),
        status: status
            .parse::<VendorStatus>()
            .map_err(|e| PostgresError::InvalidRow(e.to_string()))?,
    })
}
