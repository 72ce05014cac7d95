use crate::models::{Category, UserProfile, VendorRecord};
use crate::services::VendorSource;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Columns selected for vendor rows
const VENDOR_COLUMNS: &str = "id,name,category,region,starting_price_usd,portfolio_images,\
shortlist_count,description,is_featured,subscription_plan,status";

/// Errors that can occur when talking to the hosted REST API
#[derive(Debug, Error)]
pub enum RestError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names exposed by the REST API
#[derive(Debug, Clone)]
pub struct RestTables {
    pub vendors: String,
    pub profiles: String,
}

impl Default for RestTables {
    fn default() -> Self {
        Self {
            vendors: "vendors".to_string(),
            profiles: "profiles".to_string(),
        }
    }
}

/// Client for the hosted platform's PostgREST-style API
///
/// Read-only: fetches approved vendors and user profiles.
pub struct RestClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: RestTables,
}

impl RestClient {
    pub fn new(base_url: String, api_key: String, tables: RestTables) -> Result<Self, RestError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }

    async fn get_rows(&self, url: &str, what: &str) -> Result<Vec<Value>, RestError> {
        let response = self.authorized(self.client.get(url)).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch {}: {} - {}", what, status, body);
            return Err(RestError::ApiError(format!("Failed to fetch {}: {}", what, status)));
        }

        let json: Value = response.json().await?;

        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(RestError::InvalidResponse(format!("Expected an array of {}", what))),
        }
    }
}

impl VendorSource for RestClient {
    type Error = RestError;

    async fn fetch_approved_vendors(
        &self,
        categories: &[Category],
    ) -> Result<Vec<VendorRecord>, RestError> {
        let mut url = format!(
            "{}?select={}&status=eq.approved",
            self.table_url(&self.tables.vendors),
            urlencoding::encode(VENDOR_COLUMNS),
        );

        if !categories.is_empty() {
            let list = categories
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(",");
            let filter = format!("in.({})", list);
            url.push_str(&format!("&category={}", urlencoding::encode(&filter)));
        }

        tracing::debug!("Fetching vendors from: {}", url);

        let rows = self.get_rows(&url, "vendors").await?;
        let total = rows.len();

        let vendors: Vec<VendorRecord> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<VendorRecord>(row) {
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

    async fn fetch_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, RestError> {
        let url = format!(
            "{}?select=id,estimated_budget_usd&id=eq.{}&limit=1",
            self.table_url(&self.tables.profiles),
            urlencoding::encode(user_id),
        );

        tracing::debug!("Fetching profile for user: {}", user_id);

        let rows = self.get_rows(&url, "profile").await?;

        match rows.into_iter().next() {
            Some(row) => serde_json::from_value(row)
                .map(Some)
                .map_err(|e| RestError::InvalidResponse(format!("Failed to parse profile: {}", e))),
            None => Ok(None),
        }
    }

    async fn health_check(&self) -> Result<bool, RestError> {
        let url = format!("{}?select=id&limit=1", self.table_url(&self.tables.vendors));
        let response = self.authorized(self.client.get(&url)).send().await?;
        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_client_creation() {
        let client = RestClient::new(
            "https://project.supabase.test/".to_string(),
            "test_key".to_string(),
            RestTables::default(),
        )
        .unwrap();

        assert_eq!(client.api_key, "test_key");
        assert_eq!(
            client.table_url("vendors"),
            "https://project.supabase.test/rest/v1/vendors"
        );
    }
}
