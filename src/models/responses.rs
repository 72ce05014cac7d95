use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::models::domain::{Category, ScoredVendor};

/// Response for the flat ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendVendorsResponse {
    pub request_id: String,
    pub vendors: Vec<ScoredVendor>,
    pub total: usize,
}

/// Response for the per-category ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendByCategoryResponse {
    pub request_id: String,
    pub categories: BTreeMap<Category, Vec<ScoredVendor>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
