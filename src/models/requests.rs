use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::Category;

/// Request for a flat vendor ranking
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecommendVendorsRequest {
    #[serde(default)]
    pub category: Option<Category>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    #[validate(length(max = 500))]
    #[serde(default, alias = "exclude_ids", rename = "excludeIds")]
    pub exclude_ids: Vec<String>,
}

/// Request for a per-category vendor ranking
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RecommendByCategoryRequest {
    #[validate(length(max = 32))]
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}
