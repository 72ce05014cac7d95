// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    clamp_count, lenient_tag, BudgetTier, Category, Region, ScoredVendor, SubscriptionPlan, UnknownTag, UserProfile,
    VendorRecord, VendorStatus,
};
pub use requests::{RecommendByCategoryRequest, RecommendVendorsRequest};
pub use responses::{ErrorResponse, HealthResponse, RecommendByCategoryResponse, RecommendVendorsResponse};
