// Core algorithm exports
pub mod filters;
pub mod ranker;
pub mod regions;
pub mod scoring;
pub mod tiers;

pub use filters::{is_eligible, is_excluded, matches_category};
pub use ranker::{rank_vendors, rank_vendors_by_category, Ranker, DEFAULT_CATEGORY_LIMIT, DEFAULT_LIMIT, MAX_LIMIT};
pub use scoring::{score_vendor, score_vendor_for_category, score_with_policy, ScoringPolicy};
pub use tiers::{user_budget_tier, vendor_price_tier};
