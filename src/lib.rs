//! Vendor Recs - recommendation service for a Lebanese wedding-planning marketplace
//!
//! This library provides the vendor scoring and ranking used to suggest
//! vendors to couples, plus the data-store clients and HTTP routes around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{rank_vendors, rank_vendors_by_category, score_vendor, score_vendor_for_category, Ranker};
pub use crate::models::{BudgetTier, Category, Region, ScoredVendor, SubscriptionPlan, UserProfile, VendorRecord, VendorStatus};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let vendor = VendorRecord::new("v1");
        assert_eq!(score_vendor(&vendor, None), 0);
    }
}
