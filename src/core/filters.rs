use crate::models::{Category, VendorRecord};

/// Only approved listings may be recommended
#[inline]
pub fn is_eligible(vendor: &VendorRecord) -> bool {
    vendor.is_approved()
}

/// Check a vendor against an optional category filter
///
/// A vendor without a category never matches an explicit filter.
#[inline]
pub fn matches_category(vendor: &VendorRecord, category: Option<Category>) -> bool {
    match category {
        Some(category) => vendor.category == Some(category),
        None => true,
    }
}

#[inline]
pub fn is_excluded(vendor: &VendorRecord, exclude_ids: &[String]) -> bool {
    exclude_ids.iter().any(|id| *id == vendor.id)
}
