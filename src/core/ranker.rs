use std::collections::BTreeMap;
use crate::models::{Category, ScoredVendor, UserProfile, VendorRecord};
use crate::core::{
    filters::{is_eligible, is_excluded, matches_category},
    scoring::{score_vendor, score_vendor_for_category},
};

/// Default size of a flat ranking
pub const DEFAULT_LIMIT: usize = 10;

/// Default size of each per-category ranking
pub const DEFAULT_CATEGORY_LIMIT: usize = 3;

/// Largest ranking a caller may ask for
pub const MAX_LIMIT: usize = 50;

/// Rank approved vendors for a couple
///
/// # Pipeline
/// 1. Approved-only filter
/// 2. Optional category filter
/// 3. Primary scoring
/// 4. Stable sort by descending score (ties keep input order)
/// 5. Exclusion of already-seen ids
/// 6. Truncation to `limit`
pub fn rank_vendors(
    vendors: &[VendorRecord],
    profile: Option<&UserProfile>,
    category: Option<Category>,
    limit: usize,
    exclude_ids: &[String],
) -> Vec<ScoredVendor> {
    let mut ranked: Vec<ScoredVendor> = vendors
        .iter()
        .filter(|v| is_eligible(v))
        .filter(|v| matches_category(v, category))
        .map(|v| ScoredVendor {
            score: score_vendor(v, profile),
            vendor: v.clone(),
        })
        .collect();

    sort_by_score(&mut ranked);

    ranked.retain(|s| !is_excluded(&s.vendor, exclude_ids));
    ranked.truncate(limit);
    ranked
}

/// Rank approved vendors separately for each listed category
///
/// Every listed category is present in the result, with an empty ranking
/// when no vendor matches it.
pub fn rank_vendors_by_category(
    vendors: &[VendorRecord],
    profile: Option<&UserProfile>,
    categories: &[Category],
    limit: usize,
) -> BTreeMap<Category, Vec<ScoredVendor>> {
    let mut by_category = BTreeMap::new();

    for &category in categories {
        if by_category.contains_key(&category) {
            continue;
        }

        let mut ranked: Vec<ScoredVendor> = vendors
            .iter()
            .filter(|v| is_eligible(v))
            .filter(|v| v.category == Some(category))
            .map(|v| ScoredVendor {
                score: score_vendor_for_category(v, profile),
                vendor: v.clone(),
            })
            .collect();

        sort_by_score(&mut ranked);
        ranked.truncate(limit);

        by_category.insert(category, ranked);
    }

    by_category
}

/// `sort_by` is stable, so equal scores keep their fetch order
#[inline]
fn sort_by_score(ranked: &mut [ScoredVendor]) {
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Ranking front-end holding the configured limits
#[derive(Debug, Clone)]
pub struct Ranker {
    default_limit: usize,
    category_limit: usize,
    max_limit: usize,
}

impl Ranker {
    pub fn new(default_limit: usize, category_limit: usize, max_limit: usize) -> Self {
        Self {
            default_limit,
            category_limit,
            max_limit,
        }
    }

    pub fn max_limit(&self) -> usize {
        self.max_limit
    }

    /// Resolve a requested flat limit against the defaults and cap
    pub fn limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }

    /// Resolve a requested per-category limit against the defaults and cap
    pub fn category_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.category_limit).min(self.max_limit)
    }

    pub fn rank(
        &self,
        vendors: &[VendorRecord],
        profile: Option<&UserProfile>,
        category: Option<Category>,
        limit: Option<usize>,
        exclude_ids: &[String],
    ) -> Vec<ScoredVendor> {
        rank_vendors(vendors, profile, category, self.limit(limit), exclude_ids)
    }

    pub fn rank_by_category(
        &self,
        vendors: &[VendorRecord],
        profile: Option<&UserProfile>,
        categories: &[Category],
        limit: Option<usize>,
    ) -> BTreeMap<Category, Vec<ScoredVendor>> {
        rank_vendors_by_category(vendors, profile, categories, self.category_limit(limit))
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_CATEGORY_LIMIT, MAX_LIMIT)
    }
}
