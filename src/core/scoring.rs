use crate::models::{SubscriptionPlan, UserProfile, VendorRecord};
use crate::core::tiers::{user_budget_tier, vendor_price_tier};

/// Minimum description length (in characters, exclusive) that earns the completeness bonus
const DESCRIPTION_MIN_CHARS: usize = 50;

/// Fixed point values of one scoring policy
///
/// Every term is additive and independent. A zero value disables the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    /// `is_featured` or a featured subscription
    pub featured: u32,
    /// Pro subscription
    pub pro: u32,
    /// Profile supplied and the vendor region has neighbours
    pub region_adjacency: u32,
    /// Couple budget tier equals vendor price tier
    pub tier_match: u32,
    /// Vendor price tier is one step cheaper than the couple's budget tier
    pub tier_step_below: u32,
    pub points_per_shortlist: u32,
    pub shortlist_cap: u32,
    pub portfolio: u32,
    pub description: u32,
}

impl ScoringPolicy {
    /// Weighting used by the flat top-N ranking
    pub const PRIMARY: ScoringPolicy = ScoringPolicy {
        featured: 100,
        pro: 40,
        region_adjacency: 10,
        tier_match: 25,
        tier_step_below: 15,
        points_per_shortlist: 2,
        shortlist_cap: 20,
        portfolio: 10,
        description: 5,
    };

    /// Weighting used by the per-category ranking
    pub const CATEGORY: ScoringPolicy = ScoringPolicy {
        featured: 50,
        pro: 20,
        region_adjacency: 0,
        tier_match: 25,
        tier_step_below: 0,
        points_per_shortlist: 2,
        shortlist_cap: 20,
        portfolio: 10,
        description: 5,
    };
}

/// Score a vendor for the flat top-N ranking
///
/// Scoring formula (all terms additive):
/// ```text
///   +100  featured flag or featured plan
///   + 40  pro plan
///   + 10  profile supplied and vendor region has neighbours
///   + 25  budget tier == price tier
///   + 15  price tier one step below budget tier
///   +  2  per shortlist, capped at 20
///   + 10  at least one portfolio image
///   +  5  description longer than 50 characters
/// ```
pub fn score_vendor(vendor: &VendorRecord, profile: Option<&UserProfile>) -> u32 {
    score_with_policy(vendor, profile, &ScoringPolicy::PRIMARY)
}

/// Score a vendor for the per-category ranking
///
/// Halved subscription bonuses, no region term, and only exact tier matches count.
pub fn score_vendor_for_category(vendor: &VendorRecord, profile: Option<&UserProfile>) -> u32 {
    score_with_policy(vendor, profile, &ScoringPolicy::CATEGORY)
}

/// Score a vendor under an explicit policy
pub fn score_with_policy(
    vendor: &VendorRecord,
    profile: Option<&UserProfile>,
    policy: &ScoringPolicy,
) -> u32 {
    let mut score = 0u32;

    // Subscription tier
    if vendor.is_featured || vendor.subscription_plan == Some(SubscriptionPlan::Featured) {
        score += policy.featured;
    }
    if vendor.subscription_plan == Some(SubscriptionPlan::Pro) {
        score += policy.pro;
    }

    // Location
    if profile.is_some() && vendor.region.is_some_and(|r| r.has_neighbours()) {
        score += policy.region_adjacency;
    }

    // Budget fit
    score += budget_fit_points(vendor, profile, policy);

    // Popularity
    score += shortlist_points(vendor.shortlist_count, policy);

    // Completeness
    if !vendor.portfolio_images.is_empty() {
        score += policy.portfolio;
    }
    if vendor
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() > DESCRIPTION_MIN_CHARS)
    {
        score += policy.description;
    }

    score
}

#[inline]
fn budget_fit_points(
    vendor: &VendorRecord,
    profile: Option<&UserProfile>,
    policy: &ScoringPolicy,
) -> u32 {
    let user_tier = profile.and_then(|p| user_budget_tier(p.estimated_budget_usd));
    let vendor_tier = vendor_price_tier(vendor.starting_price_usd);

    match (user_tier, vendor_tier) {
        (Some(user), Some(vendor)) if user == vendor => policy.tier_match,
        (Some(user), Some(vendor)) if user.one_step_below() == Some(vendor) => {
            policy.tier_step_below
        }
        _ => 0,
    }
}

#[inline]
fn shortlist_points(shortlist_count: u32, policy: &ScoringPolicy) -> u32 {
    shortlist_count
        .saturating_mul(policy.points_per_shortlist)
        .min(policy.shortlist_cap)
}
