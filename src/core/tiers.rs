use crate::models::BudgetTier;

/// Upper bounds (exclusive) of the budget and mid tiers for a couple's total budget
const USER_BUDGET_MAX_USD: f64 = 15_000.0;
const USER_MID_MAX_USD: f64 = 50_000.0;

/// Upper bounds (exclusive) of the budget and mid tiers for a vendor's starting price
const VENDOR_BUDGET_MAX_USD: f64 = 1_000.0;
const VENDOR_MID_MAX_USD: f64 = 5_000.0;

/// Tier of a couple's estimated wedding budget
///
/// Missing, zero, negative and non-finite amounts have no tier.
#[inline]
pub fn user_budget_tier(estimated_budget_usd: Option<f64>) -> Option<BudgetTier> {
    tier_for(estimated_budget_usd, USER_BUDGET_MAX_USD, USER_MID_MAX_USD)
}

/// Tier of a vendor's starting price
#[inline]
pub fn vendor_price_tier(starting_price_usd: Option<f64>) -> Option<BudgetTier> {
    tier_for(starting_price_usd, VENDOR_BUDGET_MAX_USD, VENDOR_MID_MAX_USD)
}

#[inline]
fn tier_for(amount: Option<f64>, budget_max: f64, mid_max: f64) -> Option<BudgetTier> {
    let amount = amount.filter(|a| a.is_finite() && *a > 0.0)?;

    Some(if amount < budget_max {
        BudgetTier::Budget
    } else if amount < mid_max {
        BudgetTier::Mid
    } else {
        BudgetTier::Luxury
    })
}

impl BudgetTier {
    /// The next cheaper tier, if any
    pub fn one_step_below(self) -> Option<BudgetTier> {
        match self {
            BudgetTier::Luxury => Some(BudgetTier::Mid),
            BudgetTier::Mid => Some(BudgetTier::Budget),
            BudgetTier::Budget => None,
        }
    }
}
