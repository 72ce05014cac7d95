use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored tag does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} tag: {value}")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
}

/// Parse a snake_case tag into one of the closed domain enums
fn parse_tag<T: DeserializeOwned>(kind: &'static str, value: &str) -> Result<T, UnknownTag> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| UnknownTag {
        kind,
        value: value.to_string(),
    })
}

/// Vendor category as stored in the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Venue,
    Photographer,
    Videographer,
    Dj,
    Band,
    Flowers,
    Decor,
    Catering,
    Cake,
    Makeup,
    Hair,
    BridalWear,
    GroomWear,
    Invitations,
    Planner,
    Transportation,
    Lighting,
    Entertainment,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Venue => "venue",
            Category::Photographer => "photographer",
            Category::Videographer => "videographer",
            Category::Dj => "dj",
            Category::Band => "band",
            Category::Flowers => "flowers",
            Category::Decor => "decor",
            Category::Catering => "catering",
            Category::Cake => "cake",
            Category::Makeup => "makeup",
            Category::Hair => "hair",
            Category::BridalWear => "bridal_wear",
            Category::GroomWear => "groom_wear",
            Category::Invitations => "invitations",
            Category::Planner => "planner",
            Category::Transportation => "transportation",
            Category::Lighting => "lighting",
            Category::Entertainment => "entertainment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag("category", s)
    }
}

/// Lebanese administrative region a vendor operates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Beirut,
    MountLebanon,
    North,
    South,
    Bekaa,
    Nabatieh,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Beirut => "beirut",
            Region::MountLebanon => "mount_lebanon",
            Region::North => "north",
            Region::South => "south",
            Region::Bekaa => "bekaa",
            Region::Nabatieh => "nabatieh",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag("region", s)
    }
}

/// Paid listing tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    None,
    Pro,
    Featured,
}

impl FromStr for SubscriptionPlan {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag("subscription_plan", s)
    }
}

/// Moderation state of a vendor listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl FromStr for VendorStatus {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag("status", s)
    }
}

/// Coarse price bucket derived from a USD amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    Budget,
    Mid,
    Luxury,
}

/// Vendor row as read from the data store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "unknown_tag_as_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "unknown_tag_as_none")]
    pub region: Option<Region>,
    #[serde(default)]
    pub starting_price_usd: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub portfolio_images: Vec<String>,
    #[serde(default, deserialize_with = "clamped_count")]
    pub shortlist_count: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "unknown_tag_as_none")]
    pub subscription_plan: Option<SubscriptionPlan>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: VendorStatus,
}

impl VendorRecord {
    /// Bare record with every optional field empty
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            category: None,
            region: None,
            starting_price_usd: None,
            portfolio_images: Vec::new(),
            shortlist_count: 0,
            description: None,
            is_featured: false,
            subscription_plan: None,
            status: VendorStatus::Pending,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == VendorStatus::Approved
    }
}

/// Columns of `null` deserialize to the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse an optional stored tag, dropping values outside the known set
///
/// Rows keep their place in the ranking; the unknown tag just scores nothing.
pub fn lenient_tag<T>(value: Option<&str>) -> Option<T>
where
    T: FromStr<Err = UnknownTag>,
{
    match value?.parse() {
        Ok(tag) => Some(tag),
        Err(e) => {
            tracing::warn!("Ignoring {}", e);
            None
        }
    }
}

fn unknown_tag_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr<Err = UnknownTag>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(lenient_tag(raw.as_deref()))
}

/// Negative counts read as zero
pub fn clamp_count(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}

fn clamped_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.map_or(0, clamp_count))
}

/// Planning profile of a signed-in couple
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub estimated_budget_usd: Option<f64>,
}

impl UserProfile {
    pub fn with_budget(estimated_budget_usd: f64) -> Self {
        Self {
            id: None,
            estimated_budget_usd: Some(estimated_budget_usd),
        }
    }
}

/// Vendor with its recommendation score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVendor {
    #[serde(flatten)]
    pub vendor: VendorRecord,
    pub score: u32,
}
