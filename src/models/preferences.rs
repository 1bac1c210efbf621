use serde::{Deserialize, Serialize};

use super::PropertyType;

/// Price ceiling applied when a user has not stated a maximum price
pub const DEFAULT_MAX_PRICE: f64 = 50_000_000.0;

/// Province assumed for users without any stored preferences
pub const DEFAULT_PROVINCE: &str = "Luanda";

/// Preference record as stored for a user
///
/// Records are overwritten wholesale, so any field may be missing. `None` for
/// `property_type` or `province` means "any".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_bedrooms: Option<i32>,
}

/// Preferences after defaults have been applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPreferences {
    pub property_type: Option<PropertyType>,
    pub province: Option<String>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<i32>,
}

impl ResolvedPreferences {
    /// Resolves a possibly missing profile into concrete preferences
    ///
    /// Users with no stored record get the marketplace defaults (houses in the
    /// default province under the price ceiling). A stored record is taken as
    /// is; the ceiling never fills in a price the user left out.
    pub fn resolve(profile: Option<&PreferenceProfile>) -> Self {
        match profile {
            None => Self {
                property_type: Some(PropertyType::House),
                province: Some(DEFAULT_PROVINCE.to_string()),
                max_price: Some(DEFAULT_MAX_PRICE),
                min_bedrooms: None,
            },
            Some(profile) => Self {
                property_type: profile.property_type,
                province: profile.province.clone(),
                max_price: profile.max_price,
                min_bedrooms: profile.min_bedrooms,
            },
        }
    }
}
