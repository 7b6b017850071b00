use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::core::intake::PreferenceProfile;
use crate::models::domain::UserPreference;

/// Request to rank breeds against a preference vector
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[serde(default)]
    pub preferences: BTreeMap<String, u8>,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    #[validate(range(min = 1))]
    #[serde(alias = "top_n", rename = "topN")]
    pub top_n: Option<u16>,
}

impl RecommendRequest {
    pub fn to_preference(&self) -> UserPreference {
        UserPreference {
            values: self.preferences.clone(),
            weights: self.weights.clone(),
        }
    }
}

/// Request to fold a free-text message into a preference profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IntakeRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[serde(default)]
    pub profile: PreferenceProfile,
    #[validate(range(min = 1))]
    #[serde(alias = "top_n", rename = "topN")]
    pub top_n: Option<u16>,
}
