use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive ordinal range shared by every trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalScale {
    pub min: u8,
    pub max: u8,
}

impl OrdinalScale {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// A usable scale has at least one value
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Largest possible distance on a single trait (zero for an inverted scale)
    #[inline]
    pub const fn span(&self) -> u8 {
        self.max.saturating_sub(self.min)
    }

    #[inline]
    pub fn contains(&self, value: u8) -> bool {
        value >= self.min && value <= self.max
    }

    /// Neutral value used when a trait is left unspecified (rounded down)
    #[inline]
    pub const fn midpoint(&self) -> u8 {
        self.min + self.span() / 2
    }
}

impl Default for OrdinalScale {
    fn default() -> Self {
        Self::new(1, 5)
    }
}

/// What to do with a trait that has no value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Substitute the scale midpoint
    #[default]
    Midpoint,
    /// Treat the gap as an error
    Reject,
}

/// A breed's full trait vector plus display metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedProfile {
    pub name: String,
    pub traits: BTreeMap<String, u8>,
    /// Opaque image reference (URL or path), never inspected
    pub image: String,
}

impl BreedProfile {
    pub fn trait_value(&self, trait_name: &str) -> Option<u8> {
        self.traits.get(trait_name).copied()
    }
}

/// Human-readable text for a trait, used only when rendering explanations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDescription {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub description: String,
    /// Label for the bottom of the scale, e.g. "Independent"
    #[serde(rename = "lowLabel", skip_serializing_if = "Option::is_none")]
    pub low_label: Option<String>,
    /// Label for the top of the scale, e.g. "Lovey-Dovey"
    #[serde(rename = "highLabel", skip_serializing_if = "Option::is_none")]
    pub high_label: Option<String>,
}

/// Desired trait levels for a single recommendation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    #[serde(default)]
    pub values: BTreeMap<String, u8>,
    /// Relative importance per trait; traits not listed weigh 1.0
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl UserPreference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for a desired level
    pub fn with(mut self, trait_name: impl Into<String>, value: u8) -> Self {
        self.values.insert(trait_name.into(), value);
        self
    }

    /// Builder-style setter for a trait's importance
    pub fn with_weight(mut self, trait_name: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(trait_name.into(), weight);
        self
    }

    pub fn weight(&self, trait_name: &str) -> f64 {
        self.weights.get(trait_name).copied().unwrap_or(1.0)
    }
}

/// One trait row backing a match explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitHighlight {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub text: String,
    #[serde(rename = "userValue")]
    pub user_value: u8,
    #[serde(rename = "breedValue")]
    pub breed_value: u8,
    pub distance: u8,
}

/// A ranked breed with its score and explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub breed: &'a BreedProfile,
    /// Integer similarity in [0, 100]
    pub score: u8,
    /// Weighted sum of per-trait distances
    #[serde(rename = "totalDistance")]
    pub total_distance: f64,
    pub explanation: String,
    pub highlights: Vec<TraitHighlight>,
}

/// The loaded breed catalog: breeds, trait descriptions and the trait axis order.
///
/// Built once by the loader and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub(crate) traits: Vec<String>,
    pub(crate) breeds: BTreeMap<String, BreedProfile>,
    pub(crate) descriptions: BTreeMap<String, TraitDescription>,
    pub(crate) scale: OrdinalScale,
}

impl Catalog {
    /// Trait names in breed-table column order
    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    pub fn breeds(&self) -> &BTreeMap<String, BreedProfile> {
        &self.breeds
    }

    pub fn descriptions(&self) -> &BTreeMap<String, TraitDescription> {
        &self.descriptions
    }

    pub fn scale(&self) -> OrdinalScale {
        self.scale
    }

    pub fn breed(&self, name: &str) -> Option<&BreedProfile> {
        self.breeds.get(name)
    }

    pub fn description(&self, trait_name: &str) -> Option<&TraitDescription> {
        self.descriptions.get(trait_name)
    }

    pub fn has_trait(&self, trait_name: &str) -> bool {
        self.traits.iter().any(|t| t == trait_name)
    }

    pub fn len(&self) -> usize {
        self.breeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breeds.is_empty()
    }
}
