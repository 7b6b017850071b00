use serde::{Deserialize, Serialize};

use crate::core::intake::PreferenceProfile;
use crate::models::domain::{MatchResult, OrdinalScale, TraitDescription};
use crate::services::images::gallery_url;

/// A ranked match as rendered to clients
#[derive(Debug, Clone, Serialize)]
pub struct MatchCard<'a> {
    /// 1-based position in the ranking
    pub rank: usize,
    #[serde(flatten)]
    pub result: MatchResult<'a>,
    /// Where to browse more photos of the breed
    pub gallery: String,
}

impl<'a> MatchCard<'a> {
    pub fn from_results(results: Vec<MatchResult<'a>>) -> Vec<Self> {
        results
            .into_iter()
            .enumerate()
            .map(|(i, result)| Self {
                rank: i + 1,
                gallery: gallery_url(&result.breed.name),
                result,
            })
            .collect()
    }
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse<'a> {
    pub matches: Vec<MatchCard<'a>>,
    #[serde(rename = "totalBreeds")]
    pub total_breeds: usize,
}

/// Response for the intake endpoint
#[derive(Debug, Clone, Serialize)]
pub struct IntakeResponse<'a> {
    /// Traits picked up from this message
    pub detected: Vec<String>,
    /// Message neither set a preference nor mentioned dogs
    #[serde(rename = "offTopic")]
    pub off_topic: bool,
    pub profile: PreferenceProfile,
    /// Readable recap of the merged profile
    pub summary: String,
    pub matches: Vec<MatchCard<'a>>,
}

/// Trait listing response
#[derive(Debug, Clone, Serialize)]
pub struct TraitsResponse<'a> {
    pub scale: OrdinalScale,
    pub traits: Vec<TraitEntry<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraitEntry<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a TraitDescription>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub breeds: usize,
    pub traits: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
