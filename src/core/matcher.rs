use thiserror::Error;

use crate::core::{
    distance::{trait_deltas, TraitDelta},
    explain::{explain, MAX_EXPLAIN_TRAITS},
    preferences::resolve_preferences,
    scoring::calculate_match_score,
};
use crate::models::{BreedProfile, Catalog, FillPolicy, MatchResult, UserPreference};

/// Number of matches returned when the caller does not ask for a count
pub const DEFAULT_TOP_N: usize = 3;

/// Errors raised while producing a recommendation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("No breeds are loaded")]
    EmptyCatalog,

    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Configuration for the matcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingConfig {
    /// How to treat traits the preference vector leaves out
    pub missing_preferences: FillPolicy,
    /// Traits cited per explanation (1 to 3)
    pub explain_traits: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            missing_preferences: FillPolicy::Midpoint,
            explain_traits: MAX_EXPLAIN_TRAITS,
        }
    }
}

/// Scores, ranks and explains breeds for a preference vector
///
/// # Pipeline Stages
/// 1. Preference resolution (validation and default fill)
/// 2. Per-trait distances
/// 3. Normalized scoring and ranking
/// 4. Explanations for the selected breeds
///
/// Holds no catalog state; the same matcher serves any catalog.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchingConfig,
}

struct Ranked<'a> {
    breed: &'a BreedProfile,
    score: u8,
    total_distance: f64,
    deltas: Vec<TraitDelta>,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            config: MatchingConfig {
                explain_traits: config.explain_traits.clamp(1, MAX_EXPLAIN_TRAITS),
                ..config
            },
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Rank the catalog against a preference vector
    ///
    /// # Arguments
    /// * `preferences` - Desired level (and optional weight) per trait
    /// * `catalog` - The loaded breeds and trait descriptions
    /// * `top_n` - Number of matches wanted; clamped to the catalog size
    ///
    /// # Returns
    /// Up to `top_n` matches by descending score, ties broken by breed name.
    /// Fails as a whole: no partial results.
    pub fn recommend<'a>(
        &self,
        preferences: &UserPreference,
        catalog: &'a Catalog,
        top_n: usize,
    ) -> Result<Vec<MatchResult<'a>>, MatchError> {
        if catalog.is_empty() {
            return Err(MatchError::EmptyCatalog);
        }

        if top_n == 0 {
            return Err(MatchError::InvalidArgument(
                "top_n must be a positive integer".to_string(),
            ));
        }

        let resolved = resolve_preferences(preferences, catalog, self.config.missing_preferences)?;
        let scale = catalog.scale();

        let mut ranked: Vec<Ranked<'a>> = catalog
            .breeds()
            .values()
            .map(|breed| {
                let deltas = trait_deltas(catalog.traits(), &resolved, breed, scale);
                let (score, total_distance) = calculate_match_score(&deltas, scale);

                Ranked {
                    breed,
                    score,
                    total_distance,
                    deltas,
                }
            })
            .collect();

        // Sort by score (descending) and then by name (ascending)
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.breed.name.cmp(&b.breed.name))
        });

        let take = top_n.min(ranked.len());
        if take < top_n {
            tracing::debug!("Clamped top_n {} to catalog size {}", top_n, take);
        }
        ranked.truncate(take);

        let results: Vec<MatchResult<'a>> = ranked
            .into_iter()
            .map(|r| {
                let (explanation, highlights) =
                    explain(catalog, &r.deltas, self.config.explain_traits);

                MatchResult {
                    breed: r.breed,
                    score: r.score,
                    total_distance: r.total_distance,
                    explanation,
                    highlights,
                }
            })
            .collect();

        tracing::debug!(
            "Ranked {} breeds, returning {} (best: {:?})",
            catalog.len(),
            results.len(),
            results.first().map(|m| (&m.breed.name, m.score))
        );

        Ok(results)
    }
}

/// Rank `catalog` for `preferences` with the default matcher
pub fn recommend<'a>(
    preferences: &UserPreference,
    catalog: &'a Catalog,
    top_n: usize,
) -> Result<Vec<MatchResult<'a>>, MatchError> {
    Matcher::default().recommend(preferences, catalog, top_n)
}
