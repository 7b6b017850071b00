use crate::core::distance::TraitDelta;
use crate::models::OrdinalScale;

/// Calculate a match score (0-100) from per-trait deltas
///
/// Scoring formula:
/// score = 100 * (1 - Σ w·d / Σ w·(max - min))
///
/// With every weight at 1.0 this is the plain normalized distance over all
/// traits. Returns the rounded score and the weighted distance sum.
pub fn calculate_match_score(deltas: &[TraitDelta], scale: OrdinalScale) -> (u8, f64) {
    let span = scale.span() as f64;

    let total_distance: f64 = deltas.iter().map(TraitDelta::weighted).sum();
    let max_distance: f64 = deltas.iter().map(|d| d.weight * span).sum();

    // Nothing weighted means nothing can disagree
    if max_distance <= 0.0 {
        return (100, total_distance);
    }

    let raw = 100.0 * (1.0 - total_distance / max_distance);

    (raw.round().clamp(0.0, 100.0) as u8, total_distance)
}
