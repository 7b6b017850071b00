use std::cmp::Ordering;

use crate::core::distance::TraitDelta;
use crate::models::{Catalog, TraitHighlight};

/// Most traits an explanation will cite
pub const MAX_EXPLAIN_TRAITS: usize = 3;

/// Pick the best-aligned traits for a breed
///
/// Ordered by smallest distance, then by higher weight, then by catalog
/// order. Traits the user gave zero weight are only used when nothing else
/// is left.
pub fn best_aligned(deltas: &[TraitDelta], limit: usize) -> Vec<TraitDelta> {
    let mut candidates: Vec<TraitDelta> = deltas.iter().filter(|d| d.weight > 0.0).copied().collect();
    if candidates.is_empty() {
        candidates = deltas.to_vec();
    }

    candidates.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal))
            .then_with(|| a.index.cmp(&b.index))
    });

    candidates.truncate(limit);
    candidates
}

/// Render the phrase for one trait, e.g. "Needs lots of exercise (Energy Level: 5/5)"
pub fn describe_trait(catalog: &Catalog, trait_name: &str, value: u8) -> String {
    let max = catalog.scale().max;

    match catalog.description(trait_name) {
        Some(desc) if !desc.description.trim().is_empty() => {
            let text = desc.description.trim().trim_end_matches('.');
            format!("{text} ({trait_name}: {value}/{max})")
        }
        _ => format!("{trait_name}: level {value}/{max}"),
    }
}

/// Build the explanation string and its highlight rows for one breed
pub fn explain(catalog: &Catalog, deltas: &[TraitDelta], limit: usize) -> (String, Vec<TraitHighlight>) {
    let highlights: Vec<TraitHighlight> = best_aligned(deltas, limit)
        .into_iter()
        .map(|delta| {
            let trait_name = &catalog.traits()[delta.index];
            TraitHighlight {
                trait_name: trait_name.clone(),
                text: describe_trait(catalog, trait_name, delta.breed_value),
                user_value: delta.user_value,
                breed_value: delta.breed_value,
                distance: delta.distance,
            }
        })
        .collect();

    let explanation = highlights
        .iter()
        .map(|h| h.text.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    (explanation, highlights)
}
