use crate::core::preferences::ResolvedPreference;
use crate::models::{BreedProfile, OrdinalScale};

/// Gap between a desired and an actual level on one trait
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitDelta {
    /// Position of the trait in catalog order
    pub index: usize,
    pub user_value: u8,
    pub breed_value: u8,
    pub distance: u8,
    pub weight: f64,
}

impl TraitDelta {
    #[inline]
    pub fn weighted(&self) -> f64 {
        self.distance as f64 * self.weight
    }
}

/// Absolute distance between two ordinal levels
#[inline]
pub fn trait_distance(user_value: u8, breed_value: u8) -> u8 {
    user_value.abs_diff(breed_value)
}

/// Calculate per-trait deltas for one breed, in catalog trait order
///
/// A breed missing a trait (only possible for hand-built profiles) is read
/// at the scale midpoint.
pub fn trait_deltas(
    traits: &[String],
    preference: &ResolvedPreference,
    breed: &BreedProfile,
    scale: OrdinalScale,
) -> Vec<TraitDelta> {
    traits
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let user_value = preference.values[index];
            let breed_value = breed.trait_value(name).unwrap_or_else(|| scale.midpoint());

            TraitDelta {
                index,
                user_value,
                breed_value,
                distance: trait_distance(user_value, breed_value),
                weight: preference.weights[index],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn breed(values: &[(&str, u8)]) -> BreedProfile {
        BreedProfile {
            name: "Test Breed".to_string(),
            traits: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            image: String::new(),
        }
    }

    #[test]
    fn test_trait_distance_symmetric() {
        assert_eq!(trait_distance(5, 1), 4);
        assert_eq!(trait_distance(1, 5), 4);
        assert_eq!(trait_distance(3, 3), 0);
    }

    #[test]
    fn test_trait_deltas_follow_catalog_order() {
        let traits = vec!["activity".to_string(), "shedding".to_string()];
        let preference = ResolvedPreference {
            values: vec![5, 1],
            weights: vec![1.0, 2.0],
        };
        let profile = breed(&[("shedding", 4), ("activity", 2)]);

        let deltas = trait_deltas(&traits, &preference, &profile, OrdinalScale::default());

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].index, 0);
        assert_eq!(deltas[0].distance, 3);
        assert_eq!(deltas[1].breed_value, 4);
        assert_eq!(deltas[1].weighted(), 6.0);
    }

    #[test]
    fn test_missing_breed_trait_reads_midpoint() {
        let traits = vec!["activity".to_string()];
        let preference = ResolvedPreference {
            values: vec![5],
            weights: vec![1.0],
        };

        let deltas = trait_deltas(&traits, &preference, &breed(&[]), OrdinalScale::default());

        assert_eq!(deltas[0].breed_value, 3);
        assert_eq!(deltas[0].distance, 2);
    }
}
