use crate::core::matcher::MatchError;
use crate::models::{Catalog, FillPolicy, UserPreference};

/// A preference vector aligned with the catalog's trait order
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPreference {
    pub values: Vec<u8>,
    pub weights: Vec<f64>,
}

/// Validate a preference vector against the catalog and fill in gaps
///
/// Every catalog trait ends up with a value: missing ones take the scale
/// midpoint under [`FillPolicy::Midpoint`] and are rejected under
/// [`FillPolicy::Reject`]. Unknown traits, out-of-range levels and weights
/// that are negative or not finite are rejected.
pub fn resolve_preferences(
    preference: &UserPreference,
    catalog: &Catalog,
    policy: FillPolicy,
) -> Result<ResolvedPreference, MatchError> {
    let scale = catalog.scale();

    if let Some(unknown) = preference.values.keys().find(|t| !catalog.has_trait(t)) {
        return Err(MatchError::InvalidPreference(format!(
            "unknown trait '{unknown}'"
        )));
    }

    if let Some(unknown) = preference.weights.keys().find(|t| !catalog.has_trait(t)) {
        return Err(MatchError::InvalidPreference(format!(
            "weight given for unknown trait '{unknown}'"
        )));
    }

    let mut values = Vec::with_capacity(catalog.traits().len());
    let mut weights = Vec::with_capacity(catalog.traits().len());

    for name in catalog.traits() {
        let value = match (preference.values.get(name), policy) {
            (Some(&value), _) if scale.contains(value) => value,
            (Some(&value), _) => {
                return Err(MatchError::InvalidPreference(format!(
                    "'{name}' must be between {} and {}, got {value}",
                    scale.min, scale.max
                )));
            }
            (None, FillPolicy::Midpoint) => scale.midpoint(),
            (None, FillPolicy::Reject) => {
                return Err(MatchError::InvalidPreference(format!(
                    "missing value for trait '{name}'"
                )));
            }
        };

        let weight = preference.weight(name);
        if !weight.is_finite() || weight < 0.0 {
            return Err(MatchError::InvalidPreference(format!(
                "weight for '{name}' must be a non-negative number, got {weight}"
            )));
        }

        values.push(value);
        weights.push(weight);
    }

    Ok(ResolvedPreference { values, weights })
}
