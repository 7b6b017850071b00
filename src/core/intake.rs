//! Keyword-based preference intake.
//!
//! Maps a free-text message onto trait levels and importance weights with
//! plain substring lookups. There is no conversation state here: callers keep
//! a [`PreferenceProfile`] and merge each message's [`PreferenceHints`] into it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Catalog, UserPreference};

/// Weight a trait starts from before a hint raises it
pub const BASE_WEIGHT: f64 = 0.6;

pub const ENERGY_LEVEL: &str = "Energy Level";
pub const YOUNG_CHILDREN: &str = "Good With Young Children";
pub const OTHER_DOGS: &str = "Good With Other Dogs";
pub const SHEDDING_LEVEL: &str = "Shedding Level";
pub const BARKING_LEVEL: &str = "Barking Level";
pub const WATCHDOG: &str = "Watchdog/Protective Nature";
pub const TRAINABILITY: &str = "Trainability Level";
pub const AFFECTION: &str = "Affectionate With Family";

struct Rule {
    keywords: &'static [&'static str],
    level: u8,
    weight: f64,
}

#[derive(Clone, Copy)]
enum Resolve {
    /// The earliest matching rule wins
    First,
    /// Later matching rules override earlier ones
    Last,
}

struct Family {
    trait_name: &'static str,
    resolve: Resolve,
    rules: &'static [Rule],
}

const FAMILIES: &[Family] = &[
    Family {
        trait_name: ENERGY_LEVEL,
        resolve: Resolve::First,
        rules: &[
            Rule { keywords: &["very active", "marathon", "trail run", "high energy"], level: 5, weight: 1.0 },
            Rule { keywords: &["active", "jog", "run", "hike", "gym"], level: 4, weight: 0.9 },
            Rule { keywords: &["medium energy", "moderate energy"], level: 3, weight: 0.8 },
            Rule { keywords: &["low energy", "couch", "relaxed", "apartment"], level: 2, weight: 0.9 },
            Rule { keywords: &["very calm", "really calm", "sedentary"], level: 1, weight: 1.0 },
        ],
    },
    Family {
        trait_name: YOUNG_CHILDREN,
        resolve: Resolve::Last,
        rules: &[
            Rule { keywords: &["kids", "children", "family", "toddler", "baby"], level: 5, weight: 1.0 },
            Rule { keywords: &["no kids", "no children"], level: 3, weight: 0.5 },
        ],
    },
    Family {
        trait_name: OTHER_DOGS,
        resolve: Resolve::First,
        rules: &[Rule {
            keywords: &["other dog", "other dogs", "dog park", "play with dogs"],
            level: 5,
            weight: 0.9,
        }],
    },
    Family {
        trait_name: SHEDDING_LEVEL,
        resolve: Resolve::First,
        rules: &[
            Rule { keywords: &["allergy", "allergies", "allergic", "hypoallergenic"], level: 1, weight: 1.0 },
            Rule { keywords: &["okay with shedding", "dont mind fur", "don't mind fur"], level: 4, weight: 0.7 },
        ],
    },
    Family {
        trait_name: BARKING_LEVEL,
        resolve: Resolve::First,
        rules: &[Rule {
            keywords: &["quiet", "noise sensitive", "thin walls", "no barking"],
            level: 2,
            weight: 0.9,
        }],
    },
    Family {
        trait_name: WATCHDOG,
        resolve: Resolve::First,
        rules: &[Rule { keywords: &["guard dog", "watchdog", "protective"], level: 5, weight: 0.8 }],
    },
    Family {
        trait_name: TRAINABILITY,
        resolve: Resolve::Last,
        rules: &[
            Rule { keywords: &["first dog", "new owner", "beginner"], level: 5, weight: 0.9 },
            Rule {
                keywords: &["experienced owner", "i've had many dogs", "ive had many dogs"],
                level: 3,
                weight: 0.5,
            },
        ],
    },
    Family {
        trait_name: AFFECTION,
        resolve: Resolve::Last,
        rules: &[
            Rule { keywords: &["very affectionate", "cuddly", "lap dog"], level: 5, weight: 0.9 },
            Rule { keywords: &["independent", "not clingy", "more independent"], level: 3, weight: 0.7 },
        ],
    },
];

/// Words that keep a message on topic even when no rule fired
const DOG_WORDS: &[&str] = &[
    "dog", "breed", "puppy", "puppies", "pet", "canine", "walk", "leash", "bark", "coat", "fur",
];

const EMPTY_SUMMARY: &str = "I don't know much yet. Tell me about your activity level, \
    living situation, allergies, or whether you have kids.";

/// Summary sentences per trait for low (1-2), middle (3) and high (4-5) levels
const SUMMARIES: &[(&str, [&str; 3])] = &[
    (
        ENERGY_LEVEL,
        [
            "You prefer a calmer, lower-energy dog.",
            "You're okay with a medium-energy dog.",
            "You'd like a high-energy, active dog.",
        ],
    ),
    (
        SHEDDING_LEVEL,
        [
            "Low shedding or hypoallergenic coats are important for you.",
            "You're flexible about shedding and allergies.",
            "You're flexible about shedding and allergies.",
        ],
    ),
    (
        YOUNG_CHILDREN,
        [
            "Kid-friendliness is less critical for you.",
            "Kid-friendliness is less critical for you.",
            "Being good with young children is important.",
        ],
    ),
    (
        OTHER_DOGS,
        [
            "Getting along with other dogs is not a priority.",
            "Getting along with other dogs is not a priority.",
            "Your dog should get along with other dogs.",
        ],
    ),
    (
        BARKING_LEVEL,
        [
            "A quiet dog suits your home.",
            "Some barking is fine with you.",
            "Some barking is fine with you.",
        ],
    ),
    (
        WATCHDOG,
        [
            "You don't need a guard dog.",
            "You don't need a guard dog.",
            "You'd like a protective watchdog.",
        ],
    ),
    (
        TRAINABILITY,
        [
            "You're comfortable with a more stubborn learner.",
            "You're comfortable with a more stubborn learner.",
            "An easy-to-train dog matters to you.",
        ],
    ),
    (
        AFFECTION,
        [
            "You're fine with a more independent dog.",
            "You're fine with a more independent dog.",
            "You'd like an affectionate, cuddly companion.",
        ],
    ),
];

/// Trait levels and weights picked up from a single message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceHints {
    pub levels: BTreeMap<String, u8>,
    pub weights: BTreeMap<String, f64>,
}

impl PreferenceHints {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Infer trait preferences and weights from a single message
pub fn infer_preferences(message: &str) -> PreferenceHints {
    let text = message.to_lowercase();
    let mut hints = PreferenceHints::default();

    for family in FAMILIES {
        let mut matching = family
            .rules
            .iter()
            .filter(|rule| rule.keywords.iter().any(|k| text.contains(k)));

        let hit = match family.resolve {
            Resolve::First => matching.next(),
            Resolve::Last => matching.last(),
        };

        if let Some(rule) = hit {
            hints.levels.insert(family.trait_name.to_string(), rule.level);
            hints.weights.insert(family.trait_name.to_string(), rule.weight);
        }
    }

    hints
}

/// Whether a message has nothing to do with choosing a dog
///
/// `hints` are the ones inferred from this same message.
pub fn is_off_topic(message: &str, hints: &PreferenceHints) -> bool {
    if !hints.is_empty() {
        return false;
    }

    let text = message.to_lowercase();
    !DOG_WORDS.iter().any(|w| text.contains(w))
}

/// Convert a short answer like "low", "High" or "4" into a level from 1 to 5
///
/// Anything unrecognised, including an empty answer, maps to the middle.
pub fn parse_level_answer(text: &str) -> u8 {
    let text = text.trim().to_lowercase();

    if let Some(digit) = text.chars().next().and_then(|c| c.to_digit(10)) {
        return digit.clamp(1, 5) as u8;
    }

    if text.contains("low") {
        1
    } else if text.contains("high") {
        5
    } else {
        3
    }
}

/// Preferences accumulated across messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub levels: BTreeMap<String, u8>,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl PreferenceProfile {
    /// Fold a message's hints in: levels overwrite, weights only ever rise
    pub fn merge(&mut self, hints: &PreferenceHints) {
        for (trait_name, level) in &hints.levels {
            self.levels.insert(trait_name.clone(), *level);
        }

        for (trait_name, weight) in &hints.weights {
            let current = self.weights.get(trait_name).copied().unwrap_or(BASE_WEIGHT);
            self.weights.insert(trait_name.clone(), current.max(*weight));
        }
    }

    /// Readable recap of what the profile knows so far
    pub fn summary(&self) -> String {
        let parts: Vec<&str> = SUMMARIES
            .iter()
            .filter_map(|(trait_name, texts)| {
                self.levels.get(*trait_name).map(|level| match level {
                    0..=2 => texts[0],
                    3 => texts[1],
                    _ => texts[2],
                })
            })
            .collect();

        if parts.is_empty() {
            EMPTY_SUMMARY.to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Build a preference vector for the catalog
    ///
    /// Traits the catalog does not know are dropped. Catalog traits never
    /// mentioned get zero weight so they do not move the score.
    pub fn to_preference(&self, catalog: &Catalog) -> UserPreference {
        let mut preference = UserPreference::new();

        for trait_name in catalog.traits() {
            match self.levels.get(trait_name) {
                Some(level) => {
                    let weight = self.weights.get(trait_name).copied().unwrap_or(BASE_WEIGHT);
                    preference.values.insert(trait_name.clone(), *level);
                    preference.weights.insert(trait_name.clone(), weight);
                }
                None => {
                    preference.weights.insert(trait_name.clone(), 0.0);
                }
            }
        }

        for dropped in self.levels.keys().filter(|t| !catalog.has_trait(t)) {
            tracing::debug!("Dropping profile trait '{}' not present in catalog", dropped);
        }

        preference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LoaderOptions;

    #[test]
    fn test_energy_first_rule_wins() {
        let hints = infer_preferences("I'm very active and run every day");

        assert_eq!(hints.levels[ENERGY_LEVEL], 5);
        assert_eq!(hints.weights[ENERGY_LEVEL], 1.0);
    }

    #[test]
    fn test_apartment_means_lower_energy() {
        let hints = infer_preferences("I live in an apartment");

        assert_eq!(hints.levels[ENERGY_LEVEL], 2);
    }

    #[test]
    fn test_no_kids_overrides_kids() {
        let hints = infer_preferences("No kids at home");

        assert_eq!(hints.levels[YOUNG_CHILDREN], 3);
        assert_eq!(hints.weights[YOUNG_CHILDREN], 0.5);
    }

    #[test]
    fn test_allergies_prefer_low_shedding() {
        let hints = infer_preferences("My partner has allergies and we have thin walls");

        assert_eq!(hints.levels[SHEDDING_LEVEL], 1);
        assert_eq!(hints.levels[BARKING_LEVEL], 2);
    }

    #[test]
    fn test_off_topic_message_yields_nothing() {
        assert!(infer_preferences("what's the weather like?").is_empty());
    }

    #[test]
    fn test_off_topic_detection() {
        let weather = "what's the weather like?";
        assert!(is_off_topic(weather, &infer_preferences(weather)));

        let walks = "How long are the walks?";
        assert!(!is_off_topic(walks, &infer_preferences(walks)));

        let kids = "We have kids";
        assert!(!is_off_topic(kids, &infer_preferences(kids)));
    }

    #[test]
    fn test_summary() {
        assert!(PreferenceProfile::default().summary().starts_with("I don't know much yet."));

        let mut profile = PreferenceProfile::default();
        profile.merge(&infer_preferences("couch potato with allergies and two kids"));

        assert_eq!(
            profile.summary(),
            "You prefer a calmer, lower-energy dog. \
             Low shedding or hypoallergenic coats are important for you. \
             Being good with young children is important."
        );
    }

    #[test]
    fn test_parse_level_answer() {
        assert_eq!(parse_level_answer("Low"), 1);
        assert_eq!(parse_level_answer("  HIGH please"), 5);
        assert_eq!(parse_level_answer("medium"), 3);
        assert_eq!(parse_level_answer("4 I think"), 4);
        assert_eq!(parse_level_answer("9"), 5);
        assert_eq!(parse_level_answer("0"), 1);
        assert_eq!(parse_level_answer(""), 3);
        assert_eq!(parse_level_answer("no idea"), 3);
    }

    #[test]
    fn test_merge_keeps_max_weight() {
        let mut profile = PreferenceProfile::default();
        profile.merge(&infer_preferences("I'm a beginner"));
        profile.merge(&infer_preferences("I'm an experienced owner"));

        assert_eq!(profile.levels[TRAINABILITY], 3);
        assert_eq!(profile.weights[TRAINABILITY], 0.9);
    }

    #[test]
    fn test_merge_raises_low_weight_to_base() {
        let mut profile = PreferenceProfile::default();
        profile.merge(&infer_preferences("no kids"));

        assert_eq!(profile.weights[YOUNG_CHILDREN], BASE_WEIGHT);
    }

    #[test]
    fn test_to_preference_zero_weights_unmentioned_traits() {
        let breeds = "Breed,Energy Level,Drooling Level\nPug,2,1\n";
        let descriptions = "Trait,Description\nEnergy Level,Energy\nDrooling Level,Drool\n";
        let catalog = Catalog::from_tables(breeds, descriptions, &LoaderOptions::default()).unwrap();

        let mut profile = PreferenceProfile::default();
        profile.merge(&infer_preferences("couch potato who wants a guard dog"));

        let preference = profile.to_preference(&catalog);

        assert_eq!(preference.values.get(ENERGY_LEVEL), Some(&2));
        assert!(!preference.values.contains_key(WATCHDOG));
        assert_eq!(preference.weight("Drooling Level"), 0.0);
    }
}
