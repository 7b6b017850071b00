// Core algorithm exports
pub mod distance;
pub mod explain;
pub mod intake;
pub mod matcher;
pub mod preferences;
pub mod scoring;

pub use distance::{trait_deltas, trait_distance, TraitDelta};
pub use explain::{describe_trait, explain};
pub use intake::{infer_preferences, is_off_topic, parse_level_answer, PreferenceHints, PreferenceProfile};
pub use matcher::{recommend, MatchError, Matcher, MatchingConfig, DEFAULT_TOP_N};
pub use preferences::{resolve_preferences, ResolvedPreference};
pub use scoring::calculate_match_score;
