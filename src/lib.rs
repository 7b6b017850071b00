//! Breed Match - preference-based dog breed recommendations
//!
//! This library scores a catalog of dog breeds against a user's desired trait
//! levels and returns the closest breeds with short explanations. The catalog
//! is loaded once from two delimited tables and then shared read-only.
//!
//! ```rust,no_run
//! use breed_match::{recommend, Catalog, LoaderOptions, UserPreference};
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_files(
//!     Path::new("data/breed_traits.csv"),
//!     Path::new("data/trait_description.csv"),
//!     &LoaderOptions::default(),
//! )
//! .unwrap();
//!
//! let prefs = UserPreference::new().with("Energy Level", 4).with("Shedding Level", 1);
//! for m in recommend(&prefs, &catalog, 3).unwrap() {
//!     println!("{} ({}): {}", m.breed.name, m.score, m.explanation);
//! }
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{infer_preferences, recommend, MatchError, Matcher, MatchingConfig, PreferenceProfile};
pub use models::{BreedProfile, Catalog, FillPolicy, MatchResult, OrdinalScale, TraitDescription, UserPreference};
pub use services::{LoaderOptions, SchemaError};
