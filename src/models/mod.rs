// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BreedProfile, Catalog, FillPolicy, MatchResult, OrdinalScale, TraitDescription,
    TraitHighlight, UserPreference,
};
pub use requests::{IntakeRequest, RecommendRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchCard, IntakeResponse, RecommendResponse, TraitEntry, TraitsResponse};
