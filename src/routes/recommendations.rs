use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{infer_preferences, is_off_topic, MatchError, Matcher};
use crate::models::{
    Catalog, ErrorResponse, HealthResponse, IntakeRequest, IntakeResponse, MatchCard,
    RecommendRequest, RecommendResponse, TraitEntry, TraitsResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub matcher: Matcher,
    pub default_top_n: u16,
    pub max_top_n: u16,
}

impl AppState {
    /// Requested count, falling back to the default and capped at the maximum
    fn top_n(&self, requested: Option<u16>) -> usize {
        requested.unwrap_or(self.default_top_n).min(self.max_top_n) as usize
    }
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/traits", web::get().to(list_traits))
        .route("/recommendations", web::post().to(recommend))
        .route("/intake", web::post().to(intake));
}

fn match_error_response(err: &MatchError) -> HttpResponse {
    let (error, status) = match err {
        MatchError::EmptyCatalog => ("empty_catalog", 503),
        MatchError::InvalidPreference(_) => ("invalid_preference", 400),
        MatchError::InvalidArgument(_) => ("invalid_argument", 400),
    };

    let body = ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status,
    };

    if status == 503 {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn validation_error_response(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.catalog.is_empty() { "degraded" } else { "healthy" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        breeds: state.catalog.len(),
        traits: state.catalog.traits().len(),
    })
}

/// Trait listing endpoint
///
/// GET /api/v1/traits
async fn list_traits(state: web::Data<AppState>) -> impl Responder {
    let catalog = &state.catalog;
    let traits = catalog
        .traits()
        .iter()
        .map(|name| TraitEntry {
            name,
            description: catalog.description(name),
        })
        .collect();

    HttpResponse::Ok().json(TraitsResponse {
        scale: catalog.scale(),
        traits,
    })
}

/// Recommendation endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "preferences": {"Energy Level": 4, "Shedding Level": 1},
///   "weights": {"Shedding Level": 2.0},
///   "topN": 3
/// }
/// ```
async fn recommend(state: web::Data<AppState>, req: web::Json<RecommendRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommend request: {:?}", errors);
        return validation_error_response(errors);
    }

    let top_n = state.top_n(req.top_n);
    let preference = req.to_preference();

    tracing::info!(
        "Recommending for {} stated preferences, top_n: {}",
        preference.values.len(),
        top_n
    );

    match state.matcher.recommend(&preference, &state.catalog, top_n) {
        Ok(results) => HttpResponse::Ok().json(RecommendResponse {
            matches: MatchCard::from_results(results),
            total_breeds: state.catalog.len(),
        }),
        Err(e) => {
            tracing::info!("Recommendation rejected: {}", e);
            match_error_response(&e)
        }
    }
}

/// Intake endpoint
///
/// POST /api/v1/intake
///
/// Folds a free-text message into the caller's profile and returns the
/// current top matches. The profile round-trips through the client.
///
/// Request body:
/// ```json
/// {
///   "message": "We have two young kids and I'm allergic",
///   "profile": {"levels": {}, "weights": {}},
///   "topN": 3
/// }
/// ```
async fn intake(state: web::Data<AppState>, req: web::Json<IntakeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for intake request: {:?}", errors);
        return validation_error_response(errors);
    }

    let req = req.into_inner();
    let hints = infer_preferences(&req.message);
    let off_topic = is_off_topic(&req.message, &hints);
    let mut profile = req.profile;
    profile.merge(&hints);

    tracing::debug!("Intake detected {} traits, off topic: {}", hints.levels.len(), off_topic);

    let preference = profile.to_preference(&state.catalog);
    let top_n = state.top_n(req.top_n);

    match state.matcher.recommend(&preference, &state.catalog, top_n) {
        Ok(results) => HttpResponse::Ok().json(IntakeResponse {
            detected: hints.levels.into_keys().collect(),
            off_topic,
            summary: profile.summary(),
            profile,
            matches: MatchCard::from_results(results),
        }),
        Err(e) => {
            tracing::info!("Intake recommendation rejected: {}", e);
            match_error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchingConfig;
    use crate::services::LoaderOptions;
    use actix_web::{test, App};

    fn create_state(breeds: &str) -> AppState {
        let descriptions = "Trait,Description\n\
            Energy Level,Keeps up with an active lifestyle\n\
            Shedding Level,Leaves fur behind\n";
        let catalog = Catalog::from_tables(breeds, descriptions, &LoaderOptions::default()).unwrap();

        AppState {
            catalog: Arc::new(catalog),
            matcher: Matcher::new(MatchingConfig::default()),
            default_top_n: 3,
            max_top_n: 10,
        }
    }

    fn default_breeds() -> &'static str {
        "Breed,Energy Level,Shedding Level\nBeagle,4,3\nPoodle,4,1\nBulldog,1,3\nPug,2,4\n"
    }

    #[actix_web::test]
    async fn test_recommend_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(default_breeds())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(serde_json::json!({
                "preferences": {"Energy Level": 4, "Shedding Level": 1},
                "topN": 2
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["rank"], 1);
        assert_eq!(matches[0]["breed"]["name"], "Poodle");
        assert_eq!(matches[0]["score"], 100);
        assert_eq!(body["totalBreeds"], 4);
    }

    #[actix_web::test]
    async fn test_recommend_rejects_bad_level() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(default_breeds())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(serde_json::json!({"preferences": {"Energy Level": 9}}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_recommend_rejects_zero_top_n() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(default_breeds())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(serde_json::json!({"topN": 0}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_empty_catalog_is_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state("Breed,Energy Level,Shedding Level\n")))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 503);
    }

    #[actix_web::test]
    async fn test_intake_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(default_breeds())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/intake")
            .set_json(serde_json::json!({"message": "I have allergies", "topN": 1}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["detected"], serde_json::json!(["Shedding Level"]));
        assert_eq!(body["offTopic"], false);
        assert_eq!(body["profile"]["levels"]["Shedding Level"], 1);
        assert_eq!(
            body["summary"],
            "Low shedding or hypoallergenic coats are important for you."
        );
        assert_eq!(body["matches"][0]["breed"]["name"], "Poodle");
    }

    #[actix_web::test]
    async fn test_intake_flags_off_topic_message() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(default_breeds())))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/intake")
            .set_json(serde_json::json!({"message": "tell me a joke"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["offTopic"], true);
        assert_eq!(body["detected"], serde_json::json!([]));
        assert!(body["summary"].as_str().unwrap().starts_with("I don't know much yet."));
    }

    #[actix_web::test]
    async fn test_health_and_traits() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(create_state(default_breeds())))
                .configure(configure),
        )
        .await;

        let health: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(health["status"], "healthy");
        assert_eq!(health["breeds"], 4);

        let traits: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/traits").to_request()).await;
        assert_eq!(traits["traits"][0]["name"], "Energy Level");
        assert_eq!(traits["scale"]["max"], 5);
    }
}
