// Integration tests for Breed Match

use breed_match::core::{infer_preferences, recommend, MatchError, Matcher, MatchingConfig, PreferenceProfile};
use breed_match::models::{Catalog, FillPolicy, UserPreference};
use breed_match::services::{LoaderOptions, SchemaError};
use std::path::PathBuf;

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn load_shipped_catalog() -> Catalog {
    Catalog::load_from_files(
        &data_path("breed_traits.csv"),
        &data_path("trait_description.csv"),
        &LoaderOptions::default(),
    )
    .expect("shipped catalog should load")
}

fn create_test_catalog(breeds: &str) -> Catalog {
    let descriptions = "Trait,Description\n\
        activity,Great for an active lifestyle\n\
        shedding,Leaves fur around the house\n";
    Catalog::from_tables(breeds, descriptions, &LoaderOptions::default()).unwrap()
}

fn preference_for(catalog: &Catalog, breed: &str) -> UserPreference {
    let profile = catalog.breed(breed).unwrap();
    profile
        .traits
        .iter()
        .fold(UserPreference::new(), |prefs, (t, v)| prefs.with(t.as_str(), *v))
}

#[test]
fn test_shipped_catalog_shape() {
    let catalog = load_shipped_catalog();

    assert_eq!(catalog.len(), 16);
    assert_eq!(catalog.traits().len(), 14);
    assert!(!catalog.has_trait("Coat Type"));
    assert_eq!(catalog.traits()[0], "Affectionate With Family");
}

#[test]
fn test_result_count_and_ordering() {
    let catalog = load_shipped_catalog();
    let prefs = UserPreference::new()
        .with("Energy Level", 2)
        .with("Shedding Level", 1)
        .with("Barking Level", 2);

    for top_n in [1, 3, 16, 40] {
        let results = recommend(&prefs, &catalog, top_n).unwrap();
        assert_eq!(results.len(), top_n.min(catalog.len()));

        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score, "Matches not sorted by score");
            if pair[0].score == pair[1].score {
                assert!(pair[0].breed.name < pair[1].breed.name, "Ties not sorted by name");
            }
        }

        for m in &results {
            assert!(m.score <= 100);
            assert!(!m.explanation.is_empty());
            assert!(!m.highlights.is_empty() && m.highlights.len() <= 3);
        }
    }
}

#[test]
fn test_recommend_is_deterministic() {
    let catalog = load_shipped_catalog();
    let prefs = UserPreference::new()
        .with("Good With Young Children", 5)
        .with("Trainability Level", 5)
        .with_weight("Good With Young Children", 2.0);

    let first = serde_json::to_string(&recommend(&prefs, &catalog, 5).unwrap()).unwrap();
    let second = serde_json::to_string(&recommend(&prefs, &catalog, 5).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_identical_breed_scores_100() {
    let catalog = load_shipped_catalog();
    let prefs = preference_for(&catalog, "Retrievers (Labrador)");

    let results = recommend(&prefs, &catalog, 1).unwrap();

    assert_eq!(results[0].breed.name, "Retrievers (Labrador)");
    assert_eq!(results[0].score, 100);
    assert_eq!(results[0].total_distance, 0.0);
}

#[test]
fn test_two_breed_scenario() {
    let catalog = create_test_catalog("Breed,activity,shedding\nBreed A,5,1\nBreed B,1,5\n");
    let prefs = UserPreference::new().with("activity", 5).with("shedding", 1);

    let all = recommend(&prefs, &catalog, 2).unwrap();
    assert_eq!((all[0].breed.name.as_str(), all[0].score), ("Breed A", 100));
    assert_eq!((all[1].breed.name.as_str(), all[1].score), ("Breed B", 0));

    let top = recommend(&prefs, &catalog, 1).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].breed.name, "Breed A");
    assert_eq!(
        top[0].explanation,
        "Great for an active lifestyle (activity: 5/5); Leaves fur around the house (shedding: 1/5)"
    );
}

#[test]
fn test_equal_scores_sorted_by_name() {
    let catalog = create_test_catalog("Breed,activity,shedding\nWhippet,4,2\nBasenji,2,4\nAkita,3,3\n");
    let prefs = UserPreference::new().with("activity", 3).with("shedding", 3);

    let names: Vec<String> = recommend(&prefs, &catalog, 3)
        .unwrap()
        .into_iter()
        .map(|m| m.breed.name.clone())
        .collect();

    // Akita is exact; Basenji and Whippet tie at 75
    assert_eq!(names, vec!["Akita", "Basenji", "Whippet"]);
}

#[test]
fn test_loader_rejects_out_of_range_values() {
    for bad in ["0", "6"] {
        let breeds = format!("Breed,activity,shedding\nMutt,{bad},3\n");
        let err = Catalog::from_tables(
            &breeds,
            "Trait,Description\nactivity,a\nshedding,b\n",
            &LoaderOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, SchemaError::ValueOutOfRange { .. }));
    }
}

#[test]
fn test_empty_catalog_regardless_of_preferences() {
    let catalog = create_test_catalog("Breed,activity,shedding\n");

    for prefs in [
        UserPreference::new(),
        UserPreference::new().with("activity", 5),
        UserPreference::new().with("unknown", 42),
    ] {
        assert_eq!(recommend(&prefs, &catalog, 3).unwrap_err(), MatchError::EmptyCatalog);
    }
}

#[test]
fn test_fill_policies() {
    let catalog = create_test_catalog("Breed,activity,shedding\nBreed A,5,3\nBreed B,1,5\n");
    let partial = UserPreference::new().with("activity", 5);

    let filled = recommend(&partial, &catalog, 1).unwrap();
    assert_eq!(filled[0].breed.name, "Breed A");
    assert_eq!(filled[0].score, 100);

    let strict = Matcher::new(MatchingConfig {
        missing_preferences: FillPolicy::Reject,
        ..MatchingConfig::default()
    });
    assert!(matches!(
        strict.recommend(&partial, &catalog, 1),
        Err(MatchError::InvalidPreference(_))
    ));
}

#[test]
fn test_intake_to_recommendation() {
    let catalog = load_shipped_catalog();

    let mut profile = PreferenceProfile::default();
    profile.merge(&infer_preferences("We have young kids"));
    profile.merge(&infer_preferences("and my partner has allergies"));

    let preference = profile.to_preference(&catalog);
    let names: Vec<String> = recommend(&preference, &catalog, 2)
        .unwrap()
        .into_iter()
        .map(|m| m.breed.name.clone())
        .collect();

    assert_eq!(names, vec!["Poodles", "Shih Tzu"]);
}

#[test]
fn test_derived_images() {
    let catalog = load_shipped_catalog();

    let cirneco = catalog.breed("Cirnechi dell\u{2019}Etna").unwrap();
    assert!(cirneco.image.ends_with("/Cirnechi_dell_Etna/Cirnechi_dell_Etna_1.jpg"));

    let lab = catalog.breed("Retrievers (Labrador)").unwrap();
    assert!(lab.image.ends_with("/Retrievers_Labrador/Retrievers_Labrador_1.jpg"));
}
