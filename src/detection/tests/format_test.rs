use crate::detection::format::{
    confidence_percent, confidence_tier, describe, format_plant_name, search_url, ConfidenceTier,
};
use crate::detection::model::Detection;

#[test]
fn test_format_plant_name() {
    assert_eq!(format_plant_name("aloe_vera"), "Aloe Vera");
    assert_eq!(format_plant_name("Neem-Leaf"), "Neem Leaf");
    assert_eq!(format_plant_name(""), "Unknown Plant");
    assert_eq!(format_plant_name("TULSI"), "Tulsi");
    assert_eq!(format_plant_name("indian_BORAGE-leaf"), "Indian Borage Leaf");
}

#[test]
fn test_format_plant_name_keeps_empty_words() {
    assert_eq!(format_plant_name("curry__leaf"), "Curry  Leaf");
}

#[test]
fn test_confidence_percent() {
    assert_eq!(confidence_percent(0.92), 92);
    assert_eq!(confidence_percent(0.925), 93);
    assert_eq!(confidence_percent(0.0), 0);
    assert_eq!(confidence_percent(1.0), 100);
    assert_eq!(confidence_percent(f64::NAN), 0);
}

#[test]
fn test_confidence_tier() {
    assert_eq!(confidence_tier(76), ConfidenceTier::High);
    assert_eq!(confidence_tier(75), ConfidenceTier::Medium);
    assert_eq!(confidence_tier(41), ConfidenceTier::Medium);
    assert_eq!(confidence_tier(40), ConfidenceTier::Low);
}

#[test]
fn test_search_url() {
    assert_eq!(
        search_url("Aloe Vera"),
        "https://www.google.com/search?q=Aloe+Vera+medicinal+plant"
    );
}

#[test]
fn test_describe() {
    let detection = Detection {
        class: "aloe_vera".to_string(),
        confidence: 0.92,
        class_id: 0,
        bounding_box: None,
    };

    let blurb = describe(&detection);
    assert!(blurb.starts_with("Aloe Vera is a medicinal plant"));
    assert!(blurb.contains("92% confidence"));
}
