use crate::config::Config;
use crate::detection::format::ConfidenceTier;
use crate::image_file::ImageFile;
use crate::leaf_identifier::core::{init, transition, Event, Model};
use crate::leaf_identifier::render::{view, Panel};
use crate::leaf_identifier::tests::fixture::{detection, detection_result};

fn with_result(config: &Config, classes: &[(&str, f64)]) -> Model {
    let file = ImageFile::new("leaf.png", "image/png", vec![7]);
    let (model, _) = init(config);
    let (model, _) = transition(config, model, Event::Submit(file.clone()));
    let (model, _) = transition(
        config,
        model,
        Event::ImageRead {
            submission: 1,
            image: file.encode(),
            size: None,
        },
    );
    let detections = classes.iter().map(|(c, p)| detection(c, *p)).collect();
    let (model, _) = transition(
        config,
        model,
        Event::ClassifyDone {
            submission: 1,
            result: Ok(detection_result(detections)),
        },
    );
    model
}

#[test]
fn test_idle() {
    let config = Config::default();
    let (model, _) = init(&config);
    let view = view(&config, &model);

    assert!(matches!(view.panel, Panel::Empty { .. }));
    assert!(view.uploads_enabled);
    assert!(!view.can_clear);
    assert!(!view.has_preview);
    assert_eq!(view.recent_count, 0);
}

#[test]
fn test_loading_disables_uploads() {
    let config = Config::default();
    let (model, _) = init(&config);
    let (model, _) = transition(
        &config,
        model,
        Event::Submit(ImageFile::new("leaf.png", "image/png", vec![7])),
    );
    let view = view(&config, &model);

    assert_eq!(view.panel, Panel::Loading);
    assert!(!view.uploads_enabled);
    assert!(!view.can_clear);
}

#[test]
fn test_results_collapsed_and_expanded() {
    let config = Config::default();
    let model = with_result(
        &config,
        &[
            ("tulsi", 0.5),
            ("aloe_vera", 0.3),
            ("neem", 0.1),
            ("mint", 0.06),
            ("curry_leaf", 0.04),
        ],
    );

    let Panel::Results { rows, toggle } = view(&config, &model).panel else {
        panic!("expected results");
    };
    assert_eq!(rows.len(), 3);
    assert!(rows[0].best_match && !rows[1].best_match);
    assert_eq!(rows[0].name, "Tulsi");
    assert_eq!(rows[0].percent, 50);
    assert_eq!(rows[0].tier, ConfidenceTier::Medium);
    assert_eq!(rows[2].tier, ConfidenceTier::Low);
    assert_eq!(toggle.as_deref(), Some("Show 2 More"));

    let (model, _) = transition(&config, model, Event::ToggleExpanded);
    let Panel::Results { rows, toggle } = view(&config, &model).panel else {
        panic!("expected results");
    };
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4].name, "Curry Leaf");
    assert_eq!(toggle.as_deref(), Some("Show Less"));
}

#[test]
fn test_no_toggle_with_few_results() {
    let config = Config::default();
    let model = with_result(&config, &[("aloe_vera", 0.92)]);

    let Panel::Results { rows, toggle } = view(&config, &model).panel else {
        panic!("expected results");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tier, ConfidenceTier::High);
    assert_eq!(toggle, None);
}

#[test]
fn test_details() {
    let config = Config::default();
    let model = with_result(&config, &[("aloe_vera", 0.92), ("tulsi", 0.05)]);
    let (model, _) = transition(&config, model, Event::SelectDetection(0));

    let view = view(&config, &model);
    let Panel::Details(details) = view.panel else {
        panic!("expected details");
    };
    assert_eq!(details.name, "Aloe Vera");
    assert_eq!(details.percent, 92);
    assert!(details.description.starts_with("Aloe Vera is a medicinal plant"));
    assert_eq!(
        details.search_url,
        "https://www.google.com/search?q=Aloe+Vera+medicinal+plant"
    );
    assert!(view.can_clear);
}

#[test]
fn test_error() {
    let config = Config::default();
    let model = with_result(&config, &[]);

    let view = view(&config, &model);
    assert_eq!(
        view.panel,
        Panel::Error {
            title: "Detection Error".to_string(),
            message: "No plant species detected in the image".to_string(),
        }
    );
    assert!(view.can_clear);
    assert!(view.has_preview);
    assert_eq!(view.recent_count, 1);
}
