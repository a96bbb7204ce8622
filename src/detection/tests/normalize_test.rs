use crate::detection::model::{BoundingBox, ImageSize};
use crate::detection::normalize::{normalize, normalize_str, NormalizeError};
use serde_json::json;

fn classification_envelope() -> serde_json::Value {
    json!({
        "outputs": [{
            "model": "leaf-classifier/3",
            "classification_predictions": {
                "top": "aloe_vera",
                "confidence": 0.92,
                "time": 0.041,
                "predictions": [
                    {"class": "aloe_vera", "confidence": 0.92, "class_id": 4},
                    {"class": "tulsi", "confidence": 0.05},
                    {"class": "neem", "confidence": 0.03, "class_id": 9}
                ],
                "image": {"width": 640, "height": 480}
            }
        }],
        "version": "2.1"
    })
}

#[test]
fn test_classification_shape() {
    let result = normalize(classification_envelope()).unwrap();

    assert_eq!(result.status, "success");
    assert_eq!(result.model, "leaf-classifier/3");
    assert_eq!(result.version, "2.1");
    assert_eq!(result.time, 0.041);
    assert_eq!(result.prediction.top, "aloe_vera");
    assert_eq!(result.prediction.confidence, 0.92);
    assert_eq!(
        result.prediction.image,
        ImageSize {
            width: 640,
            height: 480
        }
    );

    let detections = &result.prediction.detections;
    assert_eq!(detections.len(), 3);
    assert_eq!(detections[0].class, "aloe_vera");
    assert_eq!(detections[0].confidence, 0.92);
    assert_eq!(detections[0].class_id, 4);
    assert_eq!(detections[1].confidence, 0.05);
    assert_eq!(detections[1].class_id, 0);
    assert_eq!(detections[2].class_id, 9);
    assert!(detections.iter().all(|d| d.bounding_box.is_none()));
}

#[test]
fn test_classification_defaults() {
    let result = normalize(json!({
        "outputs": [{
            "classification_predictions": {
                "predictions": [{"class": "mint", "confidence": 0.4}]
            }
        }]
    }))
    .unwrap();

    assert_eq!(result.model, "unknown");
    assert_eq!(result.version, "1.0");
    assert_eq!(result.time, 0.0);
    assert_eq!(result.prediction.top, "");
    assert_eq!(result.prediction.confidence, 0.0);
    assert_eq!(result.prediction.image, ImageSize::default());
    assert_eq!(result.prediction.detections.len(), 1);
}

#[test]
fn test_detection_shape() {
    let result = normalize(json!({
        "outputs": [{
            "top_class": "neem",
            "model": "leaf-detector",
            "detection_predictions": {
                "image": {"width": 1024, "height": 768},
                "predictions": [
                    {"class": "neem", "confidence": 0.71, "class_id": 2,
                     "x": 10.0, "y": 20.0, "width": 30.0, "height": 40.0},
                    {"class": "tulsi", "confidence": 0.88, "class_id": 5,
                     "x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}
                ]
            }
        }],
        "version": 3
    }))
    .unwrap();

    assert_eq!(result.prediction.top, "neem");
    assert_eq!(result.prediction.confidence, 0.71);
    assert_eq!(result.model, "leaf-detector");
    assert_eq!(result.version, "3");
    assert_eq!(result.prediction.detections.len(), 2);
    assert_eq!(
        result.prediction.detections[0].bounding_box,
        Some(BoundingBox {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0
        })
    );
    // passed through as delivered, ranking happens later
    assert_eq!(result.prediction.detections[1].class, "tulsi");
}

#[test]
fn test_detection_shape_without_predictions() {
    let result = normalize(json!({
        "outputs": [{"detection_predictions": {"predictions": []}}]
    }))
    .unwrap();

    assert_eq!(result.prediction.confidence, 0.0);
    assert!(result.prediction.detections.is_empty());
}

#[test]
fn test_null_predictions_are_empty() {
    for shape in ["classification_predictions", "detection_predictions"] {
        let result = normalize(json!({
            "outputs": [{ shape: {"predictions": null, "top": "neem"} }]
        }))
        .unwrap();

        assert_eq!(result.status, "success");
        assert!(result.prediction.detections.is_empty(), "{}", shape);
    }
}

#[test]
fn test_classification_preferred_over_detection() {
    let result = normalize(json!({
        "outputs": [{
            "top_class": "neem",
            "classification_predictions": {
                "top": "tulsi",
                "predictions": [{"class": "tulsi", "confidence": 0.6}]
            },
            "detection_predictions": {"predictions": []}
        }]
    }))
    .unwrap();

    assert_eq!(result.prediction.top, "tulsi");
}

#[test]
fn test_unrecognized_shape() {
    let error = normalize(json!({"outputs": [{"model": "x", "something_else": {}}]})).unwrap_err();
    assert!(matches!(error, NormalizeError::InvalidResponseFormat(_)));
}

#[test]
fn test_missing_or_empty_outputs() {
    for envelope in [json!({}), json!({"outputs": []}), json!({"outputs": null})] {
        assert!(matches!(
            normalize(envelope),
            Err(NormalizeError::InvalidResponseFormat(_))
        ));
    }
}

#[test]
fn test_prediction_without_class_or_confidence_is_rejected() {
    let missing_class = json!({
        "outputs": [{"classification_predictions": {"predictions": [{"confidence": 0.5}]}}]
    });
    let missing_confidence = json!({
        "outputs": [{"classification_predictions": {"predictions": [{"class": "neem"}]}}]
    });
    let out_of_range = json!({
        "outputs": [{"detection_predictions": {"predictions": [{"class": "neem", "confidence": 1.5}]}}]
    });

    assert!(normalize(missing_class).is_err());
    assert!(normalize(missing_confidence).is_err());
    assert!(normalize(out_of_range).is_err());
}

#[test]
fn test_normalize_str_rejects_non_json() {
    assert!(matches!(
        normalize_str("<html>gateway timeout</html>"),
        Err(NormalizeError::InvalidResponseFormat(_))
    ));
    assert!(normalize_str(&classification_envelope().to_string()).is_ok());
}
