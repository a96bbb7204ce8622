use super::envelope::{PredictionShape, RawEnvelope, RawPrediction};
use super::model::{BoundingBox, Detection, DetectionResult, PlantPrediction};

pub const STATUS_SUCCESS: &str = "success";
pub const UNKNOWN_MODEL: &str = "unknown";
pub const DEFAULT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("invalid response format from detection API: {0}")]
    InvalidResponseFormat(String),
}

pub fn normalize_str(body: &str) -> Result<DetectionResult, NormalizeError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| NormalizeError::InvalidResponseFormat(format!("body is not JSON: {}", e)))?;
    normalize(value)
}

/// Turns a raw classification service envelope into a [`DetectionResult`].
///
/// Envelope metadata falls back to defaults when absent, but every
/// prediction must carry a non-empty `class` and a `confidence` in `[0, 1]`.
pub fn normalize(value: serde_json::Value) -> Result<DetectionResult, NormalizeError> {
    let mut envelope: RawEnvelope = serde_json::from_value(value)
        .map_err(|e| NormalizeError::InvalidResponseFormat(e.to_string()))?;

    let version = envelope
        .version_label()
        .unwrap_or_else(|| DEFAULT_VERSION.to_string());
    let (model, shape) = envelope.first_output()?.into_shape()?;

    let (prediction, time) = match shape {
        PredictionShape::Classification(classification) => {
            let detections = classification
                .predictions
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(to_detection)
                .collect::<Result<Vec<_>, _>>()?;
            (
                PlantPrediction {
                    top: classification.top.unwrap_or_default(),
                    confidence: classification.confidence.unwrap_or(0.0),
                    detections,
                    image: classification.image.unwrap_or_default(),
                },
                classification.time.unwrap_or(0.0),
            )
        }
        PredictionShape::Detection { top_class, payload } => {
            let detections = payload
                .predictions
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(to_detection)
                .collect::<Result<Vec<_>, _>>()?;
            let confidence = detections.first().map_or(0.0, |d| d.confidence);
            (
                PlantPrediction {
                    top: top_class.unwrap_or_default(),
                    confidence,
                    detections,
                    image: payload.image.unwrap_or_default(),
                },
                payload.time.unwrap_or(0.0),
            )
        }
    };

    Ok(DetectionResult {
        prediction,
        status: STATUS_SUCCESS.to_string(),
        time,
        model: model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| UNKNOWN_MODEL.to_string()),
        version,
    })
}

fn to_detection(raw: &RawPrediction) -> Result<Detection, NormalizeError> {
    let class = match raw.class.as_deref() {
        Some(class) if !class.trim().is_empty() => class.to_string(),
        _ => {
            return Err(NormalizeError::InvalidResponseFormat(
                "prediction without a class".to_string(),
            ))
        }
    };

    let confidence = raw.confidence.ok_or_else(|| {
        NormalizeError::InvalidResponseFormat(format!("prediction {} has no confidence", class))
    })?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err(NormalizeError::InvalidResponseFormat(format!(
            "prediction {} has confidence {} outside [0, 1]",
            class, confidence
        )));
    }

    let bounding_box = match (raw.x, raw.y, raw.width, raw.height) {
        (Some(x), Some(y), Some(width), Some(height)) => Some(BoundingBox {
            x,
            y,
            width,
            height,
        }),
        _ => None,
    };

    Ok(Detection {
        class,
        confidence,
        class_id: raw.class_id.unwrap_or(0),
        bounding_box,
    })
}
