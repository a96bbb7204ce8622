//! Wire shapes of the classification service response.
//!
//! Field presence decides which payload an output carries, so the raw
//! structs keep everything optional and [`RawOutput::into_shape`] turns them
//! into a [`PredictionShape`] that the normalizer matches exhaustively.

use super::model::ImageSize;
use super::normalize::NormalizeError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvelope {
    pub outputs: Option<Vec<RawOutput>>,
    pub version: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOutput {
    pub model: Option<String>,
    pub top_class: Option<String>,
    pub classification_predictions: Option<RawClassification>,
    pub detection_predictions: Option<RawDetections>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawClassification {
    pub top: Option<String>,
    pub confidence: Option<f64>,
    /// Absent and `null` both mean no predictions.
    pub predictions: Option<Vec<RawPrediction>>,
    pub image: Option<ImageSize>,
    pub time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDetections {
    pub predictions: Option<Vec<RawPrediction>>,
    pub image: Option<ImageSize>,
    pub time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPrediction {
    pub class: Option<String>,
    pub confidence: Option<f64>,
    pub class_id: Option<u32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone)]
pub enum PredictionShape {
    Classification(RawClassification),
    Detection {
        top_class: Option<String>,
        payload: RawDetections,
    },
}

impl RawEnvelope {
    pub fn version_label(&self) -> Option<String> {
        match &self.version {
            Some(serde_json::Value::String(version)) if !version.is_empty() => {
                Some(version.clone())
            }
            Some(serde_json::Value::Number(version)) => Some(version.to_string()),
            _ => None,
        }
    }

    pub fn first_output(&mut self) -> Result<RawOutput, NormalizeError> {
        self.outputs
            .take()
            .and_then(|outputs| outputs.into_iter().next())
            .ok_or(NormalizeError::InvalidResponseFormat(
                "envelope has no outputs".to_string(),
            ))
    }
}

impl RawOutput {
    /// Classification wins when an output carries both payloads.
    pub fn into_shape(self) -> Result<(Option<String>, PredictionShape), NormalizeError> {
        let model = self.model;
        match (self.classification_predictions, self.detection_predictions) {
            (Some(classification), _) => {
                Ok((model, PredictionShape::Classification(classification)))
            }
            (None, Some(payload)) => Ok((
                model,
                PredictionShape::Detection {
                    top_class: self.top_class,
                    payload,
                },
            )),
            (None, None) => Err(NormalizeError::InvalidResponseFormat(
                "output has neither classification_predictions nor detection_predictions"
                    .to_string(),
            )),
        }
    }
}
