use crate::detection::model::DetectionResult;
use crate::detection::normalize::normalize;
use crate::image_file::EncodedImage;
use crate::library::logger::interface::Logger;
use crate::plant_classifier::interface::{ClassifyError, PlantClassifier};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PLANTS: [&str; 12] = [
    "aloe_vera",
    "tulsi",
    "neem",
    "mint",
    "curry_leaf",
    "hibiscus",
    "betel",
    "indian_borage",
    "lemon_grass",
    "jasmine",
    "guava",
    "amla",
];

#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// A classification envelope with a few random plants.
    Random,
    /// Normalizes the given envelope as if the service had sent it.
    Envelope(serde_json::Value),
    Fail(ClassifyError),
}

pub struct PlantClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    response: FakeResponse,
    delay: Duration,
    calls: AtomicUsize,
}

impl PlantClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, response: FakeResponse) -> Self {
        Self {
            logger: logger.with_namespace("plant_classifier").with_namespace("fake"),
            response,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn random_envelope() -> serde_json::Value {
    let mut rng = rand::rng();
    let count = rng.random_range(1..=5);
    let plants: Vec<&str> = PLANTS.choose_multiple(&mut rng, count).copied().collect();

    let mut remaining = 1.0_f64;
    let predictions: Vec<serde_json::Value> = plants
        .iter()
        .enumerate()
        .map(|(class_id, class)| {
            let confidence = remaining * rng.random_range(0.3..0.9);
            remaining -= confidence;
            json!({ "class": class, "class_id": class_id, "confidence": confidence })
        })
        .collect();

    json!({
        "outputs": [{
            "model": "fake",
            "classification_predictions": {
                "top": plants.first().copied().unwrap_or_default(),
                "confidence": predictions
                    .first()
                    .and_then(|p| p["confidence"].as_f64())
                    .unwrap_or(0.0),
                "predictions": predictions,
                "image": { "width": 0, "height": 0 }
            }
        }],
        "version": "fake"
    })
}

impl PlantClassifier for PlantClassifierFake {
    fn classify(&self, image: &EncodedImage) -> Result<DetectionResult, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info(&format!("Classifying {:?}", image));

        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        match &self.response {
            FakeResponse::Random => Ok(normalize(random_envelope())?),
            FakeResponse::Envelope(envelope) => Ok(normalize(envelope.clone())?),
            FakeResponse::Fail(error) => Err(error.clone()),
        }
    }
}
