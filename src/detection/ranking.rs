use super::model::Detection;
use std::cmp::Ordering;

fn score(detection: &Detection) -> f64 {
    if detection.confidence.is_nan() {
        0.0
    } else {
        detection.confidence
    }
}

/// Sorts by confidence, highest first. Equal scores keep their input order.
pub fn rank(detections: &[Detection]) -> Vec<Detection> {
    let mut ranked = detections.to_vec();
    ranked.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
    ranked
}

pub fn visible(ranked: &[Detection], expanded: bool, limit: usize) -> &[Detection] {
    if expanded {
        ranked
    } else {
        &ranked[..ranked.len().min(limit)]
    }
}

pub fn hidden_count(ranked: &[Detection], limit: usize) -> usize {
    ranked.len().saturating_sub(limit)
}

pub fn best_match(ranked: &[Detection]) -> Option<&Detection> {
    ranked.first()
}
