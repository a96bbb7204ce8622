use super::model::Detection;

pub const UNKNOWN_PLANT: &str = "Unknown Plant";
const SEARCH_URL: &str = "https://www.google.com/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

/// `aloe_vera` -> `Aloe Vera`, `Neem-Leaf` -> `Neem Leaf`.
pub fn format_plant_name(class_name: &str) -> String {
    if class_name.is_empty() {
        return UNKNOWN_PLANT.to_string();
    }

    class_name
        .replace(['_', '-'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut capitalized: String = first.to_uppercase().collect();
            capitalized.push_str(&chars.as_str().to_lowercase());
            capitalized
        }
        None => String::new(),
    }
}

pub fn confidence_percent(confidence: f64) -> u32 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u32
}

pub fn confidence_tier(percent: u32) -> ConfidenceTier {
    if percent > 75 {
        ConfidenceTier::High
    } else if percent > 40 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

pub fn search_url(plant_name: &str) -> String {
    let query = format!("{} medicinal plant", plant_name);
    match url::Url::parse_with_params(SEARCH_URL, &[("q", query.as_str())]) {
        Ok(url) => url.to_string(),
        Err(_) => SEARCH_URL.to_string(),
    }
}

pub fn describe(detection: &Detection) -> String {
    let name = format_plant_name(&detection.class);
    format!(
        "{} is a medicinal plant that has been identified in your image. \
         The AI model has detected this plant with {}% confidence.",
        name,
        confidence_percent(detection.confidence)
    )
}
