use crate::config::Config;
use crate::detection::format::{
    confidence_percent, confidence_tier, describe, format_plant_name, search_url, ConfidenceTier,
};
use crate::detection::model::ImageSize;
use crate::detection::ranking::{hidden_count, visible};
use crate::leaf_identifier::core::{Model, Notification, Phase};

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Position in the ranked list, used to select the row.
    pub index: usize,
    pub name: String,
    pub percent: u32,
    pub tier: ConfidenceTier,
    pub best_match: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    pub index: usize,
    pub name: String,
    pub percent: u32,
    pub description: String,
    pub search_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Empty {
        title: String,
        hint: String,
    },
    Loading,
    Error {
        title: String,
        message: String,
    },
    Results {
        rows: Vec<ResultRow>,
        toggle: Option<String>,
    },
    Details(DetailsView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub panel: Panel,
    pub has_preview: bool,
    pub image_size: Option<ImageSize>,
    pub recent_count: usize,
    pub can_clear: bool,
    pub uploads_enabled: bool,
    pub notification: Option<Notification>,
}

pub fn view(config: &Config, model: &Model) -> View {
    let panel = match &model.phase {
        Phase::Idle => Panel::Empty {
            title: "Upload a Plant Image".to_string(),
            hint: "Results will appear here after analysis".to_string(),
        },
        Phase::Loading => Panel::Loading,
        Phase::Error { error } => Panel::Error {
            title: "Detection Error".to_string(),
            message: error.to_string(),
        },
        Phase::Result { detections } => match model
            .selected
            .and_then(|index| detections.get(index).map(|d| (index, d)))
        {
            Some((index, detection)) => {
                let name = format_plant_name(&detection.class);
                Panel::Details(DetailsView {
                    index,
                    percent: confidence_percent(detection.confidence),
                    description: describe(detection),
                    search_url: search_url(&name),
                    name,
                })
            }
            None => {
                let rows = visible(detections, model.expanded, config.visible_results)
                    .iter()
                    .enumerate()
                    .map(|(index, detection)| {
                        let percent = confidence_percent(detection.confidence);
                        ResultRow {
                            index,
                            name: format_plant_name(&detection.class),
                            percent,
                            tier: confidence_tier(percent),
                            best_match: index == 0,
                        }
                    })
                    .collect();
                let hidden = hidden_count(detections, config.visible_results);
                let toggle = match (hidden, model.expanded) {
                    (0, _) => None,
                    (_, true) => Some("Show Less".to_string()),
                    (hidden, false) => Some(format!("Show {} More", hidden)),
                };
                Panel::Results { rows, toggle }
            }
        },
    };

    View {
        panel,
        has_preview: model.preview.is_some(),
        image_size: model.image_size,
        recent_count: model.recent_images.len(),
        can_clear: matches!(model.phase, Phase::Result { .. } | Phase::Error { .. }),
        uploads_enabled: !model.is_loading(),
        notification: model.notification.clone(),
    }
}
