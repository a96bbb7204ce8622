use crate::config::Config;
use crate::detection::format::{confidence_percent, format_plant_name};
use crate::detection::model::{Detection, DetectionResult, ImageSize};
use crate::detection::ranking::{best_match, rank};
use crate::image_file::{EncodedImage, ImageFile, RECENT_IMAGE_NAME};
use crate::plant_classifier::interface::ClassifyError;
use crate::recent_images::recency::RecentImages;

/// What the user is told went wrong. The message never includes the cause.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Please upload an image file")]
    UnsupportedFileType { mime: String },
    #[error("No plant species detected in the image")]
    NoDetections,
    #[error("Error analyzing image. Please try again.")]
    Classify(ClassifyError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Result {
        detections: Vec<Detection>,
    },
    Error {
        error: AnalysisError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn error(title: &str, description: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub phase: Phase,
    /// Bumped on every accepted submission; replies tagged with an older
    /// number are dropped.
    pub submission: u64,
    pub preview: Option<EncodedImage>,
    pub image_size: Option<ImageSize>,
    pub recent_images: RecentImages,
    pub expanded: bool,
    pub selected: Option<usize>,
    pub notification: Option<Notification>,
}

impl Model {
    pub fn new(config: &Config) -> Self {
        Self {
            phase: Phase::Idle,
            submission: 0,
            preview: None,
            image_size: None,
            recent_images: RecentImages::new(config.recent_images_capacity),
            expanded: false,
            selected: None,
            notification: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub fn detections(&self) -> &[Detection] {
        match &self.phase {
            Phase::Result { detections } => detections,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    RecentImagesLoaded(Vec<EncodedImage>),
    Submit(ImageFile),
    SelectRecent(usize),
    ImageRead {
        submission: u64,
        image: EncodedImage,
        size: Option<ImageSize>,
    },
    ClassifyDone {
        submission: u64,
        result: Result<DetectionResult, ClassifyError>,
    },
    ToggleExpanded,
    SelectDetection(usize),
    DismissNotification,
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadRecentImages,
    SaveRecentImages { images: Vec<EncodedImage> },
    ReadImage { submission: u64, file: ImageFile },
    Classify { submission: u64, image: EncodedImage },
}

pub fn init(config: &Config) -> (Model, Vec<Effect>) {
    (Model::new(config), vec![Effect::LoadRecentImages])
}

pub fn transition(config: &Config, model: Model, event: Event) -> (Model, Vec<Effect>) {
    match event {
        Event::RecentImagesLoaded(images) => {
            let saved = RecentImages::from_saved(images, config.recent_images_capacity);
            // images analyzed before the load finished stay newest
            let mut recent_images = saved.clone();
            for image in model.recent_images.images().iter().rev() {
                recent_images.push(image.clone());
            }
            let effects = if recent_images != saved {
                vec![Effect::SaveRecentImages {
                    images: recent_images.images().to_vec(),
                }]
            } else {
                vec![]
            };
            (
                Model {
                    recent_images,
                    ..model
                },
                effects,
            )
        }

        Event::Submit(file) => submit(model, file),

        Event::SelectRecent(index) => {
            let Some(image) = model.recent_images.get(index).cloned() else {
                return (model, vec![]);
            };
            match ImageFile::from_data_url(&image, RECENT_IMAGE_NAME) {
                Ok(file) => submit(model, file),
                Err(_) => reject(
                    model,
                    AnalysisError::UnsupportedFileType {
                        mime: image.mime().unwrap_or_default().to_string(),
                    },
                ),
            }
        }

        Event::ImageRead {
            submission,
            image,
            size,
        } if submission == model.submission && model.is_loading() => {
            let mut recent_images = model.recent_images.clone();
            let mut effects = vec![];
            if recent_images.push(image.clone()) {
                effects.push(Effect::SaveRecentImages {
                    images: recent_images.images().to_vec(),
                });
            }
            effects.push(Effect::Classify {
                submission,
                image: image.clone(),
            });
            (
                Model {
                    preview: Some(image),
                    image_size: size,
                    recent_images,
                    ..model
                },
                effects,
            )
        }

        Event::ClassifyDone { submission, result }
            if submission == model.submission && model.is_loading() =>
        {
            classified(model, result)
        }

        // a reply for a submission that has since been replaced
        Event::ImageRead { .. } | Event::ClassifyDone { .. } => (model, vec![]),

        Event::ToggleExpanded => {
            if model.detections().len() > config.visible_results {
                let expanded = !model.expanded;
                (Model { expanded, ..model }, vec![])
            } else {
                (model, vec![])
            }
        }

        Event::SelectDetection(index) => {
            if index >= model.detections().len() {
                return (model, vec![]);
            }
            let selected = if model.selected == Some(index) {
                None
            } else {
                Some(index)
            };
            (Model { selected, ..model }, vec![])
        }

        Event::DismissNotification => (
            Model {
                notification: None,
                ..model
            },
            vec![],
        ),

        Event::Clear => {
            if model.is_loading() {
                return (model, vec![]);
            }
            (
                Model {
                    phase: Phase::Idle,
                    preview: None,
                    image_size: None,
                    expanded: false,
                    selected: None,
                    ..model
                },
                vec![],
            )
        }
    }
}

fn submit(model: Model, file: ImageFile) -> (Model, Vec<Effect>) {
    if !file.is_image() {
        return reject(model, AnalysisError::UnsupportedFileType { mime: file.mime });
    }

    let submission = model.submission + 1;
    (
        Model {
            phase: Phase::Loading,
            submission,
            preview: None,
            image_size: None,
            expanded: false,
            selected: None,
            notification: None,
            ..model
        },
        vec![Effect::ReadImage { submission, file }],
    )
}

fn reject(model: Model, error: AnalysisError) -> (Model, Vec<Effect>) {
    (
        Model {
            phase: Phase::Error { error },
            notification: Some(Notification::error(
                "Unsupported file",
                "Please upload an image file",
            )),
            ..model
        },
        vec![],
    )
}

fn classified(
    model: Model,
    result: Result<DetectionResult, ClassifyError>,
) -> (Model, Vec<Effect>) {
    let (phase, notification) = match result {
        Ok(result) if !result.prediction.detections.is_empty() => {
            let detections = rank(&result.prediction.detections);
            let notification = best_match(&detections).map(|top| Notification {
                level: NotificationLevel::Success,
                title: format!("Identified as {}", format_plant_name(&top.class)),
                description: format!("{}% confidence", confidence_percent(top.confidence)),
            });
            (Phase::Result { detections }, notification)
        }
        Ok(_) => (
            Phase::Error {
                error: AnalysisError::NoDetections,
            },
            Some(Notification::error(
                "Analysis failed",
                "No plant species could be detected",
            )),
        ),
        Err(error) => (
            Phase::Error {
                error: AnalysisError::Classify(error),
            },
            Some(Notification::error(
                "Analysis failed",
                "There was an error processing your image",
            )),
        ),
    };

    (
        Model {
            phase,
            notification,
            ..model
        },
        vec![],
    )
}
