use crate::detection::model::DetectionResult;
use crate::detection::normalize::NormalizeError;
use crate::image_file::EncodedImage;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    #[error("API error: {status}")]
    Api { status: u16 },
    #[error("transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    InvalidResponseFormat(#[from] NormalizeError),
}

pub trait PlantClassifier {
    fn classify(&self, image: &EncodedImage) -> Result<DetectionResult, ClassifyError>;
}
