use crate::image_file::EncodedImage;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("recent images store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("recent images store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the recent images survive between sessions.
pub trait RecentImagesStore {
    fn load(&self) -> Result<Vec<EncodedImage>, StoreError>;
    fn save(&self, images: &[EncodedImage]) -> Result<(), StoreError>;
}
