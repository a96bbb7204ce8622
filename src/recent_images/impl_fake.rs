use crate::image_file::EncodedImage;
use crate::recent_images::interface::{RecentImagesStore, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct RecentImagesStoreFake {
    images: Mutex<Vec<EncodedImage>>,
    saves: AtomicUsize,
    first_save_delay: Mutex<Option<Duration>>,
}

impl RecentImagesStoreFake {
    pub fn new(images: Vec<EncodedImage>) -> Self {
        Self {
            images: Mutex::new(images),
            saves: AtomicUsize::new(0),
            first_save_delay: Mutex::new(None),
        }
    }

    /// Holds up the first save, later ones go straight through.
    pub fn with_first_save_delay(self, delay: Duration) -> Self {
        *self
            .first_save_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(delay);
        self
    }

    pub fn images(&self) -> Vec<EncodedImage> {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl RecentImagesStore for RecentImagesStoreFake {
    fn load(&self) -> Result<Vec<EncodedImage>, StoreError> {
        Ok(self.images())
    }

    fn save(&self, images: &[EncodedImage]) -> Result<(), StoreError> {
        let delay = self
            .first_save_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        *self.images.lock().unwrap_or_else(PoisonError::into_inner) = images.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
