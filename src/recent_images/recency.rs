use crate::image_file::EncodedImage;

/// Most recent first, never holds the same encoding twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentImages {
    images: Vec<EncodedImage>,
    capacity: usize,
}

impl RecentImages {
    pub fn new(capacity: usize) -> Self {
        Self {
            images: Vec::new(),
            capacity,
        }
    }

    /// Rebuilds the list from storage, dropping duplicates and overflow.
    pub fn from_saved(saved: Vec<EncodedImage>, capacity: usize) -> Self {
        let mut images: Vec<EncodedImage> = Vec::with_capacity(capacity);
        for image in saved {
            if images.len() == capacity {
                break;
            }
            if !images.contains(&image) {
                images.push(image);
            }
        }
        Self { images, capacity }
    }

    /// Returns whether the list changed. An encoding that is already
    /// present stays where it is.
    pub fn push(&mut self, image: EncodedImage) -> bool {
        if self.capacity == 0 || self.images.contains(&image) {
            return false;
        }
        self.images.insert(0, image);
        self.images.truncate(self.capacity);
        true
    }

    pub fn get(&self, index: usize) -> Option<&EncodedImage> {
        self.images.get(index)
    }

    pub fn images(&self) -> &[EncodedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
