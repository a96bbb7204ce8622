use crate::image_file::EncodedImage;
use crate::library::logger::interface::Logger;
use crate::recent_images::interface::{RecentImagesStore, StoreError};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static SAVE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A JSON object on disk, one key holding an array of data urls.
pub struct RecentImagesStoreFile {
    path: PathBuf,
    key: String,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl RecentImagesStoreFile {
    pub fn new(path: PathBuf, key: &str, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            path,
            key: key.to_string(),
            logger: logger.with_namespace("recent_images").with_namespace("file"),
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, serde_json::Value>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl RecentImagesStore for RecentImagesStoreFile {
    fn load(&self) -> Result<Vec<EncodedImage>, StoreError> {
        let entries = self.read_entries()?;
        let images: Vec<String> = match entries.get(&self.key) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => Vec::new(),
        };
        let _ = self.logger.info(&format!(
            "Loaded {} recent images from {}",
            images.len(),
            self.path.display()
        ));
        Ok(images.into_iter().map(EncodedImage::new).collect())
    }

    fn save(&self, images: &[EncodedImage]) -> Result<(), StoreError> {
        // other keys in the file are left alone
        let mut entries = self.read_entries().unwrap_or_default();
        let urls: Vec<&str> = images.iter().map(EncodedImage::as_str).collect();
        entries.insert(self.key.clone(), serde_json::to_value(urls)?);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // one temp file per save, concurrent writers never share it
        let tmp = self.path.with_extension(format!(
            "json.{}.{}.tmp",
            std::process::id(),
            SAVE_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&tmp, serde_json::to_vec_pretty(&entries)?)?;
        std::fs::rename(&tmp, &self.path)?;

        let _ = self.logger.info(&format!(
            "Saved {} recent images to {}",
            images.len(),
            self.path.display()
        ));
        Ok(())
    }
}
