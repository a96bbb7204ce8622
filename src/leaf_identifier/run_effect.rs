use crate::config::Config;
use crate::leaf_identifier::core::{Effect, Event};
use crate::library::logger::interface::Logger;
use crate::plant_classifier::interface::PlantClassifier;
use crate::recent_images::interface::RecentImagesStore;
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    plant_classifier: Arc<dyn PlantClassifier + Send + Sync>,
    recent_images_store: Arc<dyn RecentImagesStore + Send + Sync>,
    event_sender: Sender<Event>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        plant_classifier: Arc<dyn PlantClassifier + Send + Sync>,
        recent_images_store: Arc<dyn RecentImagesStore + Send + Sync>,
        event_sender: Sender<Event>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            plant_classifier,
            recent_images_store,
            event_sender,
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::LoadRecentImages => {
                let images = match self.recent_images_store.load() {
                    Ok(images) => images,
                    Err(e) => {
                        let _ = self
                            .logger
                            .error(&format!("Error loading recent images: {}", e));
                        vec![]
                    }
                };
                let _ = self.event_sender.send(Event::RecentImagesLoaded(images));
            }
            Effect::SaveRecentImages { images } => {
                if let Err(e) = self.recent_images_store.save(&images) {
                    let _ = self.logger.error(&format!(
                        "Error saving recent images to {}: {}",
                        self.config.recent_images_path.display(),
                        e
                    ));
                }
            }
            Effect::ReadImage { submission, file } => {
                let image = file.encode();
                let size = match file.probe_dimensions() {
                    Ok(size) => Some(size),
                    Err(e) => {
                        let _ = self
                            .logger
                            .error(&format!("Error probing {}: {}", file.name, e));
                        None
                    }
                };
                let _ = self.event_sender.send(Event::ImageRead {
                    submission,
                    image,
                    size,
                });
            }
            Effect::Classify { submission, image } => {
                let result = self.plant_classifier.classify(&image);
                match &result {
                    Ok(result) => {
                        let _ = self.logger.info(&format!(
                            "Detection result: top={:?} detections={} model={} version={}",
                            result.prediction.top,
                            result.prediction.detections.len(),
                            result.model,
                            result.version
                        ));
                    }
                    Err(e) => {
                        let _ = self
                            .logger
                            .error(&format!("Error detecting plant: {}", e));
                    }
                }
                let _ = self
                    .event_sender
                    .send(Event::ClassifyDone { submission, result });
            }
        }
    }
}
