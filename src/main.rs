use clap::Parser;
use cli::Args;
use config::Config;
use display::impl_console::ViewDisplayConsole;
use display::interface::ViewDisplay;
use image_file::ImageFile;
use leaf_identifier::core::{Event, Phase};
use leaf_identifier::main::LeafIdentifier;
use leaf_identifier::render::view;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use plant_classifier::impl_fake::{FakeResponse, PlantClassifierFake};
use plant_classifier::impl_http::PlantClassifierHttp;
use plant_classifier::interface::PlantClassifier;
use recent_images::impl_file::RecentImagesStoreFile;
use std::sync::Arc;

mod cli;
mod config;
mod detection;
mod display;
mod image_file;
mod leaf_identifier;
mod library;
mod plant_classifier;
mod recent_images;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let config = args.apply(Config::default());

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let plant_classifier: Arc<dyn PlantClassifier + Send + Sync> = if args.fake {
        Arc::new(PlantClassifierFake::new(logger.clone(), FakeResponse::Random))
    } else {
        Arc::new(PlantClassifierHttp::new(
            &config.api_url,
            &config.api_key,
            config.request_timeout,
            logger.clone(),
        ))
    };

    let recent_images_store = Arc::new(RecentImagesStoreFile::new(
        config.recent_images_path.clone(),
        &config.recent_images_key,
        logger.clone(),
    ));

    let identifier = LeafIdentifier::new(config, logger.clone(), plant_classifier, recent_images_store);

    if !args.is_headless() {
        return display::impl_gui::run(identifier, logger).map_err(|e| e.to_string().into());
    }

    run_headless(&args, identifier)
}

fn run_headless(
    args: &Args,
    identifier: LeafIdentifier,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let timeout = identifier.config.settle_timeout;

    identifier.start();
    identifier.wait_until_settled(timeout);

    if let Some(path) = &args.image {
        identifier.send(Event::Submit(ImageFile::from_path(path)?));
    } else if let Some(index) = args.recent {
        let available = identifier.model().recent_images.len();
        if index >= available {
            return Err(format!("no recent image {} ({} saved)", index, available).into());
        }
        identifier.send(Event::SelectRecent(index));
    }

    if !identifier.wait_until_settled(timeout) {
        return Err(format!("no result after {}s", timeout.as_secs()).into());
    }
    if args.all {
        identifier.send(Event::ToggleExpanded);
        identifier.update();
    }

    let model = identifier.model();
    ViewDisplayConsole::stdout().render(&view(&identifier.config, &model))?;

    match model.phase {
        Phase::Error { error } => Err(error.to_string().into()),
        _ => Ok(()),
    }
}
