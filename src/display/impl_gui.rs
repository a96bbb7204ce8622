use crate::detection::format::ConfidenceTier;
use crate::image_file::{EncodedImage, ImageFile};
use crate::leaf_identifier::core::{Event, Model, NotificationLevel};
use crate::leaf_identifier::main::LeafIdentifier;
use crate::leaf_identifier::render::{view, Panel, View};
use crate::library::logger::interface::Logger;
use eframe::egui;
use egui::load::SizedTexture;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const PREVIEW_MAX_HEIGHT: f32 = 320.0;
const THUMBNAIL_SIZE: f32 = 96.0;
const TEXTURE_MAX_SIDE: u32 = 768;

/// Textures for the images on screen, keyed by their encoding.
#[derive(Default)]
struct TextureCache {
    entries: Vec<(EncodedImage, Option<egui::TextureHandle>)>,
}

impl TextureCache {
    fn get(&mut self, ctx: &egui::Context, image: &EncodedImage) -> Option<egui::TextureHandle> {
        if let Some((_, texture)) = self.entries.iter().find(|(cached, _)| cached == image) {
            return texture.clone();
        }
        let texture = load_texture(ctx, &format!("image-{}", self.entries.len()), image);
        self.entries.push((image.clone(), texture.clone()));
        texture
    }

    fn retain(&mut self, live: &[&EncodedImage]) {
        self.entries
            .retain(|(cached, _)| live.iter().any(|image| *image == cached));
    }
}

fn load_texture(
    ctx: &egui::Context,
    name: &str,
    image: &EncodedImage,
) -> Option<egui::TextureHandle> {
    let bytes = image.decode().ok()?;
    let decoded = image::load_from_memory(&bytes)
        .ok()?
        .thumbnail(TEXTURE_MAX_SIDE, TEXTURE_MAX_SIDE)
        .to_rgba8();
    let size = [decoded.width() as usize, decoded.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, decoded.as_raw());
    Some(ctx.load_texture(name, pixels, egui::TextureOptions::default()))
}

fn tier_color(tier: ConfidenceTier) -> egui::Color32 {
    match tier {
        ConfidenceTier::High => egui::Color32::from_rgb(34, 139, 34),
        ConfidenceTier::Medium => egui::Color32::from_rgb(245, 158, 11),
        ConfidenceTier::Low => egui::Color32::GRAY,
    }
}

pub struct LeafIdentifierGui {
    identifier: LeafIdentifier,
    logger: Arc<dyn Logger + Send + Sync>,
    path_input: String,
    input_error: Option<String>,
    textures: TextureCache,
}

impl LeafIdentifierGui {
    pub fn new(identifier: LeafIdentifier, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            identifier,
            logger: logger.with_namespace("gui"),
            path_input: String::new(),
            input_error: None,
            textures: TextureCache::default(),
        }
    }

    fn submit_path(&mut self, path: &Path) {
        match ImageFile::from_path(path) {
            Ok(file) => {
                self.input_error = None;
                self.identifier.send(Event::Submit(file));
            }
            Err(e) => {
                let _ = self.logger.error(&e.to_string());
                self.input_error = Some(format!("Could not open {}", path.display()));
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context, uploads_enabled: bool) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if !uploads_enabled {
            return;
        }
        if let Some(path) = &file.path {
            self.submit_path(path);
        } else if let Some(bytes) = &file.bytes {
            self.input_error = None;
            self.identifier
                .send(Event::Submit(ImageFile::from_bytes(file.name.clone(), bytes.to_vec())));
        }
    }

    fn upload_ui(&mut self, ui: &mut egui::Ui, model: &Model, view: &View) {
        ui.heading("Identify Medicinal Plants");
        ui.label("Upload an image of a medicinal plant leaf to identify the species.");
        ui.add_space(12.0);

        let preview = model
            .preview
            .as_ref()
            .and_then(|image| self.textures.get(ui.ctx(), image));
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_height(PREVIEW_MAX_HEIGHT);
            ui.vertical_centered(|ui| match &preview {
                Some(texture) => {
                    let size = texture.size_vec2();
                    let scale = (PREVIEW_MAX_HEIGHT / size.y)
                        .min(ui.available_width() / size.x)
                        .min(1.0);
                    ui.image(SizedTexture::new(texture.id(), size * scale));
                    if view.uploads_enabled && ui.button("✕ Remove").clicked() {
                        self.identifier.send(Event::Clear);
                    }
                }
                None => {
                    ui.add_space(PREVIEW_MAX_HEIGHT / 3.0);
                    ui.strong("Upload a Leaf Image");
                    ui.label("Drag and drop an image or enter its path below");
                    ui.small("Supports: JPG, PNG, WEBP");
                }
            });
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let input = ui.add_enabled(
                view.uploads_enabled,
                egui::TextEdit::singleline(&mut self.path_input).hint_text("path/to/leaf.jpg"),
            );
            let pressed_enter =
                input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(view.uploads_enabled, egui::Button::new("Select Image"))
                .clicked();
            if (clicked || pressed_enter) && !self.path_input.trim().is_empty() {
                let path = self.path_input.trim().to_string();
                self.submit_path(Path::new(&path));
            }
        });
        if let Some(error) = &self.input_error {
            ui.colored_label(egui::Color32::RED, error);
        }

        if !model.recent_images.is_empty() {
            ui.add_space(16.0);
            ui.label("Recent Plants");
            ui.horizontal(|ui| {
                for (index, image) in model.recent_images.images().iter().enumerate() {
                    let clicked = match self.textures.get(ui.ctx(), image) {
                        Some(texture) => ui
                            .add_enabled(
                                view.uploads_enabled,
                                egui::ImageButton::new(SizedTexture::new(
                                    texture.id(),
                                    egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE),
                                )),
                            )
                            .clicked(),
                        None => ui
                            .add_enabled(
                                view.uploads_enabled,
                                egui::Button::new(format!("Recent {}", index + 1)),
                            )
                            .clicked(),
                    };
                    if clicked {
                        self.identifier.send(Event::SelectRecent(index));
                    }
                }
            });
        }
    }

    fn results_ui(&mut self, ui: &mut egui::Ui, view: &View) {
        if view.can_clear {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                if ui.small_button("✕").clicked() {
                    self.identifier.send(Event::Clear);
                }
            });
        }

        match &view.panel {
            Panel::Empty { title, hint } => {
                ui.strong(title);
                ui.label(hint);
            }
            Panel::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Analyzing plant...");
                });
            }
            Panel::Error { title, message } => {
                ui.colored_label(egui::Color32::RED, egui::RichText::new(title).strong());
                ui.label(message);
            }
            Panel::Results { rows, toggle } => {
                ui.heading("Plant Identification Result");
                ui.separator();
                for row in rows {
                    let name = if row.best_match {
                        egui::RichText::new(format!("✓ {}", row.name)).strong()
                    } else {
                        egui::RichText::new(&row.name)
                    };
                    ui.horizontal(|ui| {
                        if ui.selectable_label(false, name).clicked() {
                            self.identifier.send(Event::SelectDetection(row.index));
                        }
                        if row.best_match {
                            ui.small("Best Match");
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.colored_label(tier_color(row.tier), format!("{}%", row.percent));
                        });
                    });
                    if row.best_match {
                        ui.add(egui::ProgressBar::new(row.percent as f32 / 100.0));
                    }
                    ui.separator();
                }
                if let Some(toggle) = toggle {
                    if ui.small_button(toggle).clicked() {
                        self.identifier.send(Event::ToggleExpanded);
                    }
                }
            }
            Panel::Details(details) => {
                if ui.small_button("⬆ Back to all results").clicked() {
                    self.identifier.send(Event::SelectDetection(details.index));
                }
                ui.heading(&details.name);
                ui.label(format!("{}% Match", details.percent));
                ui.separator();
                ui.strong("About This Plant");
                ui.label(&details.description);
                ui.hyperlink_to("Learn More", &details.search_url);
            }
        }

        if let Some(size) = view.image_size {
            ui.add_space(8.0);
            ui.small(format!("Image: {}x{}", size.width, size.height));
        }
    }

    fn notification_ui(&mut self, ui: &mut egui::Ui, view: &View) {
        let Some(notification) = &view.notification else {
            return;
        };
        ui.horizontal(|ui| {
            let color = match notification.level {
                NotificationLevel::Success => egui::Color32::from_rgb(34, 139, 34),
                NotificationLevel::Error => egui::Color32::RED,
            };
            ui.colored_label(color, egui::RichText::new(&notification.title).strong());
            ui.label(&notification.description);
            if ui.small_button("Dismiss").clicked() {
                self.identifier.send(Event::DismissNotification);
            }
        });
    }
}

impl eframe::App for LeafIdentifierGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.identifier.update();

        let model = self.identifier.model();
        let view = view(&self.identifier.config, &model);
        self.handle_dropped_files(ctx, view.uploads_enabled);

        let mut live: Vec<&EncodedImage> = model.recent_images.images().iter().collect();
        live.extend(model.preview.as_ref());
        self.textures.retain(&live);

        egui::TopBottomPanel::bottom("notification").show(ctx, |ui| {
            self.notification_ui(ui, &view);
        });
        egui::SidePanel::right("results")
            .default_width(340.0)
            .show(ctx, |ui| {
                self.results_ui(ui, &view);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.upload_ui(ui, &model, &view);
        });

        if model.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

pub fn run(identifier: LeafIdentifier, logger: Arc<dyn Logger + Send + Sync>) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([980.0, 640.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Leaf Identifier",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            identifier.set_waker(Arc::new(move || ctx.request_repaint()));
            identifier.start();
            Box::new(LeafIdentifierGui::new(identifier, logger))
        }),
    )
}
