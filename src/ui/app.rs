use eframe::egui;
use egui::Layout;
use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use crate::engine::engine::Engine;
use crate::engine::export::{suggested_filename, write_story};
use crate::engine::illustration::{IllustrationError, ImageSize, OpenAiImages};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::wizard::{Step, Transition, Wizard};
use crate::model::catalog::SETTINGS;
use crate::model::credential::Credential;
use crate::ui::settings::{AppSettings, UI_SCALE_RANGE};
use crate::ui::settings_io::save_settings;
use crate::ui::{credential, preview, steps};

const MAX_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    fn color(self) -> egui::Color32 {
        match self {
            NoticeKind::Info => egui::Color32::from_rgb(59, 130, 246),
            NoticeKind::Success => egui::Color32::from_rgb(34, 197, 94),
            NoticeKind::Warning => egui::Color32::from_rgb(234, 179, 8),
            NoticeKind::Error => egui::Color32::from_rgb(239, 68, 68),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Transient widget state that has no meaning outside the window.
#[derive(Default)]
pub struct UiState {
    /// Pending trait text, per character id.
    pub trait_inputs: HashMap<u32, String>,
    pub credential_input: String,
    pub notices: Vec<Notice>,
    pub show_settings: bool,
}

pub struct StoryApp {
    pub wizard: Wizard,
    pub credential: Credential,
    pub settings: AppSettings,
    pub ui: UiState,

    previews: HashMap<(u64, usize), egui::TextureHandle>,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl StoryApp {
    pub fn new(settings: AppSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let provider = Arc::new(OpenAiImages::new(&settings.illustration));
        let previews = settings.download_previews;
        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, provider).with_previews(previews);
            engine.run();
        });

        Self {
            wizard: Wizard::new(),
            credential: Credential::default(),
            settings,
            ui: UiState::default(),
            previews: HashMap::new(),
            cmd_tx,
            resp_rx,
        }
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.ui.notices.push(Notice {
            kind,
            text: text.into(),
        });
        if self.ui.notices.len() > MAX_NOTICES {
            self.ui.notices.remove(0);
        }
    }

    pub fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Rejected(reason) => self.notify(NoticeKind::Warning, reason.to_string()),
            Transition::CredentialRequired { .. } => self.notify(
                NoticeKind::Info,
                "Enter your OpenAI API key to bring your story to life",
            ),
            Transition::Moved { .. } | Transition::OverlayClosed { .. } => {}
        }
    }

    pub fn request_illustration(&mut self, scene: usize) {
        let ticket = match self.wizard.begin_illustration(scene, &self.credential) {
            Ok(Some(ticket)) => ticket,
            Ok(None) => return,
            Err(IllustrationError::MissingCredential) => {
                self.notify(NoticeKind::Info, "Enter your OpenAI API key to generate images");
                return;
            }
            Err(e) => {
                self.notify(NoticeKind::Error, e.to_string());
                return;
            }
        };

        let cmd = EngineCommand::RequestIllustration {
            ticket: ticket.clone(),
            credential: self.credential.clone(),
            size: self.settings.illustration.size,
        };
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("engine thread is gone");
            self.wizard.finish_illustration(
                &ticket,
                Err(IllustrationError::ProviderError(
                    "The image service is unavailable".into(),
                )),
            );
            return;
        }

        self.notify(NoticeKind::Info, "Generating image...");
    }

    pub fn preview_texture(&self, scene: usize) -> Option<&egui::TextureHandle> {
        self.previews.get(&(self.wizard.generation(), scene))
    }

    pub fn save_story(&mut self) {
        let Some(story) = self.wizard.story() else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .set_file_name(suggested_filename(&story.title))
            .add_filter("Text", &["txt"])
            .save_file()
        else {
            return;
        };

        match write_story(&path, story) {
            Ok(()) => self.notify(NoticeKind::Success, "Story saved successfully!"),
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "save failed");
                self.notify(NoticeKind::Error, format!("{e:#}"));
            }
        }
    }

    fn drain_engine(&mut self, ctx: &egui::Context) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::IllustrationFinished {
                    ticket,
                    result,
                    preview,
                } => {
                    let failure = result.as_ref().err().map(|e| e.to_string());
                    if !self.wizard.finish_illustration(&ticket, result) {
                        continue;
                    }

                    if let Some(p) = preview {
                        let image =
                            egui::ColorImage::from_rgba_unmultiplied([p.width, p.height], &p.rgba);
                        let texture = ctx.load_texture(
                            format!("scene-{}-{}", ticket.generation, ticket.scene),
                            image,
                            egui::TextureOptions::LINEAR,
                        );
                        self.previews.insert((ticket.generation, ticket.scene), texture);
                    }

                    match failure {
                        Some(text) => self.notify(NoticeKind::Error, text),
                        None => self.notify(NoticeKind::Success, "Image generated successfully!"),
                    }
                }
            }
        }

        let current = self.wizard.generation();
        self.previews.retain(|(generation, _), _| *generation == current);
    }

    fn illustration_pending(&self) -> bool {
        self.wizard
            .story()
            .is_some_and(|s| s.scenes.iter().any(|scene| scene.illustration.is_pending()))
    }

    fn draw_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("✨ Choose Your Adventure");
            ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⚙ Settings").clicked() {
                    self.ui.show_settings = !self.ui.show_settings;
                }
                if ui.button("🔑 API Key").clicked() {
                    let t = self.wizard.request_credential();
                    self.apply_transition(t);
                }
            });
        });
        ui.label("Create your own magical story in just a few steps!");

        let step = self.wizard.step();
        if step != Step::Complete {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(format!("Step {} of {}", step.number(), Step::total()));
                ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{}% complete", step.progress_percent()));
                });
            });
            ui.add(
                egui::ProgressBar::new(step.progress_percent() as f32 / 100.0)
                    .text(step.title()),
            );
        }
        ui.add_space(4.0);
    }

    fn draw_notices(&mut self, ui: &mut egui::Ui) {
        let mut dismissed = None;
        for (i, notice) in self.ui.notices.iter().enumerate() {
            ui.horizontal(|ui| {
                bubble(ui, notice.kind.color(), &notice.text);
                if ui.small_button("❌").clicked() {
                    dismissed = Some(i);
                }
            });
        }
        if let Some(i) = dismissed {
            self.ui.notices.remove(i);
        }
    }

    fn draw_settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.ui.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("UI Scale");
                ui.add(egui::Slider::new(&mut self.settings.ui_scale, UI_SCALE_RANGE));

                ui.separator();
                ui.label("Illustration size");
                ui.horizontal(|ui| {
                    for size in ImageSize::ALL {
                        ui.selectable_value(&mut self.settings.illustration.size, size, size.label());
                    }
                });

                ui.checkbox(&mut self.settings.download_previews, "Show pictures in the app")
                    .on_hover_text("Takes effect after a restart");

                ui.collapsing("World colors", |ui| {
                    for setting in &SETTINGS {
                        let mut color = self.settings.color(setting.color);
                        ui.horizontal(|ui| {
                            if ui.color_edit_button_srgba(&mut color).changed() {
                                self.settings.set_color(setting.color, color);
                            }
                            ui.label(setting.name);
                        });
                    }
                });

                ui.separator();
                if ui.button("💾 Save").clicked() {
                    save_settings(&self.settings);
                }
            });
        self.ui.show_settings = open;
    }
}

impl eframe::App for StoryApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.drain_engine(ctx);

        /* HEADER */
        egui::TopBottomPanel::top("header").show(ctx, |ui| self.draw_header(ui));

        /* NOTICES */
        if !self.ui.notices.is_empty() {
            egui::TopBottomPanel::bottom("notices").show(ctx, |ui| self.draw_notices(ui));
        }

        /* CENTER */
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.wizard.step() {
                Step::Setting => steps::draw_setting_step(ui, self),
                Step::Theme => steps::draw_theme_step(ui, self),
                Step::Characters => steps::draw_characters_step(ui, self),
                Step::Preview => preview::draw_preview_step(ui, self),
                Step::Complete => preview::draw_complete_step(ui, self),
            });
        });

        if self.wizard.overlay().is_some() {
            credential::draw_credential_window(ctx, self);
        }

        if self.ui.show_settings {
            self.draw_settings_window(ctx);
        }

        if self.illustration_pending() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

/* =========================
   UI Helpers
   ========================= */

pub fn bubble(ui: &mut egui::Ui, color: egui::Color32, text: &str) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        });
}

/// Rounded panel with a faint accent wash, used for story sections and cards.
pub fn panel<R>(
    ui: &mut egui::Ui,
    accent: egui::Color32,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> egui::InnerResponse<R> {
    egui::Frame::new()
        .fill(accent.gamma_multiply(0.15))
        .stroke(egui::Stroke::new(1.0, accent.gamma_multiply(0.6)))
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::same(12))
        .show(ui, add_contents)
}
