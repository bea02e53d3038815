use eframe::egui;

use crate::model::story::IllustrationState;
use crate::ui::app::{panel, StoryApp};

const STORY_ACCENT: egui::Color32 = egui::Color32::from_rgb(147, 51, 234);
const SCENE_ACCENT: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);
const ERROR: egui::Color32 = egui::Color32::from_rgb(239, 68, 68);
const PREVIEW_WIDTH: f32 = 480.0;

enum PreviewAction {
    PrevScene,
    NextScene,
    Illustrate(usize),
    Regenerate,
    Save,
    Back,
    Finish,
}

pub fn draw_preview_step(ui: &mut egui::Ui, app: &mut StoryApp) {
    ui.heading("Your Story");
    ui.label("Here's the adventure we created for you!");
    ui.add_space(8.0);

    let mut actions = Vec::new();

    match app.wizard.story() {
        Some(story) => {
            let cursor = app.wizard.scene_cursor();
            let last = story.scenes.len().saturating_sub(1);

            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new(&story.title).strong());
            });
            ui.add_space(6.0);

            if cursor == 0 {
                panel(ui, STORY_ACCENT, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new(&story.introduction).italics());
                });
                ui.add_space(6.0);
            }

            if let Some(scene) = app.wizard.current_scene() {
                panel(ui, SCENE_ACCENT, |ui| {
                    ui.set_width(ui.available_width());
                    ui.strong(format!("Scene {} of {}", cursor + 1, story.scenes.len()));
                    ui.label(&scene.description);

                    if !scene.dialogue.is_empty() {
                        ui.add_space(4.0);
                        ui.strong("Dialogue");
                        for line in &scene.dialogue {
                            ui.label(egui::RichText::new(line).italics());
                        }
                    }

                    ui.add_space(4.0);
                    ui.strong("Image Description");
                    ui.weak(&scene.image_prompt);
                    ui.add_space(4.0);

                    match &scene.illustration {
                        IllustrationState::Empty => {
                            ui.label("No illustration yet.");
                            if ui.button("🖼 Generate Image").clicked() {
                                actions.push(PreviewAction::Illustrate(cursor));
                            }
                        }
                        IllustrationState::Pending => {
                            ui.horizontal(|ui| {
                                ui.add_enabled(false, egui::Button::new("Generating..."));
                                ui.spinner();
                            });
                        }
                        IllustrationState::Ready(image) => {
                            if let Some(texture) = app.preview_texture(cursor) {
                                ui.add(
                                    egui::Image::from_texture(
                                        egui::load::SizedTexture::from_handle(texture),
                                    )
                                    .max_width(PREVIEW_WIDTH)
                                    .corner_radius(egui::CornerRadius::same(8)),
                                );
                            }
                            ui.hyperlink_to("Open full image", &image.url);
                            if let Some(revised) = &image.revised_prompt {
                                ui.weak(revised);
                            }
                            if ui.button("🔄 New Image").clicked() {
                                actions.push(PreviewAction::Illustrate(cursor));
                            }
                        }
                        IllustrationState::Failed(reason) => {
                            ui.colored_label(ERROR, reason);
                            if ui.button("🔄 Try Again").clicked() {
                                actions.push(PreviewAction::Illustrate(cursor));
                            }
                        }
                    }
                });
            }

            if cursor == last {
                ui.add_space(6.0);
                panel(ui, STORY_ACCENT, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new(&story.conclusion).italics());
                });
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(cursor > 0, egui::Button::new("⬅ Previous Scene"))
                    .clicked()
                {
                    actions.push(PreviewAction::PrevScene);
                }
                if ui
                    .add_enabled(cursor < last, egui::Button::new("Next Scene ➡"))
                    .clicked()
                {
                    actions.push(PreviewAction::NextScene);
                }
            });
        }
        None => {
            ui.colored_label(
                ERROR,
                "Something went wrong while creating your story. Please go back and try again.",
            );
        }
    }

    ui.add_space(12.0);
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("⬅ Back to Characters").clicked() {
            actions.push(PreviewAction::Back);
        }
        let has_story = app.wizard.story().is_some();
        if ui.button("🔄 Regenerate Story").clicked() {
            actions.push(PreviewAction::Regenerate);
        }
        if ui.add_enabled(has_story, egui::Button::new("💾 Save Story")).clicked() {
            actions.push(PreviewAction::Save);
        }
        if ui.add_enabled(has_story, egui::Button::new("✨ Finish Story")).clicked() {
            actions.push(PreviewAction::Finish);
        }
    });

    for action in actions {
        match action {
            PreviewAction::PrevScene => {
                app.wizard.prev_scene();
            }
            PreviewAction::NextScene => {
                app.wizard.next_scene();
            }
            PreviewAction::Illustrate(scene) => app.request_illustration(scene),
            PreviewAction::Regenerate => {
                app.wizard.regenerate();
            }
            PreviewAction::Save => app.save_story(),
            PreviewAction::Back => {
                let t = app.wizard.go_back();
                app.apply_transition(t);
            }
            PreviewAction::Finish => {
                let t = app.wizard.confirm_complete();
                app.apply_transition(t);
            }
        }
    }
}

pub fn draw_complete_step(ui: &mut egui::Ui, app: &mut StoryApp) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new("✨").size(48.0));
        ui.heading("Story Complete!");
        ui.label("Your magical story has been created. Would you like to create another one?");
        ui.add_space(12.0);
        if ui.button("Create A New Story").clicked() {
            app.wizard.reset();
            app.ui.trait_inputs.clear();
        }
    });
}
