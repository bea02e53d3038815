use eframe::egui;

use crate::engine::safety::first_banned_word;
use crate::engine::wizard::Step;
use crate::model::catalog::{SETTINGS, THEMES};
use crate::model::character::{Character, MAX_TRAITS};
use crate::ui::app::{panel, NoticeKind, StoryApp};

const CARD_WIDTH: f32 = 220.0;
const THEME_ACCENT: egui::Color32 = egui::Color32::from_rgb(236, 72, 153);
const WARNING: egui::Color32 = egui::Color32::from_rgb(234, 179, 8);

/// Icon tag → glyph. Unknown tags get the castle.
pub fn icon_glyph(tag: &str) -> &'static str {
    match tag {
        "rocket" => "🚀",
        "trees" => "🌳",
        "fish" => "🐟",
        "search" => "🔍",
        "heart-handshake" => "🤝",
        "shield" => "🛡",
        "compass" => "🧭",
        "users" => "👥",
        "mountain" => "⛰",
        _ => "🏰",
    }
}

pub fn draw_setting_step(ui: &mut egui::Ui, app: &mut StoryApp) {
    ui.heading("Choose Your World");
    ui.label("Where will your story take place?");
    ui.add_space(8.0);

    let selected = app.wizard.details().setting.map(|s| s.id);
    let mut picked = None;

    ui.horizontal_wrapped(|ui| {
        for setting in &SETTINGS {
            let accent = app.settings.color(setting.color);
            let card = choice_card(
                ui,
                icon_glyph(setting.icon),
                setting.name,
                setting.description,
                accent,
                selected == Some(setting.id),
            );
            if card.clicked() {
                picked = Some(setting);
            }
        }
    });

    if let Some(setting) = picked {
        app.wizard.select_setting(setting);
    }

    step_nav(ui, app);
}

pub fn draw_theme_step(ui: &mut egui::Ui, app: &mut StoryApp) {
    ui.heading("Choose Your Theme");
    ui.label("What kind of adventure will it be?");
    ui.add_space(8.0);

    let selected = app.wizard.details().theme.map(|t| t.id);
    let mut picked = None;

    ui.horizontal_wrapped(|ui| {
        for theme in &THEMES {
            let card = choice_card(
                ui,
                icon_glyph(theme.icon),
                theme.name,
                theme.description,
                THEME_ACCENT,
                selected == Some(theme.id),
            );
            if card.clicked() {
                picked = Some(theme);
            }
        }
    });

    if let Some(theme) = picked {
        app.wizard.select_theme(theme);
    }

    step_nav(ui, app);
}

enum RosterAction {
    Remove(u32),
    AddTrait(u32),
    RemoveTrait(u32, String),
}

pub fn draw_characters_step(ui: &mut egui::Ui, app: &mut StoryApp) {
    ui.heading("Create Your Characters");
    ui.label("Who will be in your story?");
    ui.add_space(8.0);

    let roster_len = app.wizard.details().roster.len();
    let accent = app
        .wizard
        .details()
        .setting
        .map_or(THEME_ACCENT, |s| app.settings.color(s.color));
    let mut actions = Vec::new();

    for (i, character) in app.wizard.roster_mut().iter_mut().enumerate() {
        let trait_input = app.ui.trait_inputs.entry(character.id).or_default();

        panel(ui, accent, |ui| {
            ui.horizontal(|ui| {
                ui.strong(format!("Character {}", i + 1));
                if character.is_complete() {
                    ui.label("✔");
                }
                if roster_len > 1 && ui.small_button("🗑").clicked() {
                    actions.push(RosterAction::Remove(character.id));
                }
            });

            ui.label("Name");
            ui.add(egui::TextEdit::singleline(&mut character.name).hint_text("Enter character name"));

            ui.label("Personality");
            ui.add(
                egui::TextEdit::multiline(&mut character.personality)
                    .desired_rows(2)
                    .hint_text("Describe their personality..."),
            );

            ui.label(format!("Traits ({}/{MAX_TRAITS})", character.traits().len()));
            ui.horizontal_wrapped(|ui| {
                for tag in character.traits() {
                    if ui.small_button(format!("{tag} ❌")).clicked() {
                        actions.push(RosterAction::RemoveTrait(character.id, tag.clone()));
                    }
                }
            });

            ui.horizontal(|ui| {
                let input = ui.add_sized(
                    [200.0, 20.0],
                    egui::TextEdit::singleline(trait_input).hint_text("Add a trait (e.g. brave)"),
                );
                let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let can_add = character.traits().len() < MAX_TRAITS;
                if ui.add_enabled(can_add, egui::Button::new("Add")).clicked() || entered {
                    actions.push(RosterAction::AddTrait(character.id));
                }
            });

            if let Some(hint) = content_hint(character) {
                ui.colored_label(WARNING, hint);
            }
        });
        ui.add_space(6.0);
    }

    for action in actions {
        apply_roster_action(app, action);
    }

    let full = app.wizard.details().roster.is_full();
    if ui
        .add_enabled(!full, egui::Button::new("➕ Add Character"))
        .clicked()
    {
        if let Err(e) = app.wizard.roster_mut().add_character() {
            app.notify(NoticeKind::Info, e.to_string());
        }
    }

    step_nav(ui, app);
}

fn apply_roster_action(app: &mut StoryApp, action: RosterAction) {
    let result = match action {
        RosterAction::Remove(id) => match app.wizard.roster_mut().remove_character(id) {
            Ok(_) => {
                app.ui.trait_inputs.remove(&id);
                Ok(())
            }
            Err(e) => Err(e),
        },
        RosterAction::AddTrait(id) => {
            let raw = app.ui.trait_inputs.get(&id).cloned().unwrap_or_default();
            if raw.trim().is_empty() {
                return;
            }
            let added = app.wizard.roster_mut().add_trait(id, &raw);
            if added.is_ok() {
                app.ui.trait_inputs.remove(&id);
            }
            added
        }
        RosterAction::RemoveTrait(id, tag) => {
            app.wizard.roster_mut().remove_trait(id, &tag).map(|_| ())
        }
    };

    if let Err(e) = result {
        app.notify(NoticeKind::Info, e.to_string());
    }
}

/// Soft nudge when a whole word in the character may not suit young readers.
/// Never blocks anything.
fn content_hint(character: &Character) -> Option<String> {
    let word = std::iter::once(character.name.as_str())
        .chain(std::iter::once(character.personality.as_str()))
        .chain(character.traits().iter().map(String::as_str))
        .find_map(first_banned_word)?;
    Some(format!("💡 \"{word}\" might be a bit much for a children's story"))
}

/// Back/Continue row shared by the input steps. Continue stays disabled until
/// the step's requirements are met.
fn step_nav(ui: &mut egui::Ui, app: &mut StoryApp) {
    ui.add_space(12.0);
    ui.separator();
    ui.horizontal(|ui| {
        if app.wizard.step() != Step::Setting && ui.button("⬅ Back").clicked() {
            let t = app.wizard.go_back();
            app.apply_transition(t);
        }

        let gate = app.wizard.can_continue();
        let response = ui.add_enabled(gate.is_ok(), egui::Button::new("Continue ➡"));
        let clicked = response.clicked();
        if let Err(reason) = gate {
            response.on_disabled_hover_text(reason.to_string());
        }

        if clicked {
            let t = app.wizard.go_next(&app.credential);
            app.apply_transition(t);
        }
    });
}

fn choice_card(
    ui: &mut egui::Ui,
    glyph: &str,
    title: &str,
    description: &str,
    accent: egui::Color32,
    selected: bool,
) -> egui::Response {
    let stroke = if selected {
        egui::Stroke::new(3.0, accent)
    } else {
        egui::Stroke::new(1.0, egui::Color32::from_gray(90))
    };

    egui::Frame::new()
        .fill(accent.gamma_multiply(if selected { 0.3 } else { 0.1 }))
        .stroke(stroke)
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.label(egui::RichText::new(glyph).size(32.0));
            ui.label(egui::RichText::new(title).strong().size(18.0));
            ui.label(description);
            if selected {
                ui.colored_label(accent, "✔ Selected");
            }
        })
        .response
        .interact(egui::Sense::click())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_icon_has_a_glyph() {
        for tag in SETTINGS.iter().map(|s| s.icon).chain(THEMES.iter().map(|t| t.icon)) {
            if tag != "castle" {
                assert_ne!(icon_glyph(tag), "🏰", "{tag}");
            }
        }
    }

    #[test]
    fn names_that_only_contain_a_flagged_word_get_no_hint() {
        for name in ["Eddie", "Goldie", "Gunnar"] {
            let mut c = Character::new(1);
            c.name = name.into();
            c.personality = "kind and obedient".into();
            c.add_trait("brave").unwrap();
            assert!(c.is_complete());
            assert_eq!(content_hint(&c), None, "{name}");
        }
    }

    #[test]
    fn whole_flagged_words_get_a_hint() {
        let mut c = Character::new(1);
        c.name = "Rex".into();
        c.personality = "a bit scary at first".into();
        assert!(content_hint(&c).unwrap().contains("\"scary\""));
    }

    #[test]
    fn unknown_icon_falls_back_to_castle() {
        assert_eq!(icon_glyph("dragon"), "🏰");
    }
}
