use eframe::egui;

use crate::model::credential::{CredentialCheck, EXPECTED_PREFIX};
use crate::ui::app::{NoticeKind, StoryApp};

const API_KEYS_URL: &str = "https://platform.openai.com/api-keys";

/// Modal key entry drawn over whichever step asked for it.
pub fn draw_credential_window(ctx: &egui::Context, app: &mut StoryApp) {
    let mut submit = false;
    let mut cancel = false;

    egui::Window::new("🔑 OpenAI API Key")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("An OpenAI API key is needed to illustrate your story.");
            ui.weak("The key is kept in memory for this session only and is never written to disk.");
            ui.add_space(6.0);

            let field = ui.add(
                egui::TextEdit::singleline(&mut app.ui.credential_input)
                    .password(true)
                    .hint_text(format!("{EXPECTED_PREFIX}...")),
            );
            if field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }

            ui.hyperlink_to("Get an API key", API_KEYS_URL);
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                let filled = !app.ui.credential_input.trim().is_empty();
                if ui.add_enabled(filled, egui::Button::new("Continue ➡")).clicked() {
                    submit = true;
                }
            });
        });

    if cancel {
        app.ui.credential_input.clear();
        let t = app.wizard.go_back();
        app.apply_transition(t);
        return;
    }

    if submit {
        let raw = std::mem::take(&mut app.ui.credential_input);
        match app.wizard.submit_credential(&mut app.credential, &raw) {
            Ok(CredentialCheck::Accepted) => {
                app.notify(NoticeKind::Success, "API key saved for this session");
            }
            Ok(CredentialCheck::UnexpectedPrefix) => app.notify(
                NoticeKind::Warning,
                format!("OpenAI keys usually start with \"{EXPECTED_PREFIX}\". Using it anyway."),
            ),
            Err(e) => {
                app.ui.credential_input = raw;
                app.notify(NoticeKind::Error, e.to_string());
            }
        }
    }
}
