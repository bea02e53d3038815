mod engine;
mod model;
mod ui;

use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = ui::settings_io::load_settings();
    tracing::info!(
        model = %settings.illustration.model,
        size = settings.illustration.size.as_str(),
        "starting storyworld"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("StoryWorld")
            .with_inner_size([1100.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "StoryWorld",
        options,
        Box::new(move |_cc| Ok(Box::new(ui::app::StoryApp::new(settings)))),
    )
}
