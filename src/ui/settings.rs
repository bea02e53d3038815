use serde::{Deserialize, Serialize};
use egui::Color32;
use std::collections::HashMap;

use crate::engine::illustration::ProviderSettings;

pub const UI_SCALE_RANGE: std::ops::RangeInclusive<f32> = 0.75..=2.0;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub ui_scale: f32,

    /// Download each illustration for display next to its scene.
    pub download_previews: bool,

    // Setting color tag → card accent (extensible)
    pub setting_colors: HashMap<String, [u8; 4]>,

    pub illustration: ProviderSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        let mut setting_colors = HashMap::new();

        setting_colors.insert("storyworld-fantasy".into(), [155, 93, 229, 255]);
        setting_colors.insert("storyworld-space".into(), [59, 91, 219, 255]);
        setting_colors.insert("storyworld-forest".into(), [47, 158, 68, 255]);
        setting_colors.insert("storyworld-underwater".into(), [21, 170, 191, 255]);
        setting_colors.insert("storyworld-mystery".into(), [230, 119, 0, 255]);

        Self {
            ui_scale: 1.0,
            download_previews: true,
            setting_colors,
            illustration: ProviderSettings::default(),
        }
    }
}

impl AppSettings {
    /// Pull hand-edited values back into what the window can use.
    pub fn sanitize(&mut self) {
        self.ui_scale = if self.ui_scale.is_finite() {
            self.ui_scale.clamp(*UI_SCALE_RANGE.start(), *UI_SCALE_RANGE.end())
        } else {
            Self::default().ui_scale
        };
    }

    pub fn color(&self, key: &str) -> Color32 {
        self.setting_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::GRAY)
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.setting_colors.insert(
            key.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }
}
