use crate::model::catalog::{Setting, Theme};
use crate::model::character::Roster;

/// Everything the user picked. Owned by the wizard, replaced wholesale on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryDetails {
    pub setting: Option<&'static Setting>,
    pub theme: Option<&'static Theme>,
    pub roster: Roster,
}

impl StoryDetails {
    pub fn is_ready(&self) -> bool {
        self.setting.is_some() && self.theme.is_some() && self.roster.has_complete_character()
    }
}

/// Where a provider put the generated picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    /// Some providers rewrite the prompt before drawing.
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IllustrationState {
    #[default]
    Empty,
    Pending,
    Ready(ImageRef),
    Failed(String),
}

impl IllustrationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, IllustrationState::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub description: String,
    pub dialogue: Vec<String>,
    pub image_prompt: String,
    pub illustration: IllustrationState,
}

/// Derived from a [`StoryDetails`] snapshot; never edited, only replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryContent {
    pub title: String,
    pub introduction: String,
    pub scenes: Vec<Scene>,
    pub conclusion: String,
}
