use std::fmt;

use crate::engine::illustration::IllustrationError;
use crate::engine::synthesizer::synthesize;
use crate::model::catalog::{Setting, Theme};
use crate::model::character::Roster;
use crate::model::credential::{Credential, CredentialCheck, CredentialError};
use crate::model::story::{IllustrationState, ImageRef, Scene, StoryContent, StoryDetails};

/// Current step in the story wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Setting,
    Theme,
    Characters,
    Preview,
    Complete,
}

impl Step {
    /// Step number (1-based)
    pub fn number(&self) -> usize {
        match self {
            Self::Setting => 1,
            Self::Theme => 2,
            Self::Characters => 3,
            Self::Preview => 4,
            Self::Complete => 5,
        }
    }

    /// Total number of steps (excluding Complete)
    pub fn total() -> usize {
        4
    }

    pub fn progress_percent(&self) -> usize {
        (self.number().min(Self::total()) * 100) / Self::total()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Setting => "Choose Your World",
            Self::Theme => "Pick a Theme",
            Self::Characters => "Create Your Characters",
            Self::Preview => "Your Story",
            Self::Complete => "Story Complete!",
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Self::Setting => Some(Self::Theme),
            Self::Theme => Some(Self::Characters),
            Self::Characters => Some(Self::Preview),
            Self::Preview | Self::Complete => None,
        }
    }

    fn prev(self) -> Option<Step> {
        match self {
            Self::Theme => Some(Self::Setting),
            Self::Characters => Some(Self::Theme),
            Self::Preview => Some(Self::Characters),
            Self::Setting | Self::Complete => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Why the wizard refused to move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailed {
    #[error("Pick a setting to continue")]
    NoSetting,
    #[error("Pick a theme to continue")]
    NoTheme,
    #[error("Finish at least one character: a name, a personality and one trait")]
    NoCompleteCharacter,
    #[error("There is no step after \"{0}\"")]
    NoForwardStep(Step),
    #[error("Already at the first step")]
    AtFirstStep,
    #[error("A finished story can only be started over")]
    StoryFinished,
    #[error("Only a story in preview can be finished")]
    NotInPreview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved { from: Step, to: Step },
    Rejected(ValidationFailed),
    /// The credential overlay is open on top of `resume`.
    CredentialRequired { resume: Step },
    /// The credential overlay was closed; `resume` is showing again.
    OverlayClosed { resume: Step },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Setting(&'static Setting),
    Theme(&'static Theme),
}

/// Credential entry shown over a step that needs a key to go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialPrompt {
    pub resume: Step,
}

/// Hands an illustration job to the engine and routes its result back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrationTicket {
    pub generation: u64,
    pub scene: usize,
    pub prompt: String,
}

/// Drives the story flow: Setting → Theme → Characters → Preview → Complete.
///
/// The credential is asked for lazily, when leaving Characters for Preview,
/// and again whenever an illustration is requested without one.
#[derive(Debug, Default)]
pub struct Wizard {
    details: StoryDetails,
    step: Step,
    overlay: Option<CredentialPrompt>,
    story: Option<StoryContent>,
    scene_cursor: usize,
    /// Bumped whenever the displayed story is replaced or dropped.
    generation: u64,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn overlay(&self) -> Option<CredentialPrompt> {
        self.overlay
    }

    pub fn details(&self) -> &StoryDetails {
        &self.details
    }

    pub fn story(&self) -> Option<&StoryContent> {
        self.story.as_ref()
    }

    /// Changes whenever the displayed story is replaced or dropped.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scene_cursor(&self) -> usize {
        self.scene_cursor
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.story.as_ref()?.scenes.get(self.scene_cursor)
    }

    pub fn select(&mut self, selection: Selection) {
        match selection {
            Selection::Setting(s) => self.details.setting = Some(s),
            Selection::Theme(t) => self.details.theme = Some(t),
        }
    }

    pub fn select_setting(&mut self, setting: &'static Setting) {
        self.select(Selection::Setting(setting));
    }

    pub fn select_theme(&mut self, theme: &'static Theme) {
        self.select(Selection::Theme(theme));
    }

    pub fn update_roster(&mut self, roster: Roster) {
        self.details.roster = roster;
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.details.roster
    }

    /// Gate for the "continue" affordance of the active step.
    pub fn can_continue(&self) -> Result<(), ValidationFailed> {
        match self.step {
            Step::Setting if self.details.setting.is_none() => Err(ValidationFailed::NoSetting),
            Step::Theme if self.details.theme.is_none() => Err(ValidationFailed::NoTheme),
            Step::Characters if !self.details.is_ready() => {
                if self.details.setting.is_none() {
                    Err(ValidationFailed::NoSetting)
                } else if self.details.theme.is_none() {
                    Err(ValidationFailed::NoTheme)
                } else {
                    Err(ValidationFailed::NoCompleteCharacter)
                }
            }
            Step::Preview | Step::Complete => Err(ValidationFailed::NoForwardStep(self.step)),
            _ => Ok(()),
        }
    }

    pub fn go_next(&mut self, credential: &Credential) -> Transition {
        if let Some(prompt) = self.overlay {
            if !credential.is_set() {
                return Transition::CredentialRequired { resume: prompt.resume };
            }
            self.overlay = None;
            return Transition::OverlayClosed { resume: prompt.resume };
        }

        if let Err(reason) = self.can_continue() {
            tracing::debug!(step = ?self.step, %reason, "continue rejected");
            return Transition::Rejected(reason);
        }

        let Some(to) = self.step.next() else {
            return Transition::Rejected(ValidationFailed::NoForwardStep(self.step));
        };

        if to == Step::Preview && !credential.is_set() {
            return self.request_credential();
        }

        if to == Step::Preview && !self.synthesize_story() {
            return Transition::Rejected(ValidationFailed::NoCompleteCharacter);
        }

        let from = self.step;
        self.step = to;
        tracing::debug!(?from, ?to, "wizard advanced");
        Transition::Moved { from, to }
    }

    pub fn go_back(&mut self) -> Transition {
        if let Some(prompt) = self.overlay.take() {
            return Transition::OverlayClosed { resume: prompt.resume };
        }

        let Some(to) = self.step.prev() else {
            let reason = if self.step == Step::Complete {
                ValidationFailed::StoryFinished
            } else {
                ValidationFailed::AtFirstStep
            };
            return Transition::Rejected(reason);
        };

        let from = self.step;
        if from == Step::Preview {
            self.drop_story();
        }

        self.step = to;
        tracing::debug!(?from, ?to, "wizard went back");
        Transition::Moved { from, to }
    }

    /// Open the credential overlay over the current step.
    pub fn request_credential(&mut self) -> Transition {
        let resume = self.step;
        self.overlay = Some(CredentialPrompt { resume });
        tracing::debug!(?resume, "credential required");
        Transition::CredentialRequired { resume }
    }

    /// Store the entered key and hand control back to the step that asked for it.
    pub fn submit_credential(
        &mut self,
        credential: &mut Credential,
        raw: &str,
    ) -> Result<CredentialCheck, CredentialError> {
        let check = credential.set(raw)?;
        if let Some(prompt) = self.overlay.take() {
            self.step = prompt.resume;
        }
        Ok(check)
    }

    pub fn confirm_complete(&mut self) -> Transition {
        if self.step != Step::Preview || self.overlay.is_some() {
            return Transition::Rejected(ValidationFailed::NotInPreview);
        }

        self.drop_story();
        self.step = Step::Complete;
        Transition::Moved {
            from: Step::Preview,
            to: Step::Complete,
        }
    }

    /// Back to an empty story at the first step.
    pub fn reset(&mut self) {
        self.details = StoryDetails::default();
        self.step = Step::Setting;
        self.overlay = None;
        self.drop_story();
        tracing::debug!("wizard reset");
    }

    /// Replace the story with a freshly rendered one. Only meaningful in Preview.
    pub fn regenerate(&mut self) -> bool {
        if self.step != Step::Preview {
            return false;
        }
        self.synthesize_story()
    }

    pub fn next_scene(&mut self) -> bool {
        let last = self.story.as_ref().map_or(0, |s| s.scenes.len().saturating_sub(1));
        if self.scene_cursor < last {
            self.scene_cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_scene(&mut self) -> bool {
        if self.scene_cursor > 0 {
            self.scene_cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Mark a scene as waiting for its illustration.
    ///
    /// `Ok(None)` means there is nothing to send: the scene does not exist or
    /// already has a request in flight.
    pub fn begin_illustration(
        &mut self,
        scene: usize,
        credential: &Credential,
    ) -> Result<Option<IllustrationTicket>, IllustrationError> {
        if self.step != Step::Preview {
            return Ok(None);
        }
        if !credential.is_set() {
            self.request_credential();
            return Err(IllustrationError::MissingCredential);
        }

        let generation = self.generation;
        let Some(target) = self.story.as_mut().and_then(|s| s.scenes.get_mut(scene)) else {
            return Ok(None);
        };
        if target.illustration.is_pending() {
            return Ok(None);
        }

        target.illustration = IllustrationState::Pending;
        Ok(Some(IllustrationTicket {
            generation,
            scene,
            prompt: target.image_prompt.clone(),
        }))
    }

    /// Attach a finished illustration. Returns `false` when the story it was
    /// requested for is no longer on screen and the result was dropped.
    pub fn finish_illustration(
        &mut self,
        ticket: &IllustrationTicket,
        result: Result<ImageRef, IllustrationError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(scene = ticket.scene, "discarding stale illustration");
            return false;
        }

        let Some(target) = self.story.as_mut().and_then(|s| s.scenes.get_mut(ticket.scene)) else {
            return false;
        };

        target.illustration = match result {
            Ok(image) => IllustrationState::Ready(image),
            Err(e) => IllustrationState::Failed(e.to_string()),
        };
        true
    }

    fn synthesize_story(&mut self) -> bool {
        let (Some(setting), Some(theme)) = (self.details.setting, self.details.theme) else {
            return false;
        };

        let story = synthesize(setting, theme, &self.details.roster.complete_characters());
        if story.is_none() {
            tracing::error!("story requested without a complete character");
        }

        self.generation += 1;
        self.scene_cursor = 0;
        self.story = story;
        self.story.is_some()
    }

    fn drop_story(&mut self) {
        self.generation += 1;
        self.scene_cursor = 0;
        self.story = None;
    }
}
