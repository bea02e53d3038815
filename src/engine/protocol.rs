use crate::engine::illustration::{IllustrationError, ImageSize};
use crate::engine::wizard::IllustrationTicket;
use crate::model::credential::Credential;
use crate::model::story::ImageRef;

pub enum EngineCommand {
    RequestIllustration {
        ticket: IllustrationTicket,
        credential: Credential,
        size: ImageSize,
    },
}

/// Decoded pixels ready to become a texture.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub enum EngineResponse {
    IllustrationFinished {
        ticket: IllustrationTicket,
        result: Result<ImageRef, IllustrationError>,
        preview: Option<PreviewImage>,
    },
}
