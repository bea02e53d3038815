use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::engine::illustration::{request_illustration, IllustrationProvider, ImageSize};
use crate::engine::protocol::{EngineCommand, EngineResponse, PreviewImage};
use crate::engine::wizard::IllustrationTicket;
use crate::model::credential::Credential;

/// Runs network work off the UI thread.
///
/// Every illustration gets its own worker as soon as it is dispatched, so a
/// slow scene never holds up another one. The wizard's per-scene busy flag is
/// the only limit on concurrent requests.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    worker: Worker,
}

/// What a single illustration job needs, cloned into each job thread.
#[derive(Clone)]
struct Worker {
    provider: Arc<dyn IllustrationProvider>,
    http: Client,
    fetch_previews: bool,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        provider: Arc<dyn IllustrationProvider>,
    ) -> Self {
        Self {
            rx,
            tx,
            worker: Worker {
                provider,
                http: Client::new(),
                fetch_previews: true,
            },
        }
    }

    /// Whether the generated picture is downloaded for in-app display. When
    /// off, only the reference is returned.
    pub fn with_previews(mut self, fetch_previews: bool) -> Self {
        self.worker.fetch_previews = fetch_previews;
        self
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::RequestIllustration {
                    ticket,
                    credential,
                    size,
                } => {
                    let worker = self.worker.clone();
                    let tx = self.tx.clone();
                    thread::spawn(move || {
                        let response = worker.illustrate(ticket, &credential, size);
                        if tx.send(response).is_err() {
                            tracing::debug!("illustration finished after the window closed");
                        }
                    });
                }
            }
        }
        tracing::debug!("engine stopped");
    }
}

impl Worker {
    fn illustrate(
        &self,
        ticket: IllustrationTicket,
        credential: &Credential,
        size: ImageSize,
    ) -> EngineResponse {
        let result = request_illustration(self.provider.as_ref(), &ticket.prompt, credential, size);

        let preview = match &result {
            Ok(image) if self.fetch_previews => match fetch_preview(&self.http, &image.url) {
                Ok(preview) => Some(preview),
                Err(e) => {
                    tracing::warn!(error = %e, scene = ticket.scene, "illustration preview unavailable");
                    None
                }
            },
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, scene = ticket.scene, "illustration failed");
                None
            }
        };

        EngineResponse::IllustrationFinished {
            ticket,
            result,
            preview,
        }
    }
}

fn fetch_preview(client: &Client, url: &str) -> Result<PreviewImage> {
    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .context("downloading illustration")?
        .bytes()
        .context("reading illustration")?;

    decode_preview(&bytes)
}

pub fn decode_preview(bytes: &[u8]) -> Result<PreviewImage> {
    let image = image::load_from_memory(bytes).context("decoding illustration")?;
    let rgba = image.to_rgba8();

    Ok(PreviewImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}
