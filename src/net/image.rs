//! Background image loading.
//!
//! The one genuinely asynchronous part of the style engine. Fetch and
//! decode run on a tokio runtime; completions cross back to the owning
//! render thread as messages, never by mutating shared state from the
//! worker. Each request carries a generation token so a completion that
//! was superseded by a newer request for the same slot is detected and
//! discarded instead of clobbering the fresher load.

use std::collections::HashMap;

use image::DynamicImage;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use url::Url;

use super::loader::decode_data_url;

/// State of an image slot as the render thread sees it.
#[derive(Debug)]
pub enum ImageState {
    Loading {
        generation: u64,
    },
    Loaded {
        width: u32,
        height: u32,
        image: DynamicImage,
    },
    Failed {
        error: String,
    },
}

/// A completion message posted by a worker.
#[derive(Debug)]
pub struct ImageEvent {
    pub url: String,
    pub generation: u64,
    pub result: Result<DynamicImage, String>,
}

pub struct ImageLoader {
    runtime: Runtime,
    client: reqwest::Client,
    tx: UnboundedSender<ImageEvent>,
    rx: UnboundedReceiver<ImageEvent>,
    images: HashMap<String, ImageState>,
    next_generation: u64,
}

impl ImageLoader {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to create image loader runtime");
        let (tx, rx) = unbounded_channel();
        Self {
            runtime,
            client: reqwest::Client::new(),
            tx,
            rx,
            images: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Starts (or restarts) loading `url`. A newer request supersedes any
    /// load still in flight for the same slot.
    pub fn request(&mut self, url: &Url) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.images
            .insert(url.to_string(), ImageState::Loading { generation });

        let tx = self.tx.clone();
        let client = self.client.clone();
        let url = url.clone();
        self.runtime.spawn(async move {
            let result = fetch_and_decode(&client, &url).await;
            // The receiver dropping just means the owner went away.
            let _ = tx.send(ImageEvent {
                url: url.to_string(),
                generation,
                result,
            });
        });
        generation
    }

    /// Drains completion messages on the render thread. Returns how many
    /// slots actually changed; a nonzero return is the "preferences
    /// changed" signal that should trigger relayout.
    pub fn poll_events(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(event) = self.rx.try_recv() {
            if self.apply(event) {
                changed += 1;
            }
        }
        changed
    }

    /// Applies one completion; stale completions (superseded generation)
    /// are discarded.
    fn apply(&mut self, event: ImageEvent) -> bool {
        match self.images.get(&event.url) {
            Some(ImageState::Loading { generation }) if *generation == event.generation => {}
            _ => {
                log::debug!("discarding stale image load for {}", event.url);
                return false;
            }
        }
        let state = match event.result {
            Ok(image) => ImageState::Loaded {
                width: image.width(),
                height: image.height(),
                image,
            },
            Err(error) => {
                log::warn!("image load failed for {}: {}", event.url, error);
                ImageState::Failed { error }
            }
        };
        self.images.insert(event.url, state);
        true
    }

    pub fn state(&self, url: &str) -> Option<&ImageState> {
        self.images.get(url)
    }

    /// Intrinsic size of a loaded image.
    pub fn size(&self, url: &str) -> Option<(u32, u32)> {
        match self.images.get(url) {
            Some(ImageState::Loaded { width, height, .. }) => Some((*width, *height)),
            _ => None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.images
            .values()
            .any(|state| matches!(state, ImageState::Loading { .. }))
    }

    #[cfg(test)]
    fn recv_blocking(&mut self) -> Option<ImageEvent> {
        self.rx.blocking_recv()
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_and_decode(client: &reqwest::Client, url: &Url) -> Result<DynamicImage, String> {
    let bytes = match url.scheme() {
        "http" | "https" => {
            let response = client
                .get(url.as_str())
                .send()
                .await
                .map_err(|e| e.to_string())?;
            response.bytes().await.map_err(|e| e.to_string())?.to_vec()
        }
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| "Cannot convert to file path".to_string())?;
            std::fs::read(path).map_err(|e| e.to_string())?
        }
        "data" => decode_data_url(url.as_str()).map_err(|e| e.to_string())?,
        scheme => return Err(format!("Unsupported scheme: {}", scheme)),
    };
    if bytes.is_empty() {
        return Err("Empty image data".to_string());
    }
    image::load_from_memory(&bytes).map_err(|e| e.to_string())
}
