//! Background thumbnail fetching.
//!
//! Asset bytes are fetched on worker threads and kept per URL for the
//! session. Formats the renderer can't load directly (WebP, GIF...) are
//! transcoded to PNG on the worker.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use image::ImageFormat;

use crate::api_client::ImageApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailFormat {
    Png,
    Jpeg,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailData {
    pub format: ThumbnailFormat,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum ThumbnailState {
    Loading,
    Ready(Arc<ThumbnailData>),
    Failed,
}

/// Sniff the bytes and convert anything that is not PNG or JPEG to PNG.
pub fn prepare_for_display(bytes: Vec<u8>) -> Result<ThumbnailData, String> {
    match image::guess_format(&bytes).map_err(|e| e.to_string())? {
        ImageFormat::Png => Ok(ThumbnailData { format: ThumbnailFormat::Png, bytes }),
        ImageFormat::Jpeg => Ok(ThumbnailData { format: ThumbnailFormat::Jpeg, bytes }),
        _ => {
            let decoded = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;
            let mut png = Vec::new();
            decoded
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|e| e.to_string())?;
            Ok(ThumbnailData { format: ThumbnailFormat::Png, bytes: png })
        }
    }
}

type Fetched = (String, Result<ThumbnailData, String>);

pub struct ThumbnailCache {
    entries: HashMap<String, ThumbnailState>,
    tx: Sender<Fetched>,
    rx: Receiver<Fetched>,
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { entries: HashMap::new(), tx, rx }
    }
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for `url`, starting a fetch the first time it is seen.
    pub fn request(&mut self, api: &Arc<dyn ImageApi>, url: &str) -> ThumbnailState {
        if let Some(state) = self.entries.get(url) {
            return state.clone();
        }
        self.entries.insert(url.to_string(), ThumbnailState::Loading);

        let api = Arc::clone(api);
        let tx = self.tx.clone();
        let url = url.to_string();
        std::thread::spawn(move || {
            let result = api
                .fetch_bytes(&url)
                .map_err(|e| e.to_string())
                .and_then(prepare_for_display);
            let _ = tx.send((url, result));
        });
        ThumbnailState::Loading
    }

    pub fn get(&self, url: &str) -> Option<&ThumbnailState> {
        self.entries.get(url)
    }

    /// Collect finished fetches. Returns whether anything arrived.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((url, result)) = self.rx.try_recv() {
            let state = match result {
                Ok(data) => ThumbnailState::Ready(Arc::new(data)),
                Err(e) => {
                    log::warn!("Thumbnail {} unavailable: {}", url, e);
                    ThumbnailState::Failed
                }
            };
            self.entries.insert(url, state);
            changed = true;
        }
        changed
    }

    pub fn is_pending(&self) -> bool {
        self.entries.values().any(|s| matches!(s, ThumbnailState::Loading))
    }

    /// Forget failed entries so they are retried on the next request.
    pub fn forget_failures(&mut self) {
        self.entries.retain(|_, s| !matches!(s, ThumbnailState::Failed));
    }
}
