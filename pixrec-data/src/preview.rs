//! Off-thread preview decoding for a freshly selected upload.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use crate::thumbnails::{prepare_for_display, ThumbnailData};
use crate::upload::PreviewState;

/// Pixel dimensions read from the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewInfo {
    pub width: u32,
    pub height: u32,
}

impl PreviewInfo {
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// Decode the dimensions of the image at `path`.
pub fn decode_preview(path: &Path) -> PreviewState {
    match image::image_dimensions(path) {
        Ok((width, height)) => PreviewState::Ready(PreviewInfo { width, height }),
        Err(e) => {
            log::warn!("Preview decode failed for {:?}: {}", path, e);
            PreviewState::Failed(e.to_string())
        }
    }
}

/// Result of decoding a selected file off the UI thread.
#[derive(Debug, Clone)]
pub struct DecodedPreview {
    pub path: PathBuf,
    pub state: PreviewState,
    /// Bytes ready for the preview image, when the file could be read
    pub display: Option<ThumbnailData>,
}

/// Decode on a worker thread. The receiver yields exactly one result,
/// tagged with the path so a superseded selection can be recognised.
pub fn spawn_preview(path: PathBuf) -> Receiver<DecodedPreview> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let state = decode_preview(&path);
        let display = match &state {
            PreviewState::Ready(_) => std::fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(prepare_for_display)
                .map_err(|e| log::warn!("Preview bytes unavailable for {:?}: {}", path, e))
                .ok(),
            _ => None,
        };
        let _ = tx.send(DecodedPreview { path, state, display });
    });
    rx
}
