//! Upload selection: validation and the pending-file state behind the
//! upload widget. Nothing here touches the network; a confirmed file is
//! handed to whatever upload function the caller supplies.

use std::io;
use std::path::{Path, PathBuf};

use crate::models::format_megabytes;
use crate::preview::PreviewInfo;

/// MIME types the API accepts.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// 10 MiB, inclusive.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// File extensions offered by the file picker.
pub const PICKER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Declared MIME type for a file, derived from its extension the same way a
/// browser file input does.
pub fn mime_type_for_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "jpe" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
    .to_string()
}

// ─── Candidate ────────────────────────────────────────────────────────────────

/// A file the user picked or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub path: PathBuf,
    /// Name shown to the user and sent as the multipart file name
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl UploadCandidate {
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"));
        }
        Ok(Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "image".to_string()),
            size: metadata.len(),
            mime_type: mime_type_for_path(path),
        })
    }

    pub fn size_display(&self) -> String {
        format_megabytes(self.size)
    }
}

// ─── Validation ───────────────────────────────────────────────────────────────

/// Why a selection was refused before any upload was attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("Please select a JPEG, PNG or WebP image.")]
    UnsupportedType { mime_type: String },
    #[error("The image must be at most 10 MB (selected file is {}).", format_megabytes(*size))]
    TooLarge { size: u64 },
    /// Controls are disabled while an upload is in flight
    #[error("Please wait for the current upload to finish.")]
    Busy,
}

/// Type is checked before size.
pub fn validate(mime_type: &str, size: u64) -> Result<(), UploadRejection> {
    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(UploadRejection::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge { size });
    }
    Ok(())
}

// ─── Selection state ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Drop,
    Picker,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    Decoding,
    Ready(PreviewInfo),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    pub file: UploadCandidate,
    pub source: SelectionSource,
    pub preview: PreviewState,
}

/// State behind the upload widget.
///
/// `idle → pending → submitted`; `cancel` returns to idle, and any
/// `set_busy(false)` re-arms `confirm` so a failed upload can be retried.
#[derive(Debug, Default)]
pub struct UploadSelection {
    pending: Option<PendingUpload>,
    rejection: Option<UploadRejection>,
    busy: bool,
    submitted: bool,
}

impl UploadSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and hold a file. A rejected file leaves the previous
    /// pending file (if any) untouched.
    pub fn select(
        &mut self,
        file: UploadCandidate,
        source: SelectionSource,
    ) -> Result<&PendingUpload, UploadRejection> {
        if !self.controls_enabled() {
            return Err(UploadRejection::Busy);
        }
        if let Err(rejection) = validate(&file.mime_type, file.size) {
            log::info!("Rejected {}: {}", file.name, rejection);
            self.rejection = Some(rejection.clone());
            return Err(rejection);
        }
        self.rejection = None;
        Ok(self.pending.insert(PendingUpload {
            file,
            source,
            preview: PreviewState::Decoding,
        }))
    }

    /// Store a decode result. Results for a file that is no longer pending
    /// are dropped.
    pub fn set_preview(&mut self, path: &Path, preview: PreviewState) -> bool {
        match self.pending.as_mut() {
            Some(pending) if pending.file.path == path => {
                pending.preview = preview;
                true
            }
            _ => false,
        }
    }

    /// Hand the pending file to `upload`. Returns whether it was called.
    pub fn confirm(&mut self, upload: impl FnOnce(UploadCandidate)) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        let Some(pending) = &self.pending else { return false };
        self.submitted = true;
        upload(pending.file.clone());
        true
    }

    /// Discard the pending file and its preview.
    pub fn cancel(&mut self) -> bool {
        if !self.controls_enabled() {
            return false;
        }
        self.pending = None;
        self.rejection = None;
        true
    }

    /// Mirror the caller's busy flag. A non-busy report ends the current
    /// submission even if the caller never reported it as busy, which is
    /// the case when the upload fails before the first sync.
    pub fn set_busy(&mut self, busy: bool) {
        if !busy {
            self.submitted = false;
        }
        self.busy = busy;
    }

    /// Forget everything, e.g. after navigating away.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pending(&self) -> Option<&PendingUpload> {
        self.pending.as_ref()
    }

    pub fn rejection(&self) -> Option<&UploadRejection> {
        self.rejection.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn controls_enabled(&self) -> bool {
        !self.busy && !self.submitted
    }
}

// ─── Progress display ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProgressDisplay {
    #[default]
    Hidden,
    /// Upload started, no bytes acknowledged yet
    Indeterminate,
    Determinate(u8),
}

impl ProgressDisplay {
    pub fn new(is_uploading: bool, progress: u8) -> Self {
        match (is_uploading, progress.min(100)) {
            (false, _) => Self::Hidden,
            (true, 0) => Self::Indeterminate,
            (true, p) => Self::Determinate(p),
        }
    }

    /// Fill fraction for the bar in `[0,1]`.
    pub fn fraction(&self) -> f64 {
        match self {
            Self::Determinate(p) => *p as f64 / 100.0,
            _ => 0.0,
        }
    }

    pub fn label(&self) -> Option<String> {
        match self {
            Self::Hidden => None,
            Self::Indeterminate => Some("Uploading... 0%".to_string()),
            Self::Determinate(p) => Some(format!("Uploading... {}%", p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn candidate(name: &str, mime: &str, size: u64) -> UploadCandidate {
        UploadCandidate {
            path: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            size,
            mime_type: mime.to_string(),
        }
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_type_for_path(Path::new("a/b/photo.JPG")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("x.png")), "image/png");
        assert_eq!(mime_type_for_path(Path::new("x.webp")), "image/webp");
        assert_eq!(mime_type_for_path(Path::new("x.gif")), "image/gif");
        assert_eq!(mime_type_for_path(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn test_disallowed_types_never_reach_upload() {
        for mime in ["image/gif", "image/bmp", "text/plain", "application/pdf", "image/svg+xml", ""] {
            let mut selection = UploadSelection::new();
            let result = selection.select(candidate("f", mime, 1000), SelectionSource::Picker);
            assert!(matches!(result, Err(UploadRejection::UnsupportedType { .. })), "{mime}");
            assert!(selection.pending().is_none());

            let called = Cell::new(false);
            assert!(!selection.confirm(|_| called.set(true)));
            assert!(!called.get());
        }
    }

    #[test]
    fn test_oversize_files_get_size_message() {
        for size in [MAX_UPLOAD_BYTES + 1, 11 * 1024 * 1024, 50 * 1024 * 1024] {
            let mut selection = UploadSelection::new();
            let err = selection
                .select(candidate("big.jpg", "image/jpeg", size), SelectionSource::Drop)
                .unwrap_err();
            assert_eq!(err, UploadRejection::TooLarge { size });
            assert!(err.to_string().contains("at most 10 MB"));
            assert_eq!(selection.rejection(), Some(&err));
        }

        let mut selection = UploadSelection::new();
        assert!(selection
            .select(candidate("edge.png", "image/png", MAX_UPLOAD_BYTES), SelectionSource::Drop)
            .is_ok());
    }

    #[test]
    fn test_type_checked_before_size() {
        let err = validate("image/gif", MAX_UPLOAD_BYTES * 2).unwrap_err();
        assert!(matches!(err, UploadRejection::UnsupportedType { .. }));
    }

    #[test]
    fn test_drop_and_picker_are_equivalent() {
        let file = candidate("cat.webp", "image/webp", 4096);
        let preview = PreviewState::Ready(PreviewInfo { width: 4, height: 3 });

        let mut dropped = UploadSelection::new();
        dropped.select(file.clone(), SelectionSource::Drop).unwrap();
        dropped.set_preview(&file.path, preview.clone());

        let mut picked = UploadSelection::new();
        picked.select(file.clone(), SelectionSource::Picker).unwrap();
        picked.set_preview(&file.path, preview);

        let (a, b) = (dropped.pending().unwrap(), picked.pending().unwrap());
        assert_eq!(a.file, b.file);
        assert_eq!(a.preview, b.preview);
        assert_eq!(dropped.controls_enabled(), picked.controls_enabled());
    }

    #[test]
    fn test_confirm_uploads_exactly_once() {
        let file = candidate("dog.jpg", "image/jpeg", 2_000_000);
        let mut selection = UploadSelection::new();
        selection.select(file.clone(), SelectionSource::Picker).unwrap();

        let mut calls = Vec::new();
        assert!(selection.confirm(|f| calls.push(f)));
        assert!(!selection.confirm(|f| calls.push(f)));
        selection.set_busy(true);
        assert!(!selection.confirm(|f| calls.push(f)));
        assert_eq!(calls, vec![file]);
    }

    #[test]
    fn test_failed_upload_can_be_retried() {
        let file = candidate("dog.jpg", "image/jpeg", 10);
        let mut selection = UploadSelection::new();
        selection.select(file, SelectionSource::Picker).unwrap();

        let mut count = 0;
        selection.confirm(|_| count += 1);
        selection.set_busy(true);
        selection.set_busy(false);
        selection.confirm(|_| count += 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_failure_before_busy_sync_unlocks_controls() {
        let file = candidate("dog.jpg", "image/jpeg", 10);
        let mut selection = UploadSelection::new();
        selection.select(file.clone(), SelectionSource::Picker).unwrap();

        let mut count = 0;
        assert!(selection.confirm(|_| count += 1));
        assert!(!selection.controls_enabled());

        selection.set_busy(false);
        assert!(selection.controls_enabled());
        assert!(selection.cancel());
        assert!(selection.select(file, SelectionSource::Drop).is_ok());
        assert!(selection.confirm(|_| count += 1));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            UploadRejection::TooLarge { size: 11 * 1024 * 1024 }.to_string(),
            "The image must be at most 10 MB (selected file is 11.00 MB)."
        );
        let gif = validate("image/gif", 10).unwrap_err();
        assert_eq!(gif.to_string(), "Please select a JPEG, PNG or WebP image.");
        let err: &dyn std::error::Error = &UploadRejection::Busy;
        assert_eq!(err.to_string(), "Please wait for the current upload to finish.");
    }

    #[test]
    fn test_rejection_keeps_previous_pending_file() {
        let good = candidate("ok.png", "image/png", 10);
        let mut selection = UploadSelection::new();
        selection.select(good.clone(), SelectionSource::Picker).unwrap();
        assert!(selection.select(candidate("bad.gif", "image/gif", 10), SelectionSource::Drop).is_err());
        assert_eq!(selection.pending().unwrap().file, good);
    }

    #[test]
    fn test_cancel_discards_without_upload() {
        let file = candidate("ok.png", "image/png", 10);
        let mut selection = UploadSelection::new();
        selection.select(file.clone(), SelectionSource::Picker).unwrap();
        assert!(selection.cancel());
        assert!(selection.pending().is_none());
        assert!(!selection.set_preview(&file.path, PreviewState::Failed("x".into())));

        let called = Cell::new(false);
        assert!(!selection.confirm(|_| called.set(true)));
        assert!(!called.get());
    }

    #[test]
    fn test_busy_disables_controls() {
        let file = candidate("ok.png", "image/png", 10);
        let mut selection = UploadSelection::new();
        selection.select(file.clone(), SelectionSource::Picker).unwrap();
        selection.set_busy(true);

        assert!(!selection.controls_enabled());
        assert!(!selection.cancel());
        assert_eq!(
            selection.select(file, SelectionSource::Drop).unwrap_err(),
            UploadRejection::Busy
        );
        assert!(selection.pending().is_some());
    }

    #[test]
    fn test_stale_preview_is_ignored() {
        let first = candidate("one.png", "image/png", 10);
        let second = candidate("two.png", "image/png", 10);
        let mut selection = UploadSelection::new();
        selection.select(first.clone(), SelectionSource::Picker).unwrap();
        selection.select(second, SelectionSource::Picker).unwrap();

        assert!(!selection.set_preview(&first.path, PreviewState::Ready(PreviewInfo { width: 1, height: 1 })));
        assert_eq!(selection.pending().unwrap().preview, PreviewState::Decoding);
    }

    #[test]
    fn test_progress_label_for_every_percentage() {
        for p in 0..=100u8 {
            let display = ProgressDisplay::new(true, p);
            assert_eq!(display.label().unwrap(), format!("Uploading... {}%", p));
        }
        assert_eq!(ProgressDisplay::new(true, 0), ProgressDisplay::Indeterminate);
        assert_eq!(ProgressDisplay::new(false, 50).label(), None);
        assert_eq!(ProgressDisplay::new(true, 250), ProgressDisplay::Determinate(100));
    }

    #[test]
    fn test_candidate_from_path() {
        let dir = std::env::temp_dir().join(format!("pixrec-upload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.PNG");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let candidate = UploadCandidate::from_path(&path).unwrap();
        assert_eq!(candidate.name, "sample.PNG");
        assert_eq!(candidate.size, 2048);
        assert_eq!(candidate.mime_type, "image/png");
        assert!(UploadCandidate::from_path(&dir).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
