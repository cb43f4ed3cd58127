//! Page flows: the state machines behind the upload, gallery and
//! recommendations pages.
//!
//! Workers are plain blocking functions that run a request against an
//! [`ImageApi`] and send tagged results over an `mpsc` channel. Pages spawn
//! them on `std::thread`, poll the receiver and feed every message to the
//! flow's `apply`, which updates the [`Store`] and returns the side effects
//! (toasts, follow-up requests, delayed navigation) for the page to carry out.

use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use chrono::Utc;

use crate::api_client::ImageApi;
use crate::error::{ApiError, ApiResult};
use crate::gallery::GalleryPager;
use crate::models::{Image, ImagePage, ProcessAck, RecommendationsResponse, UploadResponse};
use crate::notification::Notification;
use crate::progress::ProgressFn;
use crate::request::{RequestToken, RequestTracker, Tagged};
use crate::routes::Route;
use crate::store::Store;
use crate::upload::UploadCandidate;

pub const RECOMMENDATION_LIMIT: u32 = 12;
pub const RECOMMENDATION_THRESHOLD: f64 = 0.6;

/// Delay before leaving the upload page after processing succeeded.
pub const NAVIGATE_AFTER_SUCCESS: Duration = Duration::from_secs(1);
/// Delay after processing failed, so the warning can be read.
pub const NAVIGATE_AFTER_PROCESSING_FAILURE: Duration = Duration::from_secs(2);

/// Something the page must do after applying an update.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEffect {
    Notify(Notification),
    /// Start server-side processing of a freshly uploaded image
    Process { image_id: String, token: RequestToken },
    NavigateAfter { route: Route, delay: Duration },
}

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    FileSelected,
    Uploading,
    Processing { image_id: String },
    /// Navigation to the recommendations page has been scheduled
    Finished { image_id: String },
}

#[derive(Debug)]
pub enum UploadUpdate {
    Progress(u8),
    Uploaded(UploadResponse),
    UploadFailed(ApiError),
    Processed(ApiResult<ProcessAck>),
}

/// Upload `file`, reporting progress and the outcome on `tx`.
pub fn upload_worker(
    api: &dyn ImageApi,
    file: &UploadCandidate,
    token: RequestToken,
    tx: &Sender<Tagged<UploadUpdate>>,
) {
    let progress_tx = tx.clone();
    let on_progress: ProgressFn = Box::new(move |pct: u8| {
        let _ = progress_tx.send(Tagged::new(token, UploadUpdate::Progress(pct)));
    });
    let update = match api.upload_image(file, Some(on_progress)) {
        Ok(response) => UploadUpdate::Uploaded(response),
        Err(e) => UploadUpdate::UploadFailed(e),
    };
    let _ = tx.send(Tagged::new(token, update));
}

/// Trigger processing of `image_id` and report the outcome on `tx`.
pub fn process_worker(
    api: &dyn ImageApi,
    image_id: &str,
    token: RequestToken,
    tx: &Sender<Tagged<UploadUpdate>>,
) {
    let result = api.process_image(image_id);
    let _ = tx.send(Tagged::new(token, UploadUpdate::Processed(result)));
}

/// `idle → file selected → uploading → processing → finished`.
///
/// Only one upload runs at a time. An upload failure returns to idle; a
/// processing failure still finishes, with a warning.
#[derive(Debug, Default)]
pub struct UploadFlow {
    phase: UploadPhase,
    tracker: RequestTracker,
    file: Option<UploadCandidate>,
}

impl UploadFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    /// A worker is still running for the current file.
    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, UploadPhase::Uploading | UploadPhase::Processing { .. })
    }

    /// No new file may be selected or submitted. `Finished` counts as busy
    /// until `reset`, since the uploaded file is still pending in the widget.
    pub fn is_busy(&self) -> bool {
        self.is_in_flight() || matches!(self.phase, UploadPhase::Finished { .. })
    }

    pub fn file_selected(&mut self) {
        if !self.is_busy() {
            self.phase = UploadPhase::FileSelected;
        }
    }

    pub fn selection_cleared(&mut self) {
        if !self.is_busy() {
            self.phase = UploadPhase::Idle;
        }
    }

    /// Start uploading a confirmed file. Returns the token the worker must
    /// tag its messages with, or `None` while another upload is running.
    pub fn begin_upload(&mut self, file: UploadCandidate, store: &mut Store) -> Option<RequestToken> {
        if self.is_busy() || store.is_uploading {
            log::warn!("Upload of {} ignored: another upload is in flight", file.name);
            return None;
        }
        log::info!("Upload confirmed: {} ({})", file.name, file.size_display());
        store.set_uploading(true);
        store.set_upload_progress(0);
        self.file = Some(file);
        self.phase = UploadPhase::Uploading;
        Some(self.tracker.begin())
    }

    pub fn apply(&mut self, update: Tagged<UploadUpdate>, store: &mut Store) -> Vec<FlowEffect> {
        let token = update.token;
        let Some(update) = update.accept(&self.tracker) else {
            return Vec::new();
        };

        match update {
            UploadUpdate::Progress(pct) => {
                if self.phase == UploadPhase::Uploading {
                    store.set_upload_progress(pct);
                }
                Vec::new()
            }
            UploadUpdate::Uploaded(response) => {
                store.set_uploading(false);
                store.set_upload_progress(0);

                let image_id = response.data.id.clone();
                if let Some(file) = self.file.take() {
                    store.add_image(Image::from_upload(
                        &response.data,
                        &file.name,
                        file.size,
                        &file.mime_type,
                        Utc::now(),
                    ));
                }
                log::info!("Uploaded image {}", image_id);

                store.set_processing(true);
                self.phase = UploadPhase::Processing { image_id: image_id.clone() };
                vec![
                    FlowEffect::Notify(Notification::success("Image uploaded successfully!")),
                    FlowEffect::Process { image_id, token },
                ]
            }
            UploadUpdate::UploadFailed(error) => {
                store.set_uploading(false);
                store.set_upload_progress(0);
                self.file = None;
                self.phase = UploadPhase::Idle;
                vec![FlowEffect::Notify(Notification::from_api_error(
                    "Upload failed.",
                    &error,
                ))]
            }
            UploadUpdate::Processed(result) => {
                store.set_processing(false);
                let image_id = match &self.phase {
                    UploadPhase::Processing { image_id } => image_id.clone(),
                    _ => return Vec::new(),
                };
                let route = Route::recommendations(image_id.clone());
                self.phase = UploadPhase::Finished { image_id };
                match result {
                    Ok(_) => vec![
                        FlowEffect::Notify(Notification::success("Image processed successfully!")),
                        FlowEffect::NavigateAfter { route, delay: NAVIGATE_AFTER_SUCCESS },
                    ],
                    Err(e) => {
                        log::warn!("Processing failed, navigating anyway: {}", e);
                        vec![
                            FlowEffect::Notify(Notification::warning(
                                "Image processing failed. Recommendations may be limited.",
                            )),
                            FlowEffect::NavigateAfter {
                                route,
                                delay: NAVIGATE_AFTER_PROCESSING_FAILURE,
                            },
                        ]
                    }
                }
            }
        }
    }

    /// Back to idle once the scheduled navigation has happened.
    pub fn reset(&mut self) {
        if !self.is_in_flight() {
            self.phase = UploadPhase::Idle;
            self.file = None;
        }
    }
}

// ─── Gallery ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryRequest {
    pub token: RequestToken,
    pub page: u32,
    pub limit: u32,
}

pub fn gallery_worker(
    api: &dyn ImageApi,
    request: GalleryRequest,
    tx: &Sender<Tagged<(u32, ApiResult<ImagePage>)>>,
) {
    let result = api.list_images(request.page, request.limit);
    let _ = tx.send(Tagged::new(request.token, (request.page, result)));
}

#[derive(Debug, Default)]
pub struct GalleryFlow {
    tracker: RequestTracker,
    pager: GalleryPager,
    loading: bool,
    loaded_once: bool,
}

impl GalleryFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the first page, superseding anything in flight.
    pub fn refresh(&mut self) -> GalleryRequest {
        self.pager.reset();
        self.loading = true;
        GalleryRequest {
            token: self.tracker.begin(),
            page: self.pager.next_page(),
            limit: self.pager.limit(),
        }
    }

    /// Request the next page, unless one is loading or there are no more.
    pub fn load_more(&mut self) -> Option<GalleryRequest> {
        if self.loading || !self.pager.has_more() {
            return None;
        }
        self.loading = true;
        Some(GalleryRequest {
            token: self.tracker.begin(),
            page: self.pager.next_page(),
            limit: self.pager.limit(),
        })
    }

    pub fn apply(
        &mut self,
        update: Tagged<(u32, ApiResult<ImagePage>)>,
        store: &mut Store,
    ) -> Vec<FlowEffect> {
        let Some((page, result)) = update.accept(&self.tracker) else {
            return Vec::new();
        };
        self.loading = false;
        match result {
            Ok(images) => {
                self.pager.apply(page, images, &mut store.images);
                self.loaded_once = true;
                Vec::new()
            }
            Err(e) => vec![FlowEffect::Notify(Notification::from_api_error(
                "Failed to load gallery.",
                &e,
            ))],
        }
    }

    pub fn cancel(&mut self) {
        self.tracker.invalidate();
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more()
    }

    pub fn loaded_once(&self) -> bool {
        self.loaded_once
    }

    pub fn total(&self) -> u64 {
        self.pager.total()
    }
}

// ─── Recommendations ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationsRequest {
    pub token: RequestToken,
    pub image_id: String,
    /// The store has no cached copy of the reference image
    pub fetch_image: bool,
}

#[derive(Debug)]
pub enum RecommendationsUpdate {
    Image(ApiResult<Image>),
    Recommendations(ApiResult<RecommendationsResponse>),
}

/// Fetch the reference image if needed, then its recommendations.
pub fn recommendations_worker(
    api: &dyn ImageApi,
    request: &RecommendationsRequest,
    tx: &Sender<Tagged<RecommendationsUpdate>>,
) {
    if request.fetch_image {
        let result = api.get_image(&request.image_id);
        let failed = result.is_err();
        let _ = tx.send(Tagged::new(request.token, RecommendationsUpdate::Image(result)));
        if failed {
            return;
        }
    }
    let result = api.get_recommendations(
        &request.image_id,
        RECOMMENDATION_LIMIT,
        RECOMMENDATION_THRESHOLD,
    );
    let _ = tx.send(Tagged::new(request.token, RecommendationsUpdate::Recommendations(result)));
}

#[derive(Debug, Default)]
pub struct RecommendationsFlow {
    tracker: RequestTracker,
    image_id: Option<String>,
    loading: bool,
    message: Option<String>,
    failed: bool,
}

impl RecommendationsFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, image_id: &str, store: &mut Store) -> RecommendationsRequest {
        let fetch_image = store
            .current_image
            .as_ref()
            .map_or(true, |current| current.id != image_id);
        if fetch_image {
            // The list belongs to another image
            store.clear_recommendations();
            if let Some(cached) = store.find_image(image_id).cloned() {
                store.set_current_image(Some(cached));
            }
        }
        self.image_id = Some(image_id.to_string());
        self.loading = true;
        self.message = None;
        self.failed = false;
        RecommendationsRequest {
            token: self.tracker.begin(),
            image_id: image_id.to_string(),
            fetch_image,
        }
    }

    pub fn apply(&mut self, update: Tagged<RecommendationsUpdate>, store: &mut Store) -> Vec<FlowEffect> {
        let Some(update) = update.accept(&self.tracker) else {
            return Vec::new();
        };
        match update {
            RecommendationsUpdate::Image(Ok(image)) => {
                store.set_current_image(Some(image));
                Vec::new()
            }
            RecommendationsUpdate::Recommendations(Ok(response)) => {
                self.loading = false;
                self.message = response.data.message.clone();
                log::info!(
                    "Loaded {} recommendations in {:.0} ms",
                    response.data.recommendations.len(),
                    response.data.processing_time_ms
                );
                store.set_recommendations(response.data.recommendations);
                Vec::new()
            }
            RecommendationsUpdate::Image(Err(e)) | RecommendationsUpdate::Recommendations(Err(e)) => {
                self.loading = false;
                self.failed = true;
                vec![FlowEffect::Notify(Notification::from_api_error(
                    "Failed to load recommendations.",
                    &e,
                ))]
            }
        }
    }

    pub fn cancel(&mut self) {
        self.tracker.invalidate();
        self.loading = false;
    }

    pub fn image_id(&self) -> Option<&str> {
        self.image_id.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Server note, e.g. that the reference image is still processing
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Shown in the reference panel while no matching image is cached.
    pub fn reference_placeholder(&self) -> &'static str {
        if self.failed {
            "Image could not be loaded."
        } else {
            "Loading image..."
        }
    }

    pub fn empty_state_text(&self, store: &Store) -> Option<String> {
        if self.loading || !store.recommendations.is_empty() {
            return None;
        }
        if self.failed {
            return Some("Could not load recommendations. Go back and try again.".to_string());
        }
        Some(
            self.message
                .clone()
                .unwrap_or_else(|| "No similar images found.".to_string()),
        )
    }
}

// ─── Recommendation actions ───────────────────────────────────────────────────

/// Download the asset at `url` to `dest`.
pub fn save_image(api: &dyn ImageApi, url: &str, dest: &Path) -> ApiResult<()> {
    let bytes = api.fetch_bytes(url)?;
    std::fs::write(dest, bytes).map_err(|e| {
        log::error!("save_image failed writing {:?}: {}", dest, e);
        ApiError::Io(e)
    })
}

/// Absolute link to share for an asset URL.
pub fn share_link(store: &Store, url: &str) -> String {
    store
        .config
        .resolve_asset_url(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::models::tests::sample_image;
    use crate::models::{ProcessingStatus, Recommendation, RecommendationsData, Stats, UploadData};
    use crate::notification::NotificationLevel;
    use std::path::PathBuf;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::{Arc, Mutex};

    /// Records every call; failures are switched on per operation.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub calls: Mutex<Vec<String>>,
        pub fail_upload: bool,
        pub fail_process: bool,
        pub fail_get_image: bool,
        pub total_images: u64,
    }

    fn server_error(path: &str) -> ApiError {
        ApiError::Status { url: path.to_string(), status: 500, body: String::new() }
    }

    impl FakeApi {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl ImageApi for FakeApi {
        fn upload_image(
            &self,
            file: &UploadCandidate,
            on_progress: Option<ProgressFn>,
        ) -> ApiResult<UploadResponse> {
            self.record(format!("upload:{}", file.name));
            if let Some(mut on_progress) = on_progress {
                on_progress(50);
                on_progress(100);
            }
            if self.fail_upload {
                return Err(server_error("/images/upload"));
            }
            Ok(UploadResponse {
                success: true,
                data: UploadData {
                    id: "abc".to_string(),
                    filename: "abc.jpg".to_string(),
                    url: "/uploads/abc.jpg".to_string(),
                    processing_status: ProcessingStatus::Pending,
                },
            })
        }

        fn list_images(&self, page: u32, limit: u32) -> ApiResult<ImagePage> {
            self.record(format!("list:{page}:{limit}"));
            Ok(ImagePage {
                images: (0..limit)
                    .map(|i| sample_image(&format!("p{page}-{i}")))
                    .collect(),
                total: self.total_images,
                page: Some(page),
                limit: Some(limit),
            })
        }

        fn get_image(&self, id: &str) -> ApiResult<Image> {
            self.record(format!("get:{id}"));
            if self.fail_get_image {
                return Err(ApiError::NotFound(id.to_string()));
            }
            Ok(sample_image(id))
        }

        fn get_recommendations(
            &self,
            id: &str,
            limit: u32,
            threshold: f64,
        ) -> ApiResult<RecommendationsResponse> {
            self.record(format!("recommendations:{id}:{limit}:{threshold}"));
            Ok(RecommendationsResponse {
                success: true,
                data: RecommendationsData {
                    recommendations: vec![
                        Recommendation {
                            image: sample_image("r1"),
                            similarity_score: 0.9,
                            explanation: "Similar colors".to_string(),
                        },
                        Recommendation {
                            image: sample_image("r2"),
                            similarity_score: 0.7,
                            explanation: "Similar tags".to_string(),
                        },
                    ],
                    processing_time_ms: 12.0,
                    message: None,
                },
            })
        }

        fn process_image(&self, id: &str) -> ApiResult<ProcessAck> {
            self.record(format!("process:{id}"));
            if self.fail_process {
                return Err(server_error("/images/process"));
            }
            Ok(ProcessAck { message: Some("ok".to_string()) })
        }

        fn get_stats(&self) -> ApiResult<Stats> {
            self.record("stats".to_string());
            Ok(Stats::default())
        }

        fn fetch_bytes(&self, url: &str) -> ApiResult<Vec<u8>> {
            self.record(format!("fetch:{url}"));
            Ok(b"bytes".to_vec())
        }
    }

    fn store_with(api: Arc<FakeApi>) -> Store {
        Store::with_api(ApiConfig::default(), api)
    }

    fn jpeg(name: &str, size: u64) -> UploadCandidate {
        UploadCandidate {
            path: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            size,
            mime_type: "image/jpeg".to_string(),
        }
    }

    fn drain<T>(rx: &Receiver<T>) -> Vec<T> {
        rx.try_iter().collect()
    }

    /// Run an upload to completion the way the page does, returning every
    /// effect in order.
    fn run_upload(api: &FakeApi, flow: &mut UploadFlow, store: &mut Store, file: UploadCandidate) -> Vec<FlowEffect> {
        let (tx, rx) = mpsc::channel();
        let token = flow.begin_upload(file.clone(), store).unwrap();
        upload_worker(api, &file, token, &tx);

        let mut effects = Vec::new();
        let mut queue = drain(&rx);
        while !queue.is_empty() {
            for update in queue {
                for effect in flow.apply(update, store) {
                    if let FlowEffect::Process { image_id, token } = &effect {
                        process_worker(api, image_id, *token, &tx);
                    }
                    effects.push(effect);
                }
            }
            queue = drain(&rx);
        }
        effects
    }

    #[test]
    fn test_upload_then_process_then_navigate() {
        let api = Arc::new(FakeApi::default());
        let mut store = store_with(api.clone());
        let mut flow = UploadFlow::new();

        let effects = run_upload(&api, &mut flow, &mut store, jpeg("holiday.jpg", 2 * 1024 * 1024));

        assert_eq!(api.calls(), vec!["upload:holiday.jpg", "process:abc"]);
        assert_eq!(store.images[0].id, "abc");
        assert_eq!(store.images[0].width, 0);
        assert_eq!(store.images[0].thumbnail_url, "/uploads/abc.jpg");
        assert_eq!(store.images[0].original_name, "holiday.jpg");
        assert!(!store.is_uploading);
        assert!(!store.is_processing);
        assert_eq!(store.upload_progress, 0);

        assert_eq!(
            effects.last(),
            Some(&FlowEffect::NavigateAfter {
                route: Route::recommendations("abc"),
                delay: NAVIGATE_AFTER_SUCCESS,
            })
        );
        assert_eq!(Route::recommendations("abc").to_string(), "/recommendations/abc");
        assert_eq!(flow.phase(), &UploadPhase::Finished { image_id: "abc".to_string() });
    }

    #[test]
    fn test_progress_reaches_store() {
        let api = FakeApi::default();
        let mut store = Store::default();
        let mut flow = UploadFlow::new();
        let file = jpeg("a.jpg", 10);
        let (tx, rx) = mpsc::channel();
        let token = flow.begin_upload(file.clone(), &mut store).unwrap();
        assert!(store.is_uploading);

        upload_worker(&api, &file, token, &tx);
        let mut updates = drain(&rx).into_iter();
        flow.apply(updates.next().unwrap(), &mut store);
        assert_eq!(store.upload_progress, 50);
        flow.apply(updates.next().unwrap(), &mut store);
        assert_eq!(store.upload_progress, 100);
    }

    #[test]
    fn test_upload_failure_returns_to_idle() {
        let api = Arc::new(FakeApi { fail_upload: true, ..Default::default() });
        let mut store = store_with(api.clone());
        let mut flow = UploadFlow::new();

        let effects = run_upload(&api, &mut flow, &mut store, jpeg("x.jpg", 100));

        assert_eq!(api.calls(), vec!["upload:x.jpg"]);
        assert!(store.images.is_empty());
        assert!(!store.is_uploading);
        assert_eq!(flow.phase(), &UploadPhase::Idle);
        assert!(matches!(
            effects.as_slice(),
            [FlowEffect::Notify(n)] if n.level == NotificationLevel::Error
        ));
    }

    #[test]
    fn test_processing_failure_still_navigates() {
        let api = Arc::new(FakeApi { fail_process: true, ..Default::default() });
        let mut store = store_with(api.clone());
        let mut flow = UploadFlow::new();

        let effects = run_upload(&api, &mut flow, &mut store, jpeg("x.jpg", 100));

        assert!(effects.iter().any(|e| matches!(
            e,
            FlowEffect::Notify(n) if n.level == NotificationLevel::Warning
        )));
        assert_eq!(
            effects.last(),
            Some(&FlowEffect::NavigateAfter {
                route: Route::recommendations("abc"),
                delay: NAVIGATE_AFTER_PROCESSING_FAILURE,
            })
        );
        assert_eq!(store.images[0].id, "abc");
    }

    #[test]
    fn test_finished_upload_cannot_be_resubmitted() {
        let api = Arc::new(FakeApi::default());
        let mut store = store_with(api.clone());
        let mut flow = UploadFlow::new();
        let file = jpeg("holiday.jpg", 1024);

        run_upload(&api, &mut flow, &mut store, file.clone());
        assert!(matches!(flow.phase(), UploadPhase::Finished { .. }));
        assert!(flow.is_busy());
        assert!(!flow.is_in_flight());
        assert!(flow.begin_upload(file.clone(), &mut store).is_none());
        assert_eq!(api.calls(), vec!["upload:holiday.jpg", "process:abc"]);
        assert_eq!(store.images.len(), 1);

        flow.reset();
        assert_eq!(flow.phase(), &UploadPhase::Idle);
        assert!(flow.begin_upload(file, &mut store).is_some());
    }

    #[test]
    fn test_reset_keeps_upload_in_flight() {
        let mut store = Store::default();
        let mut flow = UploadFlow::new();
        flow.begin_upload(jpeg("a.jpg", 1), &mut store).unwrap();
        flow.reset();
        assert_eq!(flow.phase(), &UploadPhase::Uploading);
    }

    #[test]
    fn test_single_upload_in_flight() {
        let mut store = Store::default();
        let mut flow = UploadFlow::new();
        assert!(flow.begin_upload(jpeg("a.jpg", 1), &mut store).is_some());
        assert!(flow.begin_upload(jpeg("b.jpg", 1), &mut store).is_none());
    }

    #[test]
    fn test_recommendations_use_limit_and_threshold() {
        let api = Arc::new(FakeApi::default());
        let mut store = store_with(api.clone());
        let mut flow = RecommendationsFlow::new();
        let (tx, rx) = mpsc::channel();

        let request = flow.begin("x", &mut store);
        assert!(request.fetch_image);
        recommendations_worker(api.as_ref(), &request, &tx);
        for update in drain(&rx) {
            assert!(flow.apply(update, &mut store).is_empty());
        }

        assert_eq!(api.calls(), vec!["get:x", "recommendations:x:12:0.6"]);
        assert_eq!(store.current_image.as_ref().unwrap().id, "x");
        let order: Vec<_> = store.recommendations.iter().map(|r| r.image.id.as_str()).collect();
        assert_eq!(order, vec!["r1", "r2"]);
        assert!(!flow.is_loading());
        assert_eq!(flow.empty_state_text(&store), None);
    }

    #[test]
    fn test_cached_current_image_is_not_refetched() {
        let api = Arc::new(FakeApi::default());
        let mut store = store_with(api.clone());
        store.set_current_image(Some(sample_image("x")));
        let mut flow = RecommendationsFlow::new();
        let (tx, _rx) = mpsc::channel();

        let request = flow.begin("x", &mut store);
        assert!(!request.fetch_image);
        recommendations_worker(api.as_ref(), &request, &tx);
        assert_eq!(api.calls(), vec!["recommendations:x:12:0.6"]);
    }

    #[test]
    fn test_missing_image_stops_before_recommendations() {
        let api = Arc::new(FakeApi { fail_get_image: true, ..Default::default() });
        let mut store = store_with(api.clone());
        let mut flow = RecommendationsFlow::new();
        let (tx, rx) = mpsc::channel();

        let request = flow.begin("gone", &mut store);
        recommendations_worker(api.as_ref(), &request, &tx);
        let effects: Vec<_> = drain(&rx)
            .into_iter()
            .flat_map(|u| flow.apply(u, &mut store))
            .collect();

        assert_eq!(api.calls(), vec!["get:gone"]);
        assert_eq!(effects.len(), 1);
        assert!(flow.failed());
        assert!(!flow.is_loading());
        assert_eq!(flow.reference_placeholder(), "Image could not be loaded.");
        let empty = flow.empty_state_text(&store).unwrap();
        assert!(empty.starts_with("Could not load recommendations."), "{empty}");

        flow.begin("gone", &mut store);
        assert!(!flow.failed());
        assert_eq!(flow.reference_placeholder(), "Loading image...");
    }

    #[test]
    fn test_gallery_copy_seeds_reference_image() {
        let api = Arc::new(FakeApi::default());
        let mut store = store_with(api.clone());
        let mut listed = sample_image("g1");
        listed.width = 640;
        store.set_images(vec![sample_image("g0"), listed]);
        let mut flow = RecommendationsFlow::new();

        let request = flow.begin("g1", &mut store);
        assert!(request.fetch_image);
        assert_eq!(store.current_image.as_ref().map(|i| i.width), Some(640));
        assert_eq!(flow.reference_placeholder(), "Loading image...");
    }

    #[test]
    fn test_stale_recommendations_are_discarded() {
        let api = Arc::new(FakeApi::default());
        let mut store = store_with(api.clone());
        let mut flow = RecommendationsFlow::new();
        let (tx, rx) = mpsc::channel();

        let first = flow.begin("a", &mut store);
        let second = flow.begin("b", &mut store);
        recommendations_worker(api.as_ref(), &first, &tx);
        for update in drain(&rx) {
            flow.apply(update, &mut store);
        }
        assert!(store.current_image.is_none());
        assert!(store.recommendations.is_empty());
        assert!(flow.is_loading());

        recommendations_worker(api.as_ref(), &second, &tx);
        for update in drain(&rx) {
            flow.apply(update, &mut store);
        }
        assert_eq!(store.current_image.as_ref().unwrap().id, "b");
    }

    #[test]
    fn test_gallery_pages_append() {
        let api = Arc::new(FakeApi { total_images: 30, ..Default::default() });
        let mut store = store_with(api.clone());
        let mut flow = GalleryFlow::new();
        let (tx, rx) = mpsc::channel();

        gallery_worker(api.as_ref(), flow.refresh(), &tx);
        assert!(flow.load_more().is_none());
        for update in drain(&rx) {
            flow.apply(update, &mut store);
        }
        assert_eq!(store.images.len(), 12);
        assert!(flow.has_more());

        let next = flow.load_more().unwrap();
        assert_eq!(next.page, 2);
        gallery_worker(api.as_ref(), next, &tx);
        for update in drain(&rx) {
            flow.apply(update, &mut store);
        }
        assert_eq!(store.images.len(), 24);
        assert_eq!(store.images[12].id, "p2-0");
        assert_eq!(api.calls(), vec!["list:1:12", "list:2:12"]);
    }

    #[test]
    fn test_save_image_writes_bytes() {
        let api = FakeApi::default();
        let dest = std::env::temp_dir().join(format!("pixrec-save-{}.jpg", std::process::id()));
        save_image(&api, "/uploads/a.jpg", &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"bytes");
        std::fs::remove_file(&dest).ok();
    }

    #[test]
    fn test_share_link_is_absolute() {
        let store = Store::default();
        assert_eq!(share_link(&store, "/uploads/a.jpg"), "http://localhost:8000/uploads/a.jpg");
    }
}
