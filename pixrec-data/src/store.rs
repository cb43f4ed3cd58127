use makepad_widgets::*;
use std::sync::Arc;

use crate::api_client::{ImageApi, ImageApiClient};
use crate::config::ApiConfig;
use crate::models::{Image, Recommendation};

/// Actions that can be dispatched to modify the Store
#[derive(Clone, Debug, DefaultNone)]
pub enum StoreAction {
    /// Replace the whole image list
    SetImages(Vec<Image>),
    /// Insert a newly uploaded image at the front
    AddImage(Image),
    SetCurrentImage(Option<Image>),
    SetRecommendations(Vec<Recommendation>),
    ClearRecommendations,
    SetUploading(bool),
    SetProcessing(bool),
    /// Upload percentage; values above 100 are clamped
    SetUploadProgress(u8),
    /// No action
    None,
}

/// Central state container for the application
///
/// The Store holds the session's image state and the API handle. It is
/// passed down to pages via Makepad's Scope mechanism and is never
/// persisted.
///
/// # Usage
///
/// In App's handle_event:
/// ```rust,ignore
/// let scope = &mut Scope::with_data(&mut self.store);
/// self.ui.handle_event(cx, event, scope);
/// ```
///
/// In pages:
/// ```rust,ignore
/// if let Some(store) = scope.data.get_mut::<Store>() {
///     store.add_image(image);
/// }
/// ```
pub struct Store {
    /// Images known to the client; newest uploads first
    pub images: Vec<Image>,

    /// Image whose recommendations are being viewed
    pub current_image: Option<Image>,

    /// Recommendations for `current_image`, in server order
    pub recommendations: Vec<Recommendation>,

    pub is_uploading: bool,

    /// Server-side processing of the last upload is running
    pub is_processing: bool,

    /// Upload percentage in `[0,100]`
    pub upload_progress: u8,

    pub config: ApiConfig,

    api: Arc<dyn ImageApi>,
}

impl Default for Store {
    fn default() -> Self {
        let config = ApiConfig::default();
        let api = Arc::new(ImageApiClient::new(config.clone()));
        Self::with_api(config, api)
    }
}

impl Store {
    /// Create the Store from the resolved configuration
    pub fn load() -> Self {
        let config = ApiConfig::load();
        let api = Arc::new(ImageApiClient::new(config.clone()));
        Self::with_api(config, api)
    }

    pub fn with_api(config: ApiConfig, api: Arc<dyn ImageApi>) -> Self {
        Self {
            images: Vec::new(),
            current_image: None,
            recommendations: Vec::new(),
            is_uploading: false,
            is_processing: false,
            upload_progress: 0,
            config,
            api,
        }
    }

    /// Shared handle for background workers
    pub fn api(&self) -> Arc<dyn ImageApi> {
        Arc::clone(&self.api)
    }

    pub fn set_images(&mut self, images: Vec<Image>) {
        self.images = images;
    }

    pub fn add_image(&mut self, image: Image) {
        self.images.insert(0, image);
    }

    pub fn set_current_image(&mut self, image: Option<Image>) {
        self.current_image = image;
    }

    pub fn set_recommendations(&mut self, recommendations: Vec<Recommendation>) {
        self.recommendations = recommendations;
    }

    pub fn clear_recommendations(&mut self) {
        self.recommendations.clear();
    }

    pub fn set_uploading(&mut self, uploading: bool) {
        self.is_uploading = uploading;
    }

    pub fn set_processing(&mut self, processing: bool) {
        self.is_processing = processing;
    }

    pub fn set_upload_progress(&mut self, progress: u8) {
        self.upload_progress = progress.min(100);
    }

    /// Cached image with this id, checking the current image first
    pub fn find_image(&self, id: &str) -> Option<&Image> {
        self.current_image
            .as_ref()
            .filter(|image| image.id == id)
            .or_else(|| self.images.iter().find(|image| image.id == id))
    }

    /// Handle a StoreAction and update state accordingly
    pub fn handle_action(&mut self, action: &StoreAction) {
        match action {
            StoreAction::SetImages(images) => {
                self.set_images(images.clone());
            }
            StoreAction::AddImage(image) => {
                self.add_image(image.clone());
            }
            StoreAction::SetCurrentImage(image) => {
                self.set_current_image(image.clone());
            }
            StoreAction::SetRecommendations(recommendations) => {
                self.set_recommendations(recommendations.clone());
            }
            StoreAction::ClearRecommendations => {
                self.clear_recommendations();
            }
            StoreAction::SetUploading(uploading) => {
                self.set_uploading(*uploading);
            }
            StoreAction::SetProcessing(processing) => {
                self.set_processing(*processing);
            }
            StoreAction::SetUploadProgress(progress) => {
                self.set_upload_progress(*progress);
            }
            StoreAction::None => {}
        }
    }
}
