pub mod api_client;
pub mod config;
pub mod error;
pub mod flows;
pub mod gallery;
pub mod models;
pub mod notification;
pub mod preview;
pub mod progress;
pub mod request;
pub mod routes;
pub mod store;
pub mod thumbnails;
pub mod upload;

pub use api_client::{ImageApi, ImageApiClient};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use flows::{
    FlowEffect, GalleryFlow, GalleryRequest, RecommendationsFlow, RecommendationsRequest,
    RecommendationsUpdate, UploadFlow, UploadPhase, UploadUpdate,
};
pub use gallery::{filter_images, GalleryFilter, GalleryPager, PAGE_SIZE};
pub use models::{
    ColorInfo, Image, ImageMetadata, ImagePage, ProcessAck, ProcessingStatus, Recommendation,
    RecommendationsData, RecommendationsResponse, Stats, TagCount, UploadData, UploadResponse,
};
pub use notification::{Notification, NotificationLevel};
pub use preview::{spawn_preview, DecodedPreview, PreviewInfo};
pub use request::{RequestToken, RequestTracker, Tagged};
pub use routes::Route;
pub use store::{Store, StoreAction};
pub use thumbnails::{ThumbnailCache, ThumbnailData, ThumbnailFormat, ThumbnailState};
pub use upload::{
    PendingUpload, PreviewState, ProgressDisplay, SelectionSource, UploadCandidate,
    UploadRejection, UploadSelection,
};
