//! Blocking HTTP client for the image recommendation API.
//!
//!   POST /images/upload                                   → UploadResponse
//!   GET  /images?page&limit                               → ImagePage
//!   GET  /images/{id}                                     → Image
//!   GET  /images/{id}/recommendations?limit&threshold     → RecommendationsResponse
//!   POST /images/{id}/process                             → ProcessAck
//!   GET  /stats                                           → Stats
//!
//! All calls block the calling thread. Run them inside `std::thread::spawn`.

use std::fs::File;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{Image, ImagePage, ProcessAck, RecommendationsResponse, Stats, UploadResponse};
use crate::progress::{ProgressFn, ProgressReader};
use crate::upload::UploadCandidate;

/// Multipart field the server reads the file from.
pub const UPLOAD_FIELD: &str = "image";

/// Operations the pages need from the API. Implemented over HTTP by
/// [`ImageApiClient`]; flows only see this trait.
pub trait ImageApi: Send + Sync {
    fn upload_image(
        &self,
        file: &UploadCandidate,
        on_progress: Option<ProgressFn>,
    ) -> ApiResult<UploadResponse>;

    fn list_images(&self, page: u32, limit: u32) -> ApiResult<ImagePage>;

    fn get_image(&self, id: &str) -> ApiResult<Image>;

    fn get_recommendations(
        &self,
        id: &str,
        limit: u32,
        threshold: f64,
    ) -> ApiResult<RecommendationsResponse>;

    fn process_image(&self, id: &str) -> ApiResult<ProcessAck>;

    fn get_stats(&self) -> ApiResult<Stats>;

    /// Raw bytes behind an asset URL as handed out by the API.
    fn fetch_bytes(&self, url: &str) -> ApiResult<Vec<u8>>;
}

// ─── URL building ─────────────────────────────────────────────────────────────

fn endpoint(base: &str, segments: &[&str]) -> ApiResult<Url> {
    let mut url = Url::parse(base).map_err(|_| ApiError::InvalidUrl(base.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub fn upload_url(base: &str) -> ApiResult<Url> {
    endpoint(base, &["images", "upload"])
}

pub fn list_images_url(base: &str, page: u32, limit: u32) -> ApiResult<Url> {
    let mut url = endpoint(base, &["images"])?;
    url.query_pairs_mut()
        .append_pair("page", &page.to_string())
        .append_pair("limit", &limit.to_string());
    Ok(url)
}

pub fn image_url(base: &str, id: &str) -> ApiResult<Url> {
    endpoint(base, &["images", id])
}

pub fn recommendations_url(base: &str, id: &str, limit: u32, threshold: f64) -> ApiResult<Url> {
    let mut url = endpoint(base, &["images", id, "recommendations"])?;
    url.query_pairs_mut()
        .append_pair("limit", &limit.to_string())
        .append_pair("threshold", &threshold.to_string());
    Ok(url)
}

pub fn process_url(base: &str, id: &str) -> ApiResult<Url> {
    endpoint(base, &["images", id, "process"])
}

pub fn stats_url(base: &str) -> ApiResult<Url> {
    endpoint(base, &["stats"])
}

// ─── Client ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ImageApiClient {
    config: ApiConfig,
    http: Client,
    upload_http: Client,
}

impl ImageApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let http = build_client(config.request_timeout_secs);
        let upload_http = build_client(config.upload_timeout_secs);
        Self { config, http, upload_http }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        log::debug!("GET {}", url);
        let resp = self
            .http
            .get(url.clone())
            .send()
            .map_err(|source| ApiError::Network { url: url.to_string(), source })?;
        decode(&url, check_status(&url, resp)?)
    }
}

impl Default for ImageApiClient {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("ImageApiClient: falling back to default client: {}", e);
            Client::new()
        })
}

fn check_status(url: &Url, resp: Response) -> ApiResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(ApiError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

fn decode<T: DeserializeOwned>(url: &Url, resp: Response) -> ApiResult<T> {
    let bytes = resp
        .bytes()
        .map_err(|source| ApiError::Network { url: url.to_string(), source })?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// A 404 from the single-image endpoint means the id does not exist.
fn not_found_as(id: &str, error: ApiError) -> ApiError {
    match error {
        ApiError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            ApiError::NotFound(id.to_string())
        }
        other => other,
    }
}

/// `success: false` in a 2xx envelope is still a failure.
fn require_success<T>(success: bool, response: T) -> ApiResult<T> {
    if success {
        Ok(response)
    } else {
        Err(ApiError::Rejected)
    }
}

/// One log line per failed call, then hand the error back untouched.
fn logged<T>(operation: &str, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(e) = &result {
        log::error!("{} failed: {}", operation, e);
    }
    result
}

impl ImageApi for ImageApiClient {
    fn upload_image(
        &self,
        file: &UploadCandidate,
        on_progress: Option<ProgressFn>,
    ) -> ApiResult<UploadResponse> {
        let result = (|| -> ApiResult<UploadResponse> {
            let url = upload_url(self.base_url())?;
            let reader = File::open(&file.path)?;
            let on_progress = on_progress.unwrap_or_else(|| Box::new(|_| {}));
            let body = ProgressReader::new(reader, file.size, on_progress);

            let part = multipart::Part::reader_with_length(body, file.size)
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|source| ApiError::Network { url: url.to_string(), source })?;
            let form = multipart::Form::new().part(UPLOAD_FIELD, part);

            log::info!("Uploading {} ({} bytes) to {}", file.name, file.size, url);
            let resp = self
                .upload_http
                .post(url.clone())
                .multipart(form)
                .send()
                .map_err(|source| ApiError::Network { url: url.to_string(), source })?;
            let response: UploadResponse = decode(&url, check_status(&url, resp)?)?;
            require_success(response.success, response)
        })();
        logged("upload_image", result)
    }

    fn list_images(&self, page: u32, limit: u32) -> ApiResult<ImagePage> {
        let result = list_images_url(self.base_url(), page, limit).and_then(|url| self.get_json(url));
        logged("list_images", result)
    }

    fn get_image(&self, id: &str) -> ApiResult<Image> {
        let result = image_url(self.base_url(), id)
            .and_then(|url| self.get_json(url))
            .map_err(|e| not_found_as(id, e));
        logged("get_image", result)
    }

    fn get_recommendations(
        &self,
        id: &str,
        limit: u32,
        threshold: f64,
    ) -> ApiResult<RecommendationsResponse> {
        let result = recommendations_url(self.base_url(), id, limit, threshold)
            .and_then(|url| self.get_json::<RecommendationsResponse>(url))
            .and_then(|response| require_success(response.success, response));
        logged("get_recommendations", result)
    }

    fn process_image(&self, id: &str) -> ApiResult<ProcessAck> {
        let result = (|| -> ApiResult<ProcessAck> {
            let url = process_url(self.base_url(), id)?;
            log::debug!("POST {}", url);
            let resp = self
                .http
                .post(url.clone())
                .send()
                .map_err(|source| ApiError::Network { url: url.to_string(), source })?;
            let bytes = check_status(&url, resp)?
                .bytes()
                .map_err(|source| ApiError::Network { url: url.to_string(), source })?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(ProcessAck::default());
            }
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
        })();
        logged("process_image", result)
    }

    fn get_stats(&self) -> ApiResult<Stats> {
        let result = stats_url(self.base_url()).and_then(|url| self.get_json(url));
        logged("get_stats", result)
    }

    fn fetch_bytes(&self, raw: &str) -> ApiResult<Vec<u8>> {
        let result = (|| -> ApiResult<Vec<u8>> {
            let url = self
                .config
                .resolve_asset_url(raw)
                .ok_or_else(|| ApiError::InvalidUrl(raw.to_string()))?;
            let resp = self
                .http
                .get(url.clone())
                .send()
                .map_err(|source| ApiError::Network { url: url.to_string(), source })?;
            let bytes = check_status(&url, resp)?
                .bytes()
                .map_err(|source| ApiError::Network { url: url.to_string(), source })?;
            Ok(bytes.to_vec())
        })();
        logged("fetch_bytes", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8000/api";

    #[test]
    fn test_recommendations_query_is_exact() {
        let url = recommendations_url(BASE, "x", 12, 0.6).unwrap();
        assert_eq!(url.path(), "/api/images/x/recommendations");
        assert_eq!(url.query(), Some("limit=12&threshold=0.6"));
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(upload_url(BASE).unwrap().as_str(), "http://localhost:8000/api/images/upload");
        assert_eq!(
            list_images_url(BASE, 2, 12).unwrap().as_str(),
            "http://localhost:8000/api/images?page=2&limit=12"
        );
        assert_eq!(image_url(BASE, "abc").unwrap().as_str(), "http://localhost:8000/api/images/abc");
        assert_eq!(
            process_url(BASE, "abc").unwrap().as_str(),
            "http://localhost:8000/api/images/abc/process"
        );
        assert_eq!(stats_url(BASE).unwrap().as_str(), "http://localhost:8000/api/stats");
    }

    #[test]
    fn test_trailing_slash_base() {
        assert_eq!(
            stats_url("http://host:9000/api/").unwrap().as_str(),
            "http://host:9000/api/stats"
        );
        assert_eq!(stats_url("http://host:9000").unwrap().as_str(), "http://host:9000/stats");
    }

    #[test]
    fn test_ids_are_escaped() {
        let url = image_url(BASE, "a b/c").unwrap();
        assert_eq!(url.path(), "/api/images/a%20b%2Fc");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(stats_url("not a url"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_missing_image_maps_to_not_found() {
        let status = |status| ApiError::Status {
            url: format!("{BASE}/images/abc"),
            status,
            body: String::new(),
        };
        assert!(matches!(not_found_as("abc", status(404)), ApiError::NotFound(id) if id == "abc"));
        assert!(matches!(not_found_as("abc", status(500)), ApiError::Status { status: 500, .. }));
        assert!(matches!(
            not_found_as("abc", ApiError::InvalidUrl("x".into())),
            ApiError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_unsuccessful_envelopes_are_rejected() {
        let upload: UploadResponse = serde_json::from_str(
            r#"{"success": false, "data": {"id": "abc", "url": "/uploads/abc.jpg"}}"#,
        )
        .unwrap();
        assert!(matches!(require_success(upload.success, upload), Err(ApiError::Rejected)));

        let recommendations: RecommendationsResponse =
            serde_json::from_str(r#"{"success": false, "data": {}}"#).unwrap();
        assert!(matches!(
            require_success(recommendations.success, recommendations),
            Err(ApiError::Rejected)
        ));

        let ok: RecommendationsResponse =
            serde_json::from_str(r#"{"success": true, "data": {"recommendations": []}}"#).unwrap();
        assert!(require_success(ok.success, ok).is_ok());
    }

    #[test]
    fn test_upload_of_missing_file_is_io_error() {
        let client = ImageApiClient::default();
        let file = UploadCandidate {
            path: std::env::temp_dir().join("pixrec-definitely-missing.jpg"),
            name: "missing.jpg".to_string(),
            size: 10,
            mime_type: "image/jpeg".to_string(),
        };
        assert!(matches!(client.upload_image(&file, None), Err(ApiError::Io(_))));
    }
}
