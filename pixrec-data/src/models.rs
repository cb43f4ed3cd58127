//! Wire types shared with the image recommendation API.
//!
//! Field names follow the JSON contract exactly (snake_case), so these
//! structs deserialize straight from `reqwest` responses.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Image ────────────────────────────────────────────────────────────────────

/// An image known to the API.
///
/// `width`/`height` are `0` until server-side processing has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    /// Size in bytes
    pub file_size: u64,
    pub mime_type: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub url: String,
    pub thumbnail_url: String,
    /// Extracted feature vector (only present once processed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
    pub created_at: String,
    pub updated_at: String,
}

impl Image {
    /// Build the provisional entry shown right after an upload, before the
    /// server has filled in dimensions and metadata.
    pub fn from_upload(
        data: &UploadData,
        original_name: &str,
        file_size: u64,
        mime_type: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let stamp = now.to_rfc3339();
        Self {
            id: data.id.clone(),
            filename: data.filename.clone(),
            original_name: original_name.to_string(),
            file_size,
            mime_type: mime_type.to_string(),
            width: 0,
            height: 0,
            url: data.url.clone(),
            thumbnail_url: data.url.clone(),
            features: None,
            metadata: None,
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }

    pub fn tags(&self) -> &[String] {
        self.metadata.as_ref().map(|m| m.tags.as_slice()).unwrap_or(&[])
    }

    /// Up to `limit` dominant colors, in server order.
    pub fn dominant_colors(&self, limit: usize) -> &[ColorInfo] {
        let colors = self.metadata.as_ref().map(|m| m.colors.as_slice()).unwrap_or(&[]);
        &colors[..colors.len().min(limit)]
    }

    pub fn is_processed(&self) -> bool {
        self.features.is_some() || (self.width > 0 && self.height > 0)
    }

    /// Creation time. The API emits either RFC 3339 or naive ISO-8601
    /// timestamps; naive ones are taken as UTC.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// "2.35 MB"
    pub fn size_display(&self) -> String {
        format_megabytes(self.file_size)
    }

    pub fn dimensions_display(&self) -> String {
        if self.width == 0 || self.height == 0 {
            "Processing...".to_string()
        } else {
            format!("{} × {}", self.width, self.height)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(default)]
    pub colors: Vec<ColorInfo>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub confidence_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorInfo {
    /// "#rrggbb"
    pub hex: String,
    /// Share of the image in `[0,1]`
    #[serde(default)]
    pub percentage: f32,
    #[serde(default)]
    pub name: String,
}

impl ColorInfo {
    /// Linear RGBA components in `[0,1]`, or `None` for a malformed hex string.
    pub fn rgba(&self) -> Option<[f32; 4]> {
        let hex = self.hex.strip_prefix('#').unwrap_or(&self.hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some([channel(0)?, channel(2)?, channel(4)?, 1.0])
    }

    /// "Red (30.0%)"
    pub fn label(&self) -> String {
        format!("{} ({:.1}%)", self.name, self.percentage * 100.0)
    }
}

// ─── Recommendation ───────────────────────────────────────────────────────────

/// An image the service considers similar, with its score and explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub image: Image,
    /// Similarity in `[0,1]`
    pub similarity_score: f32,
    #[serde(default)]
    pub explanation: String,
}

impl Recommendation {
    /// Score as a whole percentage, e.g. `0.847` → `85`.
    pub fn similarity_percent(&self) -> u32 {
        (self.similarity_score.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    pub fn badge_text(&self) -> String {
        format!("{}% similar", self.similarity_percent())
    }
}

// ─── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// `POST /images/upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub data: UploadData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadData {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    pub url: String,
    #[serde(default = "default_processing_status")]
    pub processing_status: ProcessingStatus,
}

fn default_processing_status() -> ProcessingStatus {
    ProcessingStatus::Pending
}

/// `GET /images?page&limit`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePage {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// `GET /images/{id}/recommendations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub data: RecommendationsData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsData {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub processing_time_ms: f64,
    /// Set when the reference image has not been processed yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /images/{id}/process`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_images: u64,
    #[serde(default)]
    pub processed_images: u64,
    #[serde(default)]
    pub average_processing_time: f64,
    #[serde(default)]
    pub top_tags: Vec<TagCount>,
    /// Total bytes stored
    #[serde(default)]
    pub storage_usage: u64,
}

impl Stats {
    pub fn storage_display(&self) -> String {
        format_megabytes(self.storage_usage)
    }

    /// "nature (4) · city (2)"
    pub fn top_tags_display(&self, limit: usize) -> String {
        self.top_tags
            .iter()
            .take(limit)
            .map(|t| format!("{} ({})", t.tag, t.count))
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn sample_image(id: &str) -> Image {
        Image {
            id: id.to_string(),
            filename: format!("{id}.jpg"),
            original_name: format!("{id}.jpg"),
            file_size: 1024,
            mime_type: "image/jpeg".to_string(),
            width: 800,
            height: 600,
            url: format!("/uploads/{id}.jpg"),
            thumbnail_url: format!("/uploads/{id}.jpg"),
            features: None,
            metadata: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_image_from_api_json() {
        let json = r##"{
            "id": "1",
            "filename": "test1.jpg",
            "original_name": "test1.jpg",
            "file_size": 1024,
            "mime_type": "image/jpeg",
            "width": 800,
            "height": 600,
            "url": "http://example.com/test1.jpg",
            "thumbnail_url": "http://example.com/test1-thumb.jpg",
            "metadata": {
                "colors": [{"hex": "#ff6b6b", "percentage": 0.3, "name": "Red"}],
                "tags": ["nature", "landscape"],
                "confidence_score": 0.8
            },
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"##;

        let image: Image = serde_json::from_str(json).unwrap();
        assert_eq!(image.id, "1");
        assert_eq!(image.tags(), &["nature".to_string(), "landscape".to_string()]);
        assert_eq!(image.dominant_colors(5).len(), 1);
        assert!(image.features.is_none());
        assert!(image.is_processed());
    }

    #[test]
    fn test_naive_timestamps_are_utc() {
        let mut image = sample_image("a");
        image.created_at = "2024-03-05T10:20:30.123456".to_string();
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 20, 30).unwrap();
        let parsed = image.created_at_utc().unwrap();
        assert_eq!(parsed.timestamp(), expected.timestamp());

        image.created_at = "not a date".to_string();
        assert!(image.created_at_utc().is_none());
    }

    #[test]
    fn test_provisional_image_has_zero_dimensions() {
        let data = UploadData {
            id: "abc".to_string(),
            filename: "abc.jpg".to_string(),
            url: "u".to_string(),
            processing_status: ProcessingStatus::Pending,
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let image = Image::from_upload(&data, "holiday.jpg", 2_000_000, "image/jpeg", now);

        assert_eq!(image.id, "abc");
        assert_eq!(image.width, 0);
        assert_eq!(image.height, 0);
        assert_eq!(image.thumbnail_url, "u");
        assert_eq!(image.original_name, "holiday.jpg");
        assert!(!image.is_processed());
        assert_eq!(image.dimensions_display(), "Processing...");
    }

    #[test]
    fn test_color_rgba() {
        let color = ColorInfo { hex: "#ff0080".to_string(), percentage: 0.25, name: "Pink".to_string() };
        let [r, g, b, a] = color.rgba().unwrap();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert!((b - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(a, 1.0);
        assert_eq!(color.label(), "Pink (25.0%)");

        let bad = ColorInfo { hex: "#zzz".to_string(), percentage: 0.0, name: String::new() };
        assert!(bad.rgba().is_none());
    }

    #[test]
    fn test_similarity_badge() {
        let rec = Recommendation {
            image: sample_image("r"),
            similarity_score: 0.847,
            explanation: "Similar".to_string(),
        };
        assert_eq!(rec.similarity_percent(), 85);
        assert_eq!(rec.badge_text(), "85% similar");
    }

    #[test]
    fn test_recommendations_response_with_message() {
        let json = r#"{
            "success": true,
            "data": {
                "recommendations": [],
                "processing_time_ms": 0,
                "message": "still processing"
            }
        }"#;
        let resp: RecommendationsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.data.recommendations.is_empty());
        assert_eq!(resp.data.message.as_deref(), Some("still processing"));
    }

    #[test]
    fn test_stats_display() {
        let stats: Stats = serde_json::from_str(
            r#"{"total_images": 3, "processed_images": 2, "average_processing_time": 2.5,
                "top_tags": [{"tag": "nature", "count": 4}, {"tag": "city", "count": 2}],
                "storage_usage": 3145728}"#,
        )
        .unwrap();
        assert_eq!(stats.storage_display(), "3.00 MB");
        assert_eq!(stats.top_tags_display(1), "nature (4)");
        assert_eq!(stats.top_tags_display(5), "nature (4) · city (2)");
    }
}
