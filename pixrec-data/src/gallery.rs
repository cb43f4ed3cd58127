//! Gallery pagination and client-side filtering.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Image, ImagePage};

pub const PAGE_SIZE: u32 = 12;

/// Images above this many bytes count as "large".
pub const LARGE_IMAGE_BYTES: u64 = 2_000_000;

/// "Recent" window in days.
pub const RECENT_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GalleryFilter {
    #[default]
    All,
    Recent,
    Large,
}

impl GalleryFilter {
    pub const ALL: [GalleryFilter; 3] = [Self::All, Self::Recent, Self::Large];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All Images",
            Self::Recent => "Recent",
            Self::Large => "Large Files",
        }
    }

    pub fn matches(&self, image: &Image, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Recent => image
                .created_at_utc()
                .map(|created| now - created <= Duration::days(RECENT_DAYS))
                .unwrap_or(false),
            Self::Large => image.file_size > LARGE_IMAGE_BYTES,
        }
    }
}

/// Case-insensitive match on the original name or any tag. An empty query
/// matches everything.
pub fn matches_query(image: &Image, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    image.original_name.to_lowercase().contains(&query)
        || image.tags().iter().any(|tag| tag.to_lowercase().contains(&query))
}

/// Apply search text and filter. Order is preserved.
pub fn filter_images<'a>(
    images: &'a [Image],
    query: &str,
    filter: GalleryFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Image> {
    images
        .iter()
        .filter(|image| matches_query(image, query) && filter.matches(image, now))
        .collect()
}

/// Tracks which pages have been loaded.
#[derive(Debug, Clone)]
pub struct GalleryPager {
    /// Last page loaded, 1-based. `0` before the first load.
    page: u32,
    limit: u32,
    total: u64,
}

impl Default for GalleryPager {
    fn default() -> Self {
        Self { page: 0, limit: PAGE_SIZE, total: 0 }
    }
}

impl GalleryPager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page to request for "load more" (or the first load).
    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn has_more(&self) -> bool {
        self.page == 0 || (self.page as u64) * (self.limit as u64) < self.total
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Merge a fetched page into `images`: page 1 replaces, later pages
    /// append. Images already present (same id) are not duplicated.
    pub fn apply(&mut self, requested_page: u32, page: ImagePage, images: &mut Vec<Image>) {
        if requested_page <= 1 {
            images.clear();
        }
        for image in page.images {
            if !images.iter().any(|existing| existing.id == image.id) {
                images.push(image);
            }
        }
        self.page = requested_page;
        self.total = page.total;
        if let Some(limit) = page.limit.filter(|l| *l > 0) {
            self.limit = limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::sample_image;
    use crate::models::ImageMetadata;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn page_of(ids: &[&str], total: u64) -> ImagePage {
        ImagePage {
            images: ids.iter().map(|id| sample_image(id)).collect(),
            total,
            page: None,
            limit: None,
        }
    }

    #[test]
    fn test_search_matches_name_and_tags() {
        let mut beach = sample_image("1");
        beach.original_name = "Beach-Sunset.JPG".to_string();
        let mut city = sample_image("2");
        city.metadata = Some(ImageMetadata {
            tags: vec!["Urban".to_string()],
            ..Default::default()
        });
        let images = vec![beach, city];

        let ids = |q: &str| -> Vec<String> {
            filter_images(&images, q, GalleryFilter::All, now())
                .into_iter()
                .map(|i| i.id.clone())
                .collect()
        };
        assert_eq!(ids("sunset"), vec!["1"]);
        assert_eq!(ids("URBAN"), vec!["2"]);
        assert_eq!(ids("  "), vec!["1", "2"]);
        assert!(ids("forest").is_empty());
    }

    #[test]
    fn test_recent_and_large_filters() {
        let mut old = sample_image("old");
        old.created_at = "2024-01-01T00:00:00".to_string();
        old.file_size = 5_000_000;
        let mut fresh = sample_image("fresh");
        fresh.created_at = "2024-01-09T00:00:00Z".to_string();
        fresh.file_size = LARGE_IMAGE_BYTES;
        let mut broken = sample_image("broken");
        broken.created_at = "yesterday".to_string();
        let images = vec![old, fresh, broken];

        let recent = filter_images(&images, "", GalleryFilter::Recent, now());
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "fresh");

        let large = filter_images(&images, "", GalleryFilter::Large, now());
        assert_eq!(large.len(), 1);
        assert_eq!(large[0].id, "old");
    }

    #[test]
    fn test_load_more_appends() {
        let mut pager = GalleryPager::new();
        let mut images = Vec::new();
        assert!(pager.has_more());
        assert_eq!(pager.next_page(), 1);

        pager.apply(1, page_of(&["a", "b"], 3), &mut images);
        assert_eq!(pager.next_page(), 2);

        // Limit comes back from the server as 2 here.
        let mut second = page_of(&["b", "c"], 3);
        second.limit = Some(2);
        pager.apply(2, second, &mut images);

        let ids: Vec<_> = images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(!pager.has_more());
    }

    #[test]
    fn test_has_more_uses_page_times_limit() {
        let mut pager = GalleryPager::new();
        let mut images = Vec::new();
        pager.apply(1, page_of(&["a"], 13), &mut images);
        assert!(pager.has_more());
        pager.apply(2, page_of(&["b"], 24), &mut images);
        assert!(!pager.has_more());
    }

    #[test]
    fn test_first_page_replaces() {
        let mut pager = GalleryPager::new();
        let mut images = vec![sample_image("stale")];
        pager.apply(1, page_of(&["a"], 1), &mut images);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, "a");
    }
}
