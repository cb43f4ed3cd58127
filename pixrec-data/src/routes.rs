//! Client-side routes.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Home,
    Upload,
    Gallery,
    /// Recommendations for the image with this id
    Recommendations(String),
}

impl Route {
    /// Parse a path. Unknown paths fall back to `Home`.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_end_matches('/');
        let mut segments = trimmed.trim_start_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, None) => Self::Home,
            (Some("upload"), None, None) => Self::Upload,
            (Some("gallery"), None, None) => Self::Gallery,
            (Some("recommendations"), Some(id), None) if !id.is_empty() => {
                Self::Recommendations(id.to_string())
            }
            _ => {
                log::warn!("Unknown route {:?}, showing home", path);
                Self::Home
            }
        }
    }

    pub fn recommendations(id: impl Into<String>) -> Self {
        Self::Recommendations(id.into())
    }

    /// Title shown in the header.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Upload => "Upload Image",
            Self::Gallery => "Gallery",
            Self::Recommendations(_) => "Recommendations",
        }
    }

    /// The image id for recommendation routes.
    pub fn image_id(&self) -> Option<&str> {
        match self {
            Self::Recommendations(id) => Some(id),
            _ => None,
        }
    }

    /// Same page, ignoring parameters.
    pub fn same_page(&self, other: &Route) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "/"),
            Self::Upload => write!(f, "/upload"),
            Self::Gallery => write!(f, "/gallery"),
            Self::Recommendations(id) => write!(f, "/recommendations/{}", id),
        }
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for route in [
            Route::Home,
            Route::Upload,
            Route::Gallery,
            Route::recommendations("abc"),
        ] {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }

    #[test]
    fn test_recommendations_path() {
        assert_eq!(Route::recommendations("abc").to_string(), "/recommendations/abc");
        assert_eq!(Route::parse("/recommendations/abc/"), Route::recommendations("abc"));
        assert_eq!(Route::parse("/recommendations/abc").image_id(), Some("abc"));
    }

    #[test]
    fn test_unknown_paths_fall_back_to_home() {
        for path in ["", "/", "/nope", "/recommendations", "/recommendations/", "/gallery/x", "/a/b/c"] {
            assert_eq!(Route::parse(path), Route::Home, "{path}");
        }
    }

    #[test]
    fn test_same_page() {
        assert!(Route::recommendations("a").same_page(&Route::recommendations("b")));
        assert!(!Route::Home.same_page(&Route::Gallery));
    }
}
