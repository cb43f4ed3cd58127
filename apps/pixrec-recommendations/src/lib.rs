pub mod screen;

use makepad_widgets::{Cx, live_id, LiveId};
use pixrec_data::Route;
use pixrec_widgets::{PixRecApp, AppInfo};

pub use screen::RecommendationsScreen;

/// Similar-image results for one reference image. Reached from the gallery
/// or after an upload, so it has no sidebar entry.
pub struct PixRecRecommendationsApp;

impl PixRecApp for PixRecRecommendationsApp {
    fn info() -> AppInfo {
        AppInfo {
            name: "Recommendations",
            id: "pixrec-recommendations",
            description: "Visually similar images with explanations",
            page_id: live_id!(recommendations_page),
            route: Route::recommendations(""),
            in_sidebar: false,
        }
    }

    fn live_design(cx: &mut Cx) {
        crate::screen::design::live_design(cx);
    }
}
