pub mod screen;

use makepad_widgets::{Cx, live_id, LiveId};
use pixrec_data::Route;
use pixrec_widgets::{PixRecApp, AppInfo};

pub use screen::GalleryScreen;

pub struct PixRecGalleryApp;

impl PixRecApp for PixRecGalleryApp {
    fn info() -> AppInfo {
        AppInfo {
            name: "Gallery",
            id: "pixrec-gallery",
            description: "Browse, search and filter uploaded images",
            page_id: live_id!(gallery_page),
            route: Route::Gallery,
            in_sidebar: true,
        }
    }

    fn live_design(cx: &mut Cx) {
        crate::screen::design::live_design(cx);
    }
}
