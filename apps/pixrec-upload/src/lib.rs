pub mod screen;

use makepad_widgets::{Cx, live_id, LiveId};
use pixrec_data::Route;
use pixrec_widgets::{PixRecApp, AppInfo};

pub use screen::UploadScreen;

pub struct PixRecUploadApp;

impl PixRecApp for PixRecUploadApp {
    fn info() -> AppInfo {
        AppInfo {
            name: "Upload",
            id: "pixrec-upload",
            description: "Upload an image and get recommendations",
            page_id: live_id!(upload_page),
            route: Route::Upload,
            in_sidebar: true,
        }
    }

    fn live_design(cx: &mut Cx) {
        crate::screen::design::live_design(cx);
    }
}
