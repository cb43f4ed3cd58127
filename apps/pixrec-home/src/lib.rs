pub mod screen;

use makepad_widgets::{Cx, live_id, LiveId};
use pixrec_data::Route;
use pixrec_widgets::{PixRecApp, AppInfo};

pub use screen::HomeScreen;

pub struct PixRecHomeApp;

impl PixRecApp for PixRecHomeApp {
    fn info() -> AppInfo {
        AppInfo {
            name: "Home",
            id: "pixrec-home",
            description: "Overview and collection statistics",
            page_id: live_id!(home_page),
            route: Route::Home,
            in_sidebar: true,
        }
    }

    fn live_design(cx: &mut Cx) {
        crate::screen::design::live_design(cx);
    }
}
