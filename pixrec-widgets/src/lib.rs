pub mod theme;
pub mod app_trait;
pub mod actions;
pub mod page_router;
pub mod components;

pub use app_trait::{PixRecApp, AppInfo, AppRegistry, PageLifecycle};
pub use actions::AppAction;
pub use page_router::PageRouter;
pub use components::image_upload::{ImageUpload, ImageUploadAction};
pub use components::show_thumbnail;

use makepad_widgets::Cx;

/// Register all shared widgets with Makepad.
///
/// Call from `LiveRegister::live_register` before any app crate.
///
/// **Important**: Theme is registered first as other widgets depend on its font and color definitions.
pub fn live_design(cx: &mut Cx) {
    theme::live_design(cx);
    components::live_design(cx);
    components::image_upload::live_design(cx);
}
