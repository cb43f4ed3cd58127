//! # PixRecApp Trait - Page Crate Interface
//!
//! Every page lives in its own crate under `apps/` and connects to the shell
//! through four touch points:
//! 1. Import: `use pixrec_gallery::PixRecGalleryApp;`
//! 2. Live Register: `<PixRecGalleryApp as PixRecApp>::live_design(cx);`
//! 3. Metadata: `PixRecGalleryApp::info()` for the registry and router
//! 4. UI Definition: `gallery_page = <GalleryScreen> {}` in live_design!
//!
//! ## Creating a New Page
//!
//! ```rust,ignore
//! use pixrec_widgets::{PixRecApp, AppInfo};
//! use pixrec_data::Route;
//! use makepad_widgets::live_id;
//!
//! pub struct PixRecGalleryApp;
//!
//! impl PixRecApp for PixRecGalleryApp {
//!     fn info() -> AppInfo {
//!         AppInfo {
//!             name: "Gallery",
//!             id: "pixrec-gallery",
//!             description: "Browse uploaded images",
//!             page_id: live_id!(gallery_page),
//!             route: Route::Gallery,
//!             in_sidebar: true,
//!         }
//!     }
//!
//!     fn live_design(cx: &mut Cx) {
//!         crate::screen::design::live_design(cx);
//!     }
//! }
//! ```

use makepad_widgets::{Cx, LiveId};
use pixrec_data::{Route, Store};

/// Metadata about a registered page
#[derive(Clone, Debug)]
pub struct AppInfo {
    /// Display name shown in the sidebar
    pub name: &'static str,
    /// Unique identifier for the app
    pub id: &'static str,
    pub description: &'static str,
    /// Page LiveId inside the shell's `main_content`
    pub page_id: LiveId,
    /// Route the page is reached by; parameters are ignored when matching
    pub route: Route,
    /// Whether the sidebar offers a button for this page
    pub in_sidebar: bool,
}

/// Trait for page crates that integrate with the shell
pub trait PixRecApp {
    /// Returns metadata about this app
    fn info() -> AppInfo where Self: Sized;

    /// Register this app's widgets with Makepad
    fn live_design(cx: &mut Cx);
}

/// Show/hide hooks the shell calls on page widgets when navigating.
///
/// `on_show` receives the full route (e.g. the image id for
/// recommendations); `on_hide` must invalidate in-flight requests so their
/// results are dropped.
pub trait PageLifecycle {
    fn on_show(&mut self, cx: &mut Cx, route: &Route, store: &mut Store);

    fn on_hide(&mut self, cx: &mut Cx);
}

/// Registry of all installed pages
pub struct AppRegistry {
    apps: Vec<AppInfo>,
}

impl AppRegistry {
    pub const fn new() -> Self {
        Self { apps: Vec::new() }
    }

    pub fn register(&mut self, info: AppInfo) {
        self.apps.push(info);
    }

    pub fn apps(&self) -> &[AppInfo] {
        &self.apps
    }

    /// Pages that get a sidebar button, in registration order
    pub fn sidebar_apps(&self) -> impl Iterator<Item = &AppInfo> {
        self.apps.iter().filter(|app| app.in_sidebar)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&AppInfo> {
        self.apps.iter().find(|app| app.id == id)
    }

    /// The page that renders `route`
    pub fn find_by_route(&self, route: &Route) -> Option<&AppInfo> {
        self.apps.iter().find(|app| app.route.same_page(route))
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &'static str, page: &str, route: Route, in_sidebar: bool) -> AppInfo {
        AppInfo {
            name: id,
            id,
            description: "",
            page_id: LiveId::from_str_with_lut(page).unwrap(),
            route,
            in_sidebar,
        }
    }

    #[test]
    fn test_find_by_route_ignores_parameters() {
        let mut registry = AppRegistry::new();
        registry.register(info("home", "home_page", Route::Home, true));
        registry.register(info(
            "recs",
            "recommendations_page",
            Route::recommendations(""),
            false,
        ));

        let found = registry.find_by_route(&Route::recommendations("abc")).unwrap();
        assert_eq!(found.id, "recs");
        assert!(registry.find_by_route(&Route::Gallery).is_none());
        assert_eq!(registry.sidebar_apps().count(), 1);
        assert_eq!(registry.find_by_id("home").map(|a| a.route.clone()), Some(Route::Home));
    }
}
