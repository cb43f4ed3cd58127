//! # PageRouter - Centralized Navigation
//!
//! Tracks the current [`Route`] and a history stack with back support.
//! Each transition reports which page widget to show and which ones to
//! hide, so the shell can run the [`PageLifecycle`](crate::PageLifecycle)
//! hooks.

use makepad_widgets::LiveId;
use pixrec_data::Route;

/// The page widgets affected by a navigation.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub route: Route,
    pub show: LiveId,
    pub hide: Vec<LiveId>,
}

#[derive(Clone, Debug)]
pub struct PageRouter {
    current: Route,
    /// Navigation history, current route last
    history: Vec<Route>,
    /// Page widget for each route kind
    pages: Vec<(LiveId, Route)>,
}

impl Default for PageRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRouter {
    pub fn new() -> Self {
        Self {
            current: Route::Home,
            history: vec![Route::Home],
            pages: Vec::new(),
        }
    }

    pub fn with_pages(initial: Route, pages: Vec<(LiveId, Route)>) -> Self {
        Self {
            current: initial.clone(),
            history: vec![initial],
            pages,
        }
    }

    /// Register the page widget that renders routes like `route`
    pub fn register_page(&mut self, page_id: LiveId, route: Route) {
        if !self.pages.iter().any(|(id, _)| *id == page_id) {
            self.pages.push((page_id, route));
        }
    }

    pub fn page_for(&self, route: &Route) -> Option<LiveId> {
        self.pages
            .iter()
            .find(|(_, r)| r.same_page(route))
            .map(|(id, _)| *id)
    }

    /// Navigate to `route`. Returns `None` when already there or when no
    /// page renders it.
    pub fn navigate_to(&mut self, route: Route) -> Option<Transition> {
        if self.current == route {
            return None;
        }
        let Some(show) = self.page_for(&route) else {
            ::log::warn!("No page registered for {}", route);
            return None;
        };
        self.history.push(route.clone());
        self.current = route.clone();
        Some(Transition { route, show, hide: self.pages_to_hide(show) })
    }

    /// Navigate back to the previous route, or `None` at the root.
    pub fn navigate_back(&mut self) -> Option<Transition> {
        if self.history.len() <= 1 {
            return None;
        }
        self.history.pop();
        let previous = self.history.last()?.clone();
        let show = self.page_for(&previous)?;
        self.current = previous.clone();
        Some(Transition { route: previous, show, hide: self.pages_to_hide(show) })
    }

    /// Transition that (re)shows the current route, e.g. at start-up
    pub fn current_transition(&self) -> Option<Transition> {
        let show = self.page_for(&self.current)?;
        Some(Transition {
            route: self.current.clone(),
            show,
            hide: self.pages_to_hide(show),
        })
    }

    pub fn pages_to_hide(&self, show: LiveId) -> Vec<LiveId> {
        self.pages
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| *id != show)
            .collect()
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn current_page(&self) -> Option<LiveId> {
        self.page_for(&self.current)
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// Clear navigation history (keep current route)
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.history.push(self.current.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_page(name: &str) -> LiveId {
        LiveId::from_str_with_lut(name).unwrap()
    }

    fn router() -> PageRouter {
        PageRouter::with_pages(
            Route::Home,
            vec![
                (test_page("home_page"), Route::Home),
                (test_page("upload_page"), Route::Upload),
                (test_page("gallery_page"), Route::Gallery),
                (test_page("recommendations_page"), Route::recommendations("")),
            ],
        )
    }

    #[test]
    fn test_navigation() {
        let mut router = router();
        assert_eq!(router.current(), &Route::Home);
        assert!(!router.can_go_back());

        let t = router.navigate_to(Route::Gallery).unwrap();
        assert_eq!(t.show, test_page("gallery_page"));
        assert!(t.hide.contains(&test_page("home_page")));
        assert!(!t.hide.contains(&test_page("gallery_page")));
        assert_eq!(t.hide.len(), 3);

        let back = router.navigate_back().unwrap();
        assert_eq!(back.route, Route::Home);
        assert_eq!(router.current(), &Route::Home);
        assert!(router.navigate_back().is_none());
    }

    #[test]
    fn test_same_route_is_ignored() {
        let mut router = router();
        assert!(router.navigate_to(Route::Home).is_none());
        assert_eq!(router.history_depth(), 1);
    }

    #[test]
    fn test_recommendations_for_another_image_navigates() {
        let mut router = router();
        router.navigate_to(Route::recommendations("a")).unwrap();
        let t = router.navigate_to(Route::recommendations("b")).unwrap();
        assert_eq!(t.show, test_page("recommendations_page"));
        assert_eq!(router.current().image_id(), Some("b"));

        let back = router.navigate_back().unwrap();
        assert_eq!(back.route, Route::recommendations("a"));
    }

    #[test]
    fn test_clear_history() {
        let mut router = router();
        router.navigate_to(Route::Upload);
        router.navigate_to(Route::Gallery);
        router.clear_history();
        assert_eq!(router.history_depth(), 1);
        assert_eq!(router.current_page(), Some(test_page("gallery_page")));
    }
}
