use std::time::Duration;

use makepad_widgets::*;

use pixrec_data::{Notification, NotificationLevel, Route, Store, StoreAction};
use pixrec_widgets::page_router::Transition;
use pixrec_widgets::{AppAction, AppRegistry, PageLifecycle, PageRouter, PixRecApp};

use pixrec_gallery::{GalleryScreen, PixRecGalleryApp};
use pixrec_home::{HomeScreen, PixRecHomeApp};
use pixrec_recommendations::{PixRecRecommendationsApp, RecommendationsScreen};
use pixrec_upload::{PixRecUploadApp, UploadScreen};

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use pixrec_widgets::theme::*;

    // Import page widgets from the app crates
    use pixrec_home::screen::design::*;
    use pixrec_upload::screen::design::*;
    use pixrec_gallery::screen::design::*;
    use pixrec_recommendations::screen::design::*;

    SidebarButton = <Button> {
        width: Fill, height: Fit
        padding: {top: 12, bottom: 12, left: 14, right: 12}
        margin: {bottom: 4}
        align: {x: 0.0, y: 0.5}

        animator: {
            hover = {
                default: off,
                off = {
                    from: {all: Forward {duration: 0.15}}
                    apply: { draw_bg: {hover: 0.0} }
                }
                on = {
                    from: {all: Forward {duration: 0.15}}
                    apply: { draw_bg: {hover: 1.0} }
                }
            }
            pressed = {
                default: off,
                off = {
                    from: {all: Forward {duration: 0.1}}
                    apply: { draw_bg: {pressed: 0.0} }
                }
                on = {
                    from: {all: Forward {duration: 0.1}}
                    apply: { draw_bg: {pressed: 1.0} }
                }
            }
        }

        draw_bg: {
            instance hover: 0.0
            instance pressed: 0.0
            instance selected: 0.0

            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                let color = mix(
                    mix((WHITE), (HOVER_BG), self.hover),
                    (BLUE_100),
                    self.selected
                );
                sdf.box(2.0, 2.0, self.rect_size.x - 4.0, self.rect_size.y - 4.0, 6.0);
                sdf.fill(color);
                return sdf.result;
            }
        }

        draw_text: {
            text_style: <FONT_MEDIUM>{ font_size: 13.0 }
            color: (TEXT_PRIMARY)
        }
    }

    // Toast color follows `level`: 0 success, 1 info, 2 warning, 3 error
    Toast = <View> {
        width: Fit, height: Fit
        padding: {left: 16, right: 16, top: 12, bottom: 12}
        show_bg: true
        draw_bg: {
            instance level: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 8.0);
                let color = mix(
                    mix(
                        mix((GREEN_600), (BLUE_600), step(0.5, self.level)),
                        (AMBER_600),
                        step(1.5, self.level)
                    ),
                    (RED_600),
                    step(2.5, self.level)
                );
                sdf.fill(color);
                return sdf.result;
            }
        }
        toast_label = <Label> {
            width: Fit
            draw_text: {
                color: (WHITE)
                text_style: <FONT_MEDIUM>{ font_size: 11.0 }
            }
        }
    }

    App = {{App}} {
        ui: <Window> {
            window: { title: "PixRec Studio", inner_size: vec2(1400, 900) }
            pass: {
                clear_color: (PAGE_BG)
            }

            body = <View> {
                width: Fill, height: Fill
                flow: Overlay

                layout = <View> {
                    width: Fill, height: Fill
                    flow: Down
                    show_bg: true
                    draw_bg: { color: (PAGE_BG) }

                    // Header
                    header = <View> {
                        width: Fill, height: 64
                        flow: Right
                        align: {y: 0.5}
                        spacing: 12
                        padding: {left: 20, right: 20}
                        show_bg: true
                        draw_bg: { color: (WHITE) }

                        <Label> {
                            text: "PixRec Studio"
                            draw_text: {
                                color: (TEXT_PRIMARY)
                                text_style: <FONT_BOLD>{ font_size: 20.0 }
                            }
                        }
                        <View> { width: 1, height: 24, show_bg: true, draw_bg: { color: (DIVIDER) } }
                        title_label = <Label> {
                            text: "Home"
                            draw_text: {
                                color: (GRAY_500)
                                text_style: <FONT_MEDIUM>{ font_size: 14.0 }
                            }
                        }
                        <View> { width: Fill } // Spacer
                        route_label = <Label> {
                            text: "/"
                            draw_text: {
                                color: (TEXT_MUTED)
                                text_style: <FONT_REGULAR>{ font_size: 10.0 }
                            }
                        }
                    }

                    content = <View> {
                        width: Fill, height: Fill
                        flow: Right

                        sidebar = <View> {
                            width: 220, height: Fill
                            flow: Down
                            padding: {top: 16, bottom: 16, left: 8, right: 8}
                            show_bg: true
                            draw_bg: { color: (WHITE) }

                            home_btn = <SidebarButton> { text: "Home", draw_bg: { selected: 1.0 } }
                            upload_btn = <SidebarButton> { text: "Upload" }
                            gallery_btn = <SidebarButton> { text: "Gallery" }
                        }

                        main_content = <View> {
                            width: Fill, height: Fill
                            flow: Overlay

                            home_page = <HomeScreen> {}
                            upload_page = <UploadScreen> { visible: false }
                            gallery_page = <GalleryScreen> { visible: false }
                            recommendations_page = <RecommendationsScreen> { visible: false }
                        }
                    }
                }

                toast_layer = <View> {
                    width: Fill, height: Fill
                    align: {x: 1.0, y: 1.0}
                    padding: {right: 24, bottom: 24}
                    toast = <Toast> { visible: false }
                }
            }
        }
    }
}

#[derive(Live)]
pub struct App {
    #[live]
    ui: WidgetRef,
    #[rust]
    store: Store,
    #[rust]
    registry: AppRegistry,
    #[rust]
    router: PageRouter,
    #[rust]
    initialized: bool,
    /// Hides the current toast
    #[rust]
    toast_timer: Timer,
    /// Fires a delayed navigation
    #[rust]
    nav_timer: Timer,
    /// Target of the delayed navigation, with the route it was requested from
    #[rust]
    pending_navigation: Option<(Route, Route)>,
}

impl LiveHook for App {
    fn after_new_from_doc(&mut self, _cx: &mut Cx) {
        if self.initialized {
            return;
        }
        self.store = Store::load();

        self.registry.register(PixRecHomeApp::info());
        self.registry.register(PixRecUploadApp::info());
        self.registry.register(PixRecGalleryApp::info());
        self.registry.register(PixRecRecommendationsApp::info());

        self.router = PageRouter::new();
        for app in self.registry.apps() {
            self.router.register_page(app.page_id, app.route.clone());
        }

        self.initialized = true;
        ::log::info!(
            "App initialized with {} pages, API at {}",
            self.registry.len(),
            self.store.config.base_url
        );
    }
}

impl LiveRegister for App {
    fn live_register(cx: &mut Cx) {
        makepad_widgets::live_design(cx);
        pixrec_widgets::live_design(cx);
        // Register page widgets from the app crates via PixRecApp trait
        <PixRecHomeApp as PixRecApp>::live_design(cx);
        <PixRecUploadApp as PixRecApp>::live_design(cx);
        <PixRecGalleryApp as PixRecApp>::live_design(cx);
        <PixRecRecommendationsApp as PixRecApp>::live_design(cx);
    }
}

impl MatchEvent for App {
    fn handle_startup(&mut self, cx: &mut Cx) {
        if let Some(transition) = self.router.current_transition() {
            self.apply_transition(cx, transition, None);
        }
        ::log::info!("Showing {}", self.router.current());
    }

    fn handle_actions(&mut self, cx: &mut Cx, actions: &Actions) {
        let clicked = self
            .registry
            .sidebar_apps()
            .find(|app| self.sidebar_button(&app.route).is_some_and(|b| b.clicked(actions)))
            .map(|app| app.route.clone());
        if let Some(route) = clicked {
            self.navigate(cx, route);
        }

        for action in actions.iter() {
            match action.cast() {
                AppAction::Navigate(route) => self.navigate(cx, route),
                AppAction::NavigateAfter { route, delay } => {
                    self.schedule_navigation(cx, route, delay);
                }
                AppAction::Back => self.navigate_back(cx),
                AppAction::Notify(notification) => self.show_toast(cx, &notification),
                AppAction::None => {}
            }

            let store_action: StoreAction = action.cast();
            if !matches!(store_action, StoreAction::None) {
                self.store.handle_action(&store_action);
            }
        }
    }
}

impl AppMain for App {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event) {
        if self.toast_timer.is_event(event).is_some() {
            self.toast_timer = Timer::default();
            self.ui.widget(ids!(body.toast_layer.toast)).set_visible(cx, false);
            self.ui.redraw(cx);
        }
        if self.nav_timer.is_event(event).is_some() {
            self.nav_timer = Timer::default();
            self.fire_pending_navigation(cx);
        }

        // ui.handle_event must run before match_event: pages post their
        // actions during it and handle_actions consumes them
        let scope = &mut Scope::with_data(&mut self.store);
        self.ui.handle_event(cx, event, scope);

        self.match_event(cx, event);
    }
}

impl App {
    fn navigate(&mut self, cx: &mut Cx, route: Route) {
        ::log::info!("navigate: {} -> {}", self.router.current(), route);
        let previous = self.router.current_page();
        if let Some(transition) = self.router.navigate_to(route) {
            self.apply_transition(cx, transition, previous);
        }
    }

    fn navigate_back(&mut self, cx: &mut Cx) {
        let previous = self.router.current_page();
        match self.router.navigate_back() {
            Some(transition) => self.apply_transition(cx, transition, previous),
            None => self.navigate(cx, Route::Home),
        }
    }

    fn schedule_navigation(&mut self, cx: &mut Cx, route: Route, delay: Duration) {
        ::log::info!("Navigating to {} in {:?}", route, delay);
        cx.stop_timer(self.nav_timer);
        self.pending_navigation = Some((self.router.current().clone(), route));
        self.nav_timer = cx.start_timeout(delay.as_secs_f64());
    }

    /// Carry out a delayed navigation, unless the user moved on meanwhile.
    fn fire_pending_navigation(&mut self, cx: &mut Cx) {
        let Some((from, route)) = self.pending_navigation.take() else { return };
        if self.router.current() != &from {
            ::log::info!("Dropping navigation to {}: left {} first", route, from);
            return;
        }
        self.navigate(cx, route);
    }

    /// Show one page, hide the rest and run the lifecycle hooks. `previous`
    /// is the page that was visible before, if any.
    fn apply_transition(&mut self, cx: &mut Cx, transition: Transition, previous: Option<LiveId>) {
        if let Some(previous) = previous.filter(|page| *page != transition.show) {
            self.page_hidden(cx, previous);
        }
        for page in &transition.hide {
            self.page(*page).set_visible(cx, false);
        }
        self.page(transition.show).set_visible(cx, true);
        self.page_shown(cx, transition.show, &transition.route);

        let route = &transition.route;
        self.ui.label(ids!(body.layout.header.title_label)).set_text(cx, route.title());
        self.ui.label(ids!(body.layout.header.route_label)).set_text(cx, &route.to_string());
        self.update_sidebar(cx, route);
        self.ui.redraw(cx);
    }

    /// The page widget registered under `page`.
    fn page(&self, page: LiveId) -> WidgetRef {
        if page == live_id!(home_page) {
            self.ui.widget(ids!(body.layout.content.main_content.home_page))
        } else if page == live_id!(upload_page) {
            self.ui.widget(ids!(body.layout.content.main_content.upload_page))
        } else if page == live_id!(gallery_page) {
            self.ui.widget(ids!(body.layout.content.main_content.gallery_page))
        } else if page == live_id!(recommendations_page) {
            self.ui.widget(ids!(body.layout.content.main_content.recommendations_page))
        } else {
            ::log::warn!("Unknown page {:?}", page);
            WidgetRef::empty()
        }
    }

    fn page_shown(&mut self, cx: &mut Cx, page: LiveId, route: &Route) {
        let widget = self.page(page);
        let store = &mut self.store;
        if let Some(mut screen) = widget.borrow_mut::<HomeScreen>() {
            screen.on_show(cx, route, store);
        } else if let Some(mut screen) = widget.borrow_mut::<UploadScreen>() {
            screen.on_show(cx, route, store);
        } else if let Some(mut screen) = widget.borrow_mut::<GalleryScreen>() {
            screen.on_show(cx, route, store);
        } else if let Some(mut screen) = widget.borrow_mut::<RecommendationsScreen>() {
            screen.on_show(cx, route, store);
        }
    }

    fn page_hidden(&mut self, cx: &mut Cx, page: LiveId) {
        let widget = self.page(page);
        if let Some(mut screen) = widget.borrow_mut::<HomeScreen>() {
            screen.on_hide(cx);
        } else if let Some(mut screen) = widget.borrow_mut::<UploadScreen>() {
            screen.on_hide(cx);
        } else if let Some(mut screen) = widget.borrow_mut::<GalleryScreen>() {
            screen.on_hide(cx);
        } else if let Some(mut screen) = widget.borrow_mut::<RecommendationsScreen>() {
            screen.on_hide(cx);
        }
    }

    fn sidebar_button(&self, route: &Route) -> Option<ButtonRef> {
        match route {
            Route::Home => Some(self.ui.button(ids!(body.layout.content.sidebar.home_btn))),
            Route::Upload => Some(self.ui.button(ids!(body.layout.content.sidebar.upload_btn))),
            Route::Gallery => Some(self.ui.button(ids!(body.layout.content.sidebar.gallery_btn))),
            Route::Recommendations(_) => None,
        }
    }

    fn update_sidebar(&mut self, cx: &mut Cx, current: &Route) {
        for app in self.registry.sidebar_apps() {
            let Some(button) = self.sidebar_button(&app.route) else { continue };
            let selected = if app.route.same_page(current) { 1.0 } else { 0.0 };
            button.apply_over(cx, live! {
                draw_bg: { selected: (selected) }
            });
        }
    }

    fn show_toast(&mut self, cx: &mut Cx, notification: &Notification) {
        match notification.level {
            NotificationLevel::Error => ::log::error!("{}", notification.message),
            NotificationLevel::Warning => ::log::warn!("{}", notification.message),
            _ => ::log::info!("{}", notification.message),
        }
        let level = match notification.level {
            NotificationLevel::Success => 0.0,
            NotificationLevel::Info => 1.0,
            NotificationLevel::Warning => 2.0,
            NotificationLevel::Error => 3.0,
        };

        let toast = self.ui.view(ids!(body.toast_layer.toast));
        toast.apply_over(cx, live! { draw_bg: { level: (level) } });
        self.ui.label(ids!(body.toast_layer.toast.toast_label)).set_text(cx, &notification.message);
        self.ui.widget(ids!(body.toast_layer.toast)).set_visible(cx, true);

        // One toast at a time; a new one replaces the old and restarts the clock
        cx.stop_timer(self.toast_timer);
        self.toast_timer = cx.start_timeout(notification.display_duration().as_secs_f64());
        self.ui.redraw(cx);
    }
}

app_main!(App);
