pub mod design;

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use makepad_widgets::*;
use pixrec_data::flows::gallery_worker;
use pixrec_data::{
    filter_images, ApiResult, FlowEffect, GalleryFilter, GalleryFlow, GalleryRequest, Image,
    ImageApi, ImagePage, Route, Store, Tagged, ThumbnailCache, ThumbnailState,
};
use pixrec_widgets::{show_thumbnail, AppAction, PageLifecycle};

/// Cards per grid row.
const COLUMNS: usize = 3;
/// Tags shown under each card.
const CARD_TAGS: usize = 3;

type PageUpdate = Tagged<(u32, ApiResult<ImagePage>)>;

struct PageChannel {
    tx: Sender<PageUpdate>,
    rx: Receiver<PageUpdate>,
}

impl Default for PageChannel {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

#[derive(Live, LiveHook, Widget)]
pub struct GalleryScreen {
    #[deref]
    view: View,

    #[rust] flow: GalleryFlow,
    #[rust] channel: PageChannel,
    #[rust] thumbnails: ThumbnailCache,
    #[rust] api: Option<Arc<dyn ImageApi>>,

    #[rust] search_query: String,
    #[rust] filter: GalleryFilter,
    /// Images passing the current search and filter, in store order
    #[rust] visible: Vec<Image>,
    /// Thumbnail URL last loaded into each (row, column) card
    #[rust] loaded: HashMap<(usize, usize), String>,
}

impl Widget for GalleryScreen {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event, scope: &mut Scope) {
        let actions = cx.capture_actions(|cx| self.view.handle_event(cx, event, scope));

        let Some(store) = scope.data.get_mut::<Store>() else { return };

        self.poll_pages(cx, store);
        if self.thumbnails.poll() {
            self.view.redraw(cx);
        }
        if self.flow.is_loading() || self.thumbnails.is_pending() {
            cx.new_next_frame();
        }

        if let Some(query) = self.view.text_input(ids!(search_input)).changed(&actions) {
            self.search_query = query;
            self.apply_filters(cx, store);
        }

        let tabs = [
            (GalleryFilter::All, self.view.button(ids!(filter_all))),
            (GalleryFilter::Recent, self.view.button(ids!(filter_recent))),
            (GalleryFilter::Large, self.view.button(ids!(filter_large))),
        ];
        if let Some((filter, _)) = tabs.iter().find(|(_, button)| button.clicked(&actions)) {
            self.set_filter(cx, *filter, store);
        }

        if self.view.button(ids!(refresh_btn)).clicked(&actions) {
            self.thumbnails.forget_failures();
            self.start_refresh(cx, store);
        }
        if self.view.button(ids!(load_more_btn)).clicked(&actions) {
            if let Some(request) = self.flow.load_more() {
                self.spawn_request(cx, store, request);
            }
        }
        if self.view.button(ids!(empty_upload_btn)).clicked(&actions) {
            cx.action(AppAction::Navigate(Route::Upload));
        }

        let grid = self.view.portal_list(ids!(image_grid));
        for (row, item) in grid.items_with_actions(&actions) {
            for col in 0..COLUMNS {
                let tapped = card(&item, col)
                    .as_view()
                    .finger_down(&actions)
                    .is_some_and(|fd| fd.tap_count == 1);
                if !tapped {
                    continue;
                }
                if let Some(image) = self.visible.get(row * COLUMNS + col) {
                    ::log::info!("Opening recommendations for {}", image.id);
                    cx.action(AppAction::Navigate(Route::recommendations(image.id.clone())));
                }
            }
        }
    }

    fn draw_walk(&mut self, cx: &mut Cx2d, scope: &mut Scope, walk: Walk) -> DrawStep {
        let grid = self.view.portal_list(ids!(image_grid));
        let grid_uid = grid.widget_uid();

        while let Some(widget) = self.view.draw_walk(cx, scope, walk).step() {
            if widget.widget_uid() == grid_uid {
                self.draw_grid(cx, scope, widget);
            }
        }
        DrawStep::done()
    }
}

impl PageLifecycle for GalleryScreen {
    fn on_show(&mut self, cx: &mut Cx, _route: &Route, store: &mut Store) {
        self.api = Some(store.api());
        self.start_refresh(cx, store);
    }

    fn on_hide(&mut self, _cx: &mut Cx) {
        self.flow.cancel();
    }
}

impl GalleryScreen {
    fn start_refresh(&mut self, cx: &mut Cx, store: &mut Store) {
        let request = self.flow.refresh();
        self.spawn_request(cx, store, request);
    }

    fn spawn_request(&mut self, cx: &mut Cx, store: &Store, request: GalleryRequest) {
        ::log::debug!("Loading gallery page {} (limit {})", request.page, request.limit);
        let api = store.api();
        let tx = self.channel.tx.clone();
        std::thread::spawn(move || gallery_worker(api.as_ref(), request, &tx));
        self.update_footer(cx);
        cx.new_next_frame();
    }

    fn poll_pages(&mut self, cx: &mut Cx, store: &mut Store) {
        let mut effects = Vec::new();
        let mut received = false;
        while let Ok(update) = self.channel.rx.try_recv() {
            effects.extend(self.flow.apply(update, store));
            received = true;
        }
        for effect in effects {
            if let FlowEffect::Notify(notification) = effect {
                cx.action(AppAction::Notify(notification));
            }
        }
        if received {
            self.apply_filters(cx, store);
        }
    }

    fn set_filter(&mut self, cx: &mut Cx, filter: GalleryFilter, store: &Store) {
        if self.filter == filter {
            return;
        }
        self.filter = filter;
        for (tab, id) in [
            (GalleryFilter::All, ids!(filter_all)),
            (GalleryFilter::Recent, ids!(filter_recent)),
            (GalleryFilter::Large, ids!(filter_large)),
        ] {
            let selected = if tab == filter { 1.0 } else { 0.0 };
            self.view.button(id).apply_over(cx, live! {
                draw_bg: { selected: (selected) }
                draw_text: { selected: (selected) }
            });
        }
        self.apply_filters(cx, store);
    }

    /// Recompute the visible images and the labels that depend on them.
    fn apply_filters(&mut self, cx: &mut Cx, store: &Store) {
        let now = chrono::Utc::now();
        self.visible = filter_images(&store.images, &self.search_query, self.filter, now)
            .into_iter()
            .cloned()
            .collect();
        self.loaded.clear();

        let filtered = !self.search_query.trim().is_empty() || self.filter != GalleryFilter::All;
        let count = if filtered {
            format!("{} of {} images shown · {}", self.visible.len(), store.images.len(), self.filter.label())
        } else {
            format!("{} of {} images loaded", store.images.len(), self.flow.total())
        };
        self.view.label(ids!(count_label)).set_text(cx, &count);

        let empty = self.flow.loaded_once() && self.visible.is_empty();
        self.view.widget(ids!(empty_state)).set_visible(cx, empty);
        self.view.widget(ids!(image_grid)).set_visible(cx, !empty);
        if empty {
            let (title, hint) = if store.images.is_empty() {
                ("No images yet", "Upload your first image to get recommendations.")
            } else {
                ("No images found", "Try a different search or filter.")
            };
            self.view.label(ids!(empty_title)).set_text(cx, title);
            self.view.label(ids!(empty_hint)).set_text(cx, hint);
            self.view.widget(ids!(empty_upload_btn)).set_visible(cx, store.images.is_empty());
        }

        self.update_footer(cx);
    }

    fn update_footer(&mut self, cx: &mut Cx) {
        let loading = self.flow.is_loading();
        self.view.widget(ids!(load_more_btn)).set_visible(cx, self.flow.has_more() && !loading);
        self.view.widget(ids!(status_label)).set_visible(cx, loading);
        if loading {
            self.view.label(ids!(status_label)).set_text(cx, "Loading images...");
        }
        self.view.redraw(cx);
    }

    fn draw_grid(&mut self, cx: &mut Cx2d, scope: &mut Scope, widget: WidgetRef) {
        let binding = widget.as_portal_list();
        let Some(mut list) = binding.borrow_mut() else { return };

        let rows = self.visible.len().div_ceil(COLUMNS);
        list.set_item_range(cx, 0, rows);
        while let Some(row) = list.next_visible_item(cx) {
            if row >= rows {
                continue;
            }
            let item = list.item(cx, row, live_id!(GalleryRow));
            for col in 0..COLUMNS {
                let view = card(&item, col);
                match self.visible.get(row * COLUMNS + col).cloned() {
                    Some(image) => {
                        view.set_visible(cx, true);
                        self.fill_card(cx, &view, (row, col), &image);
                    }
                    None => view.set_visible(cx, false),
                }
            }
            item.draw_all(cx, scope);
        }
    }

    fn fill_card(&mut self, cx: &mut Cx, view: &WidgetRef, slot: (usize, usize), image: &Image) {
        view.label(ids!(card_name)).set_text(cx, &image.original_name);
        view.label(ids!(card_meta))
            .set_text(cx, &format!("{} · {}", image.size_display(), image.dimensions_display()));
        let shown = if image.is_processed() {
            let tags = image.tags();
            tags.iter().take(CARD_TAGS).map(String::as_str).collect::<Vec<_>>().join(" · ")
        } else {
            "Analyzing...".to_string()
        };
        view.label(ids!(card_tags)).set_text(cx, &shown);

        let Some(api) = &self.api else { return };
        match self.thumbnails.request(api, &image.thumbnail_url) {
            ThumbnailState::Ready(data) => {
                if self.loaded.get(&slot) != Some(&image.thumbnail_url) {
                    let thumb = view.image(ids!(thumb));
                    if show_thumbnail(cx, &thumb, &data) {
                        self.loaded.insert(slot, image.thumbnail_url.clone());
                    }
                }
                let shown = self.loaded.contains_key(&slot);
                view.widget(ids!(thumb)).set_visible(cx, shown);
                view.widget(ids!(thumb_placeholder)).set_visible(cx, !shown);
            }
            ThumbnailState::Loading => {
                self.loaded.remove(&slot);
                view.widget(ids!(thumb)).set_visible(cx, false);
                view.label(ids!(thumb_placeholder)).set_text(cx, "Loading...");
                view.widget(ids!(thumb_placeholder)).set_visible(cx, true);
            }
            ThumbnailState::Failed => {
                self.loaded.remove(&slot);
                view.widget(ids!(thumb)).set_visible(cx, false);
                view.label(ids!(thumb_placeholder)).set_text(cx, "No preview");
                view.widget(ids!(thumb_placeholder)).set_visible(cx, true);
            }
        }
    }
}

fn card(row: &WidgetRef, col: usize) -> WidgetRef {
    match col {
        0 => row.widget(ids!(card_0)),
        1 => row.widget(ids!(card_1)),
        _ => row.widget(ids!(card_2)),
    }
}
