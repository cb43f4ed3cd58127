pub mod design;

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use makepad_widgets::*;
use pixrec_data::flows::{recommendations_worker, save_image, share_link};
use pixrec_data::{
    ApiResult, FlowEffect, Image, ImageApi, Notification, Recommendation, RecommendationsFlow,
    RecommendationsUpdate, Route, Store, Tagged, ThumbnailCache, ThumbnailState,
};
use pixrec_widgets::{show_thumbnail, AppAction, PageLifecycle};

/// Dominant colors shown for the reference image.
const COLORS_SHOWN: usize = 5;

struct UpdateChannel {
    tx: Sender<Tagged<RecommendationsUpdate>>,
    rx: Receiver<Tagged<RecommendationsUpdate>>,
}

impl Default for UpdateChannel {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

/// Which `ThumbFrame` a thumbnail was loaded into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Frame {
    Reference,
    Detail,
    Row(usize),
}

#[derive(Live, LiveHook, Widget)]
pub struct RecommendationsScreen {
    #[deref]
    view: View,

    #[rust] flow: RecommendationsFlow,
    #[rust] channel: UpdateChannel,
    #[rust] thumbnails: ThumbnailCache,
    #[rust] api: Option<Arc<dyn ImageApi>>,

    /// Snapshot of the store's list for drawing
    #[rust] recommendations: Vec<Recommendation>,
    #[rust] selected: Option<usize>,
    #[rust] loaded: HashMap<Frame, String>,
    #[rust] save_rx: Option<Receiver<(String, ApiResult<()>)>>,
}

impl Widget for RecommendationsScreen {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event, scope: &mut Scope) {
        let actions = cx.capture_actions(|cx| self.view.handle_event(cx, event, scope));

        let Some(store) = scope.data.get_mut::<Store>() else { return };

        self.poll_updates(cx, store);
        self.poll_save(cx);
        if self.thumbnails.poll() {
            self.sync_reference(cx, store);
            self.sync_detail(cx);
            self.view.redraw(cx);
        }
        if self.flow.is_loading() || self.thumbnails.is_pending() || self.save_rx.is_some() {
            cx.new_next_frame();
        }

        if self.view.button(ids!(back_btn)).clicked(&actions) {
            cx.action(AppAction::Back);
        }

        let list = self.view.portal_list(ids!(rec_list));
        for (item_id, item) in list.items_with_actions(&actions) {
            if let Some(fd) = item.as_view().finger_down(&actions) {
                if fd.tap_count == 1 && item_id < self.recommendations.len() {
                    self.select(cx, Some(item_id));
                }
            }
        }

        if self.view.button(ids!(close_detail_btn)).clicked(&actions) {
            self.select(cx, None);
        }
        if self.view.button(ids!(save_btn)).clicked(&actions) {
            self.save_selected(cx);
            cx.new_next_frame();
        }
        if self.view.button(ids!(copy_link_btn)).clicked(&actions) {
            if let Some(image) = self.selected_image() {
                let link = share_link(store, &image.url);
                cx.copy_to_clipboard(&link);
                ::log::info!("Copied link {}", link);
                cx.action(AppAction::Notify(Notification::success("Link copied to clipboard.")));
            }
        }
    }

    fn draw_walk(&mut self, cx: &mut Cx2d, scope: &mut Scope, walk: Walk) -> DrawStep {
        let list = self.view.portal_list(ids!(rec_list));
        let list_uid = list.widget_uid();

        while let Some(widget) = self.view.draw_walk(cx, scope, walk).step() {
            if widget.widget_uid() == list_uid {
                self.draw_list(cx, scope, widget);
            }
        }
        DrawStep::done()
    }
}

impl PageLifecycle for RecommendationsScreen {
    fn on_show(&mut self, cx: &mut Cx, route: &Route, store: &mut Store) {
        let Some(image_id) = route.image_id().filter(|id| !id.is_empty()) else {
            ::log::warn!("Recommendations opened without an image id");
            return;
        };
        self.api = Some(store.api());
        self.select(cx, None);

        let request = self.flow.begin(image_id, store);
        ::log::info!("Loading recommendations for {} (fetch image: {})", image_id, request.fetch_image);
        let api = store.api();
        let tx = self.channel.tx.clone();
        std::thread::spawn(move || recommendations_worker(api.as_ref(), &request, &tx));

        self.recommendations = store.recommendations.clone();
        self.loaded.clear();
        self.sync_reference(cx, store);
        self.sync_status(cx, store);
        cx.new_next_frame();
    }

    fn on_hide(&mut self, _cx: &mut Cx) {
        self.flow.cancel();
    }
}

impl RecommendationsScreen {
    fn poll_updates(&mut self, cx: &mut Cx, store: &mut Store) {
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
            self.recommendations = store.recommendations.clone();
            self.loaded.retain(|frame, _| !matches!(frame, Frame::Row(_)));
            self.sync_reference(cx, store);
            self.sync_status(cx, store);
            self.view.redraw(cx);
        }
    }

    fn poll_save(&mut self, cx: &mut Cx) {
        let Some(rx) = &self.save_rx else { return };
        match rx.try_recv() {
            Ok((name, result)) => {
                self.save_rx = None;
                let notification = match result {
                    Ok(()) => Notification::success(format!("Saved {}.", name)),
                    Err(e) => Notification::from_api_error("Failed to save image.", &e),
                };
                cx.action(AppAction::Notify(notification));
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.save_rx = None,
        }
    }

    fn selected_image(&self) -> Option<&Image> {
        self.selected
            .and_then(|i| self.recommendations.get(i))
            .map(|rec| &rec.image)
    }

    /// Ask for a destination and download the selected image there.
    fn save_selected(&mut self, cx: &mut Cx) {
        if self.save_rx.is_some() {
            return;
        }
        let (Some(image), Some(api)) = (self.selected_image().cloned(), self.api.clone()) else {
            return;
        };
        let picked = rfd::FileDialog::new()
            .set_title("Save image")
            .set_file_name(&image.original_name)
            .save_file();
        let Some(dest) = picked else { return };

        cx.action(AppAction::Notify(Notification::info(format!(
            "Saving {}...",
            image.original_name
        ))));
        let (tx, rx) = mpsc::channel();
        self.save_rx = Some(rx);
        std::thread::spawn(move || {
            let result = save_image(api.as_ref(), &image.url, &dest);
            let _ = tx.send((image.original_name, result));
        });
    }

    fn select(&mut self, cx: &mut Cx, index: Option<usize>) {
        self.selected = index;
        self.loaded.remove(&Frame::Detail);
        self.view.widget(ids!(detail_panel)).set_visible(cx, index.is_some());
        self.sync_detail(cx);
        self.view.redraw(cx);
    }

    fn sync_status(&mut self, cx: &mut Cx, store: &Store) {
        let status = if self.flow.is_loading() {
            Some("Finding similar images...".to_string())
        } else if !self.recommendations.is_empty() {
            Some(format!("{} similar images", self.recommendations.len()))
        } else {
            None
        };
        self.view.widget(ids!(status_label)).set_visible(cx, status.is_some());
        self.view.label(ids!(status_label)).set_text(cx, status.as_deref().unwrap_or(""));

        let empty = self.flow.empty_state_text(store);
        self.view.widget(ids!(empty_state)).set_visible(cx, empty.is_some());
        self.view.label(ids!(empty_label)).set_text(cx, empty.as_deref().unwrap_or(""));
        self.view.widget(ids!(rec_list)).set_visible(cx, empty.is_none());
    }

    fn sync_reference(&mut self, cx: &mut Cx, store: &Store) {
        let current = store
            .current_image
            .as_ref()
            .filter(|image| Some(image.id.as_str()) == self.flow.image_id())
            .cloned();
        let Some(image) = current else {
            let placeholder = self.flow.reference_placeholder();
            let frame = self.view.widget(ids!(ref_frame));
            frame.widget(ids!(thumb)).set_visible(cx, false);
            frame.widget(ids!(placeholder)).set_visible(cx, true);
            frame.label(ids!(placeholder))
                .set_text(cx, if self.flow.failed() { "No preview" } else { "Loading..." });
            self.view.label(ids!(ref_name)).set_text(cx, placeholder);
            self.view.label(ids!(ref_meta)).set_text(cx, "");
            self.view.widget(ids!(colors_section)).set_visible(cx, false);
            self.view.widget(ids!(tags_section)).set_visible(cx, false);
            self.view.widget(ids!(ref_description)).set_visible(cx, false);
            return;
        };

        self.view.label(ids!(ref_name)).set_text(cx, &image.original_name);
        self.view.label(ids!(ref_meta))
            .set_text(cx, &format!("{} · {}", image.size_display(), image.dimensions_display()));

        let description = image.metadata.as_ref().and_then(|m| m.description.clone());
        self.view.widget(ids!(ref_description)).set_visible(cx, description.is_some());
        self.view.label(ids!(ref_description)).set_text(cx, description.as_deref().unwrap_or(""));

        let colors = image.dominant_colors(COLORS_SHOWN);
        self.view.widget(ids!(colors_section)).set_visible(cx, !colors.is_empty());
        let swatches = [
            self.view.widget(ids!(color_0)),
            self.view.widget(ids!(color_1)),
            self.view.widget(ids!(color_2)),
            self.view.widget(ids!(color_3)),
            self.view.widget(ids!(color_4)),
        ];
        for (i, swatch) in swatches.iter().enumerate() {
            let Some(color) = colors.get(i) else {
                swatch.set_visible(cx, false);
                continue;
            };
            swatch.set_visible(cx, true);
            swatch.label(ids!(swatch_label)).set_text(cx, &color.label());
            if let Some([r, g, b, a]) = color.rgba() {
                swatch.view(ids!(swatch)).apply_over(cx, live! {
                    draw_bg: { color: (vec4(r, g, b, a)) }
                });
            }
        }

        let tags = image.tags();
        self.view.widget(ids!(tags_section)).set_visible(cx, !tags.is_empty());
        self.view.label(ids!(ref_tags)).set_text(cx, &tags.join(", "));

        let frame = self.view.widget(ids!(ref_frame));
        self.fill_frame(cx, &frame, Frame::Reference, &image.thumbnail_url);
    }

    fn sync_detail(&mut self, cx: &mut Cx) {
        let Some(rec) = self.selected.and_then(|i| self.recommendations.get(i)).cloned() else {
            return;
        };
        let image = &rec.image;
        self.view.label(ids!(detail_name)).set_text(cx, &image.original_name);
        self.view.label(ids!(detail_meta))
            .set_text(cx, &format!("{} · {}", image.size_display(), image.dimensions_display()));
        self.view.label(ids!(detail_badge.badge_label)).set_text(cx, &rec.badge_text());
        self.view.label(ids!(detail_explanation)).set_text(cx, &rec.explanation);

        let frame = self.view.widget(ids!(detail_frame));
        self.fill_frame(cx, &frame, Frame::Detail, &image.thumbnail_url);
    }

    /// Show the thumbnail for `url` in a `ThumbFrame`, or its placeholder.
    fn fill_frame(&mut self, cx: &mut Cx, frame: &WidgetRef, slot: Frame, url: &str) {
        let Some(api) = &self.api else { return };
        let placeholder = match self.thumbnails.request(api, url) {
            ThumbnailState::Ready(data) => {
                if self.loaded.get(&slot).map(String::as_str) != Some(url)
                    && show_thumbnail(cx, &frame.image(ids!(thumb)), &data)
                {
                    self.loaded.insert(slot, url.to_string());
                }
                None
            }
            ThumbnailState::Loading => Some("Loading..."),
            ThumbnailState::Failed => Some("No preview"),
        };
        let shown = placeholder.is_none() && self.loaded.contains_key(&slot);
        if !shown {
            self.loaded.remove(&slot);
        }
        frame.widget(ids!(thumb)).set_visible(cx, shown);
        frame.widget(ids!(placeholder)).set_visible(cx, !shown);
        frame.label(ids!(placeholder)).set_text(cx, placeholder.unwrap_or("No preview"));
    }

    fn draw_list(&mut self, cx: &mut Cx2d, scope: &mut Scope, widget: WidgetRef) {
        let binding = widget.as_portal_list();
        let Some(mut list) = binding.borrow_mut() else { return };

        let count = self.recommendations.len();
        list.set_item_range(cx, 0, count);
        while let Some(item_id) = list.next_visible_item(cx) {
            let Some(rec) = self.recommendations.get(item_id).cloned() else { continue };
            let item = list.item(cx, item_id, live_id!(RecommendationItem));

            let selected = if self.selected == Some(item_id) { 1.0 } else { 0.0 };
            item.apply_over(cx, live! { draw_bg: { selected: (selected) } });
            item.label(ids!(rank_label)).set_text(cx, &format!("{}", item_id + 1));
            item.label(ids!(rec_name)).set_text(cx, &rec.image.original_name);
            item.label(ids!(rec_badge.badge_label)).set_text(cx, &rec.badge_text());
            item.label(ids!(rec_explanation)).set_text(cx, &rec.explanation);

            let frame = item.widget(ids!(rec_frame));
            self.fill_frame(cx, &frame, Frame::Row(item_id), &rec.image.thumbnail_url);
            item.draw_all(cx, scope);
        }
    }
}
