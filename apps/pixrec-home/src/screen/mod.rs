pub mod design;

use std::sync::mpsc::{self, Receiver, TryRecvError};

use makepad_widgets::*;
use pixrec_data::{ApiResult, RequestTracker, Route, Stats, Store, Tagged};
use pixrec_widgets::{AppAction, PageLifecycle};

/// How many tags the overview lists.
const TOP_TAGS_SHOWN: usize = 5;

#[derive(Live, LiveHook, Widget)]
pub struct HomeScreen {
    #[deref]
    view: View,

    #[rust] tracker: RequestTracker,
    #[rust] stats_rx: Option<Receiver<Tagged<ApiResult<Stats>>>>,
}

impl Widget for HomeScreen {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event, scope: &mut Scope) {
        self.poll_stats(cx);

        let actions = cx.capture_actions(|cx| self.view.handle_event(cx, event, scope));

        if self.view.button(ids!(upload_cta)).clicked(&actions) {
            cx.action(AppAction::Navigate(Route::Upload));
        }
        if self.view.button(ids!(gallery_cta)).clicked(&actions) {
            cx.action(AppAction::Navigate(Route::Gallery));
        }
    }

    fn draw_walk(&mut self, cx: &mut Cx2d, scope: &mut Scope, walk: Walk) -> DrawStep {
        self.view.draw_walk(cx, scope, walk)
    }
}

impl PageLifecycle for HomeScreen {
    fn on_show(&mut self, cx: &mut Cx, _route: &Route, store: &mut Store) {
        let token = self.tracker.begin();
        let api = store.api();
        let (tx, rx) = mpsc::channel();
        self.stats_rx = Some(rx);
        std::thread::spawn(move || {
            let _ = tx.send(Tagged::new(token, api.get_stats()));
        });
        cx.new_next_frame();
    }

    fn on_hide(&mut self, _cx: &mut Cx) {
        self.tracker.invalidate();
        self.stats_rx = None;
    }
}

impl HomeScreen {
    fn poll_stats(&mut self, cx: &mut Cx) {
        let Some(rx) = &self.stats_rx else { return };
        match rx.try_recv() {
            Ok(tagged) => {
                self.stats_rx = None;
                match tagged.accept(&self.tracker) {
                    Some(Ok(stats)) => self.show_stats(cx, &stats),
                    Some(Err(e)) => {
                        ::log::warn!("Statistics unavailable: {}", e);
                        self.view.label(ids!(stats_status)).set_text(cx, "Statistics are unavailable right now.");
                        self.view.widget(ids!(stats_status)).set_visible(cx, true);
                        self.view.redraw(cx);
                    }
                    None => {}
                }
            }
            Err(TryRecvError::Empty) => cx.new_next_frame(),
            Err(TryRecvError::Disconnected) => self.stats_rx = None,
        }
    }

    fn show_stats(&mut self, cx: &mut Cx, stats: &Stats) {
        self.view.label(ids!(total_tile.stat_value)).set_text(cx, &stats.total_images.to_string());
        self.view.label(ids!(processed_tile.stat_value)).set_text(cx, &stats.processed_images.to_string());
        self.view.label(ids!(storage_tile.stat_value)).set_text(cx, &stats.storage_display());
        self.view.label(ids!(time_tile.stat_value))
            .set_text(cx, &format!("{:.1} s", stats.average_processing_time));

        let tags = stats.top_tags_display(TOP_TAGS_SHOWN);
        self.view.widget(ids!(top_tags_label)).set_visible(cx, !tags.is_empty());
        self.view.label(ids!(top_tags_label)).set_text(cx, &format!("Popular tags: {}", tags));
        self.view.widget(ids!(stats_status)).set_visible(cx, false);
        self.view.redraw(cx);
    }
}
