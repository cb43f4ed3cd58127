pub mod design;

use std::sync::mpsc::{self, Receiver, Sender};

use makepad_widgets::*;
use pixrec_data::flows::{process_worker, upload_worker};
use pixrec_data::{
    FlowEffect, Notification, ProgressDisplay, Route, Store, Tagged, UploadCandidate, UploadFlow,
    UploadPhase, UploadUpdate,
};
use pixrec_widgets::{AppAction, ImageUpload, ImageUploadAction, PageLifecycle};

struct UpdateChannel {
    tx: Sender<Tagged<UploadUpdate>>,
    rx: Receiver<Tagged<UploadUpdate>>,
}

impl Default for UpdateChannel {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

#[derive(Live, LiveHook, Widget)]
pub struct UploadScreen {
    #[deref]
    view: View,

    #[rust] flow: UploadFlow,
    #[rust] channel: UpdateChannel,
    #[rust] status_shown: bool,
}

impl Widget for UploadScreen {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event, scope: &mut Scope) {
        let actions = cx.capture_actions(|cx| self.view.handle_event(cx, event, scope));

        let Some(store) = scope.data.get_mut::<Store>() else { return };

        for action in actions.iter() {
            match action.cast() {
                ImageUploadAction::Selected => self.flow.file_selected(),
                ImageUploadAction::Cancelled => self.flow.selection_cleared(),
                ImageUploadAction::Submitted(file) => self.start_upload(cx, file, store),
                ImageUploadAction::Rejected(message) => {
                    ::log::info!("Selection rejected: {}", message);
                }
                ImageUploadAction::None => {}
            }
        }

        self.poll_updates(cx, store);
        self.sync_uploader(cx, store);

        if self.flow.is_in_flight() {
            cx.new_next_frame();
        }
    }

    fn draw_walk(&mut self, cx: &mut Cx2d, scope: &mut Scope, walk: Walk) -> DrawStep {
        self.view.draw_walk(cx, scope, walk)
    }
}

impl PageLifecycle for UploadScreen {
    fn on_show(&mut self, cx: &mut Cx, _route: &Route, store: &mut Store) {
        self.finish_if_done(cx);
        self.sync_uploader(cx, store);
    }

    /// An upload in flight keeps running; only a finished one is reset.
    fn on_hide(&mut self, cx: &mut Cx) {
        self.finish_if_done(cx);
    }
}

impl UploadScreen {
    fn start_upload(&mut self, cx: &mut Cx, file: UploadCandidate, store: &mut Store) {
        let Some(token) = self.flow.begin_upload(file.clone(), store) else {
            cx.action(AppAction::Notify(Notification::warning(
                "Please wait for the current upload to finish.",
            )));
            return;
        };
        let api = store.api();
        let tx = self.channel.tx.clone();
        std::thread::spawn(move || upload_worker(api.as_ref(), &file, token, &tx));
        cx.new_next_frame();
    }

    fn poll_updates(&mut self, cx: &mut Cx, store: &mut Store) {
        let mut effects = Vec::new();
        while let Ok(update) = self.channel.rx.try_recv() {
            effects.extend(self.flow.apply(update, store));
        }

        for effect in effects {
            match effect {
                FlowEffect::Notify(notification) => cx.action(AppAction::Notify(notification)),
                FlowEffect::Process { image_id, token } => {
                    let api = store.api();
                    let tx = self.channel.tx.clone();
                    std::thread::spawn(move || process_worker(api.as_ref(), &image_id, token, &tx));
                }
                FlowEffect::NavigateAfter { route, delay } => {
                    cx.action(AppAction::NavigateAfter { route, delay });
                }
            }
        }
    }

    /// Push the flow and store state into the upload widget.
    fn sync_uploader(&mut self, cx: &mut Cx, store: &Store) {
        let busy = self.flow.is_busy();
        let progress = ProgressDisplay::new(store.is_uploading, store.upload_progress);
        if let Some(mut uploader) = self.view.widget(ids!(uploader)).borrow_mut::<ImageUpload>() {
            uploader.set_upload_state(cx, busy, progress);
        }

        let status = match self.flow.phase() {
            UploadPhase::Processing { .. } => Some("Processing image..."),
            UploadPhase::Finished { .. } => Some("Opening recommendations..."),
            _ => None,
        };
        if self.status_shown != status.is_some() {
            self.status_shown = status.is_some();
            self.view.widget(ids!(phase_status)).set_visible(cx, self.status_shown);
            self.view.redraw(cx);
        }
        if let Some(status) = status {
            self.view.label(ids!(phase_label)).set_text(cx, status);
        }
    }

    fn finish_if_done(&mut self, cx: &mut Cx) {
        if !matches!(self.flow.phase(), UploadPhase::Finished { .. }) {
            return;
        }
        self.flow.reset();
        if let Some(mut uploader) = self.view.widget(ids!(uploader)).borrow_mut::<ImageUpload>() {
            uploader.clear(cx);
        }
        self.status_shown = false;
        self.view.widget(ids!(phase_status)).set_visible(cx, false);
        self.view.redraw(cx);
    }
}
