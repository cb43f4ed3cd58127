//! Image upload widget: drop zone, file picker, preview and confirm/cancel.
//!
//! The widget knows nothing about the network. A confirmed file is handed to
//! the parent as [`ImageUploadAction::Submitted`]; the parent mirrors its
//! upload state back through [`ImageUpload::set_upload_state`].

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};

use makepad_widgets::*;
use pixrec_data::upload::PICKER_EXTENSIONS;
use pixrec_data::{
    spawn_preview, DecodedPreview, PreviewState, ProgressDisplay, SelectionSource,
    UploadCandidate, UploadSelection,
};

use crate::components::show_thumbnail;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use crate::theme::*;
    use crate::components::*;

    DropZone = <View> {
        width: Fill, height: 200
        flow: Down
        spacing: 8
        align: {x: 0.5, y: 0.5}
        cursor: Hand
        event_order: Down
        show_bg: true
        draw_bg: {
            instance hover: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(1.0, 1.0, self.rect_size.x - 2.0, self.rect_size.y - 2.0, 10.0);
                sdf.fill_keep(mix((PANEL_BG), (BLUE_100), self.hover));
                // Dashed outline
                let px = self.pos.x * self.rect_size.x + self.pos.y * self.rect_size.y;
                let dash = step(0.5, fract(px / 16.0));
                sdf.stroke(mix((PANEL_BG), (GRAY_500), dash), 1.5);
                return sdf.result;
            }
        }
        drop_title = <Label> {
            text: "Drag & drop an image here"
            draw_text: {
                color: (GRAY_700)
                text_style: <FONT_SEMIBOLD>{ font_size: 14.0 }
            }
        }
        drop_hint = <HintText> {
            text: "or click to browse · JPEG, PNG or WebP up to 10 MB"
        }
    }

    pub ImageUpload = {{ImageUpload}} {
        width: Fill, height: Fit
        flow: Down
        spacing: 12

        drop_zone = <DropZone> {}

        rejection_label = <ErrorText> { visible: false }

        pending_panel = <Card> {
            visible: false
            spacing: 10

            preview_image = <Image> {
                width: Fill, height: 280
                fit: Smallest
            }
            preview_status = <HintText> {}

            file_name = <Label> {
                width: Fill
                draw_text: {
                    color: (TEXT_PRIMARY)
                    text_style: <FONT_SEMIBOLD>{ font_size: 12.0 }
                    wrap: Ellipsis
                }
            }
            file_details = <HintText> {}

            progress_section = <View> {
                visible: false
                width: Fill, height: Fit
                flow: Down
                spacing: 6
                progress_bar = <ProgressBar> {}
                progress_label = <BodyText> {}
            }

            actions_row = <View> {
                width: Fill, height: Fit
                flow: Right
                spacing: 8
                upload_btn = <PrimaryButton> { text: "Upload Image" }
                cancel_btn = <SecondaryButton> { text: "Cancel" }
            }
        }
    }
}

/// Actions posted to the parent page.
#[derive(Clone, Debug, DefaultNone)]
pub enum ImageUploadAction {
    /// A valid file is pending confirmation
    Selected,
    /// The user confirmed the pending file
    Submitted(UploadCandidate),
    Cancelled,
    /// The file was refused before any upload; carries the shown message
    Rejected(String),
    None,
}

#[derive(Live, LiveHook, Widget)]
pub struct ImageUpload {
    #[deref]
    view: View,

    #[rust]
    selection: UploadSelection,
    #[rust]
    preview_rx: Option<Receiver<DecodedPreview>>,
    #[rust]
    progress: ProgressDisplay,
    /// Parent-side busy window (uploading or processing)
    #[rust]
    busy: bool,
}

impl Widget for ImageUpload {
    fn handle_event(&mut self, cx: &mut Cx, event: &Event, scope: &mut Scope) {
        self.poll_preview(cx);
        self.handle_drop(cx, event, scope);

        let actions = cx.capture_actions(|cx| self.view.handle_event(cx, event, scope));

        if self.selection.controls_enabled() {
            if let Some(fd) = self.view.view(ids!(drop_zone)).finger_down(&actions) {
                if fd.tap_count == 1 {
                    self.open_picker(cx, scope);
                }
            }
        }

        if self.view.button(ids!(upload_btn)).clicked(&actions) {
            let mut submitted = None;
            if self.selection.confirm(|file| submitted = Some(file)) {
                if let Some(file) = submitted {
                    ::log::info!("Upload confirmed for {}", file.name);
                    cx.widget_action(self.widget_uid(), &scope.path, ImageUploadAction::Submitted(file));
                }
                self.refresh(cx);
            }
        }

        if self.view.button(ids!(cancel_btn)).clicked(&actions) && self.selection.cancel() {
            self.preview_rx = None;
            cx.widget_action(self.widget_uid(), &scope.path, ImageUploadAction::Cancelled);
            self.refresh(cx);
        }
    }

    fn draw_walk(&mut self, cx: &mut Cx2d, scope: &mut Scope, walk: Walk) -> DrawStep {
        self.view.draw_walk(cx, scope, walk)
    }
}

impl ImageUpload {
    /// Mirror the parent's upload state. While `busy` every control is
    /// hidden and inert; the progress display follows `progress`.
    /// A `busy == false` report also ends a submission the parent never
    /// saw as busy, e.g. an upload that failed at once.
    pub fn set_upload_state(&mut self, cx: &mut Cx, busy: bool, progress: ProgressDisplay) {
        let was_enabled = self.selection.controls_enabled();
        self.selection.set_busy(busy);
        let changed = self.busy != busy
            || self.progress != progress
            || self.selection.controls_enabled() != was_enabled;
        self.busy = busy;
        self.progress = progress;
        if changed {
            self.refresh(cx);
        }
    }

    /// Forget the pending file and its preview.
    pub fn clear(&mut self, cx: &mut Cx) {
        self.selection.reset();
        self.selection.set_busy(self.busy);
        self.preview_rx = None;
        self.refresh(cx);
    }

    pub fn has_pending(&self) -> bool {
        self.selection.pending().is_some()
    }

    fn open_picker(&mut self, cx: &mut Cx, scope: &mut Scope) {
        let picked = rfd::FileDialog::new()
            .set_title("Select an image")
            .add_filter("Images", &PICKER_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            self.select_path(cx, scope, path, SelectionSource::Picker);
        }
    }

    fn handle_drop(&mut self, cx: &mut Cx, event: &Event, scope: &mut Scope) {
        let area = self.view.widget(ids!(drop_zone)).area();
        match event.drag_hits(cx, area) {
            DragHit::Drag(drag) => {
                if self.selection.controls_enabled() {
                    drag.response.set(DragResponse::Copy);
                }
            }
            DragHit::Drop(drop) => {
                let path = drop.items.iter().find_map(|item| match item {
                    DragItem::FilePath { path, .. } => Some(PathBuf::from(path)),
                    _ => None,
                });
                if let Some(path) = path {
                    self.select_path(cx, scope, path, SelectionSource::Drop);
                }
            }
            _ => {}
        }
    }

    fn select_path(&mut self, cx: &mut Cx, scope: &mut Scope, path: PathBuf, source: SelectionSource) {
        if !self.selection.controls_enabled() {
            return;
        }
        let uid = self.widget_uid();
        let file = match UploadCandidate::from_path(&path) {
            Ok(file) => file,
            Err(e) => {
                ::log::warn!("Cannot read {:?}: {}", path, e);
                let message = format!("Could not read the selected file: {}", e);
                self.view.label(ids!(rejection_label)).set_text(cx, &message);
                self.view.widget(ids!(rejection_label)).set_visible(cx, true);
                cx.widget_action(uid, &scope.path, ImageUploadAction::Rejected(message));
                return;
            }
        };

        match self.selection.select(file, source) {
            Ok(pending) => {
                let path = pending.file.path.clone();
                self.preview_rx = Some(spawn_preview(path));
                cx.widget_action(uid, &scope.path, ImageUploadAction::Selected);
                cx.new_next_frame();
            }
            Err(rejection) => {
                cx.widget_action(uid, &scope.path, ImageUploadAction::Rejected(rejection.to_string()));
            }
        }
        self.refresh(cx);
    }

    fn poll_preview(&mut self, cx: &mut Cx) {
        let Some(rx) = &self.preview_rx else { return };
        match rx.try_recv() {
            Ok(decoded) => {
                self.preview_rx = None;
                if self.selection.set_preview(&decoded.path, decoded.state) {
                    if let Some(display) = &decoded.display {
                        show_thumbnail(cx, &self.view.image(ids!(preview_image)), display);
                    }
                    self.refresh(cx);
                }
            }
            Err(TryRecvError::Empty) => cx.new_next_frame(),
            Err(TryRecvError::Disconnected) => self.preview_rx = None,
        }
    }

    fn refresh(&mut self, cx: &mut Cx) {
        let enabled = self.selection.controls_enabled();

        let rejection = self.selection.rejection().map(|r| r.to_string());
        self.view.widget(ids!(rejection_label)).set_visible(cx, rejection.is_some());
        self.view.label(ids!(rejection_label)).set_text(cx, rejection.as_deref().unwrap_or(""));

        self.view.widget(ids!(drop_zone)).set_visible(cx, enabled);

        let pending = self.selection.pending().cloned();
        self.view.widget(ids!(pending_panel)).set_visible(cx, pending.is_some());
        if let Some(pending) = &pending {
            let file = &pending.file;
            self.view.label(ids!(file_name)).set_text(cx, &file.name);
            self.view.label(ids!(file_details))
                .set_text(cx, &format!("{} · {}", file.size_display(), file.mime_type));
            let status = match &pending.preview {
                PreviewState::Decoding => "Loading preview...".to_string(),
                PreviewState::Ready(info) => format!("{} × {} px", info.width, info.height),
                PreviewState::Failed(_) => "Preview unavailable".to_string(),
            };
            self.view.label(ids!(preview_status)).set_text(cx, &status);
            self.view.widget(ids!(preview_image))
                .set_visible(cx, matches!(pending.preview, PreviewState::Ready(_)));
        }

        self.view.widget(ids!(actions_row)).set_visible(cx, enabled);

        match self.progress.label() {
            Some(label) => {
                let indeterminate = if self.progress == ProgressDisplay::Indeterminate { 1.0 } else { 0.0 };
                let fraction = self.progress.fraction();
                self.view.widget(ids!(progress_section)).set_visible(cx, true);
                self.view.view(ids!(progress_bar)).apply_over(cx, live! {
                    draw_bg: { progress: (fraction), indeterminate: (indeterminate) }
                });
                self.view.label(ids!(progress_label)).set_text(cx, &label);
            }
            None => self.view.widget(ids!(progress_section)).set_visible(cx, false),
        }

        self.view.redraw(cx);
    }
}
