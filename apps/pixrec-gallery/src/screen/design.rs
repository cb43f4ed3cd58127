use makepad_widgets::*;
use super::GalleryScreen;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use pixrec_widgets::theme::*;
    use pixrec_widgets::components::*;

    // ── Image card ──

    GalleryCard = <View> {
        width: Fill, height: 250
        flow: Down
        cursor: Hand
        event_order: Down
        show_bg: true
        draw_bg: {
            instance hover: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(1.0, 1.0, self.rect_size.x - 2.0, self.rect_size.y - 2.0, 8.0);
                sdf.fill_keep((WHITE));
                sdf.stroke(mix((HOVER_BG), (BLUE_500), self.hover), 1.0);
                return sdf.result;
            }
        }
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.1}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.1}} apply: { draw_bg: {hover: 1.0} } }
            }
        }

        thumb_area = <View> {
            width: Fill, height: 160
            flow: Overlay
            align: {x: 0.5, y: 0.5}
            show_bg: true
            draw_bg: { color: (HOVER_BG) }
            thumb_placeholder = <HintText> { text: "Loading..." }
            thumb = <Image> {
                visible: false
                width: Fill, height: Fill
                fit: Biggest
            }
        }

        <View> {
            width: Fill, height: Fit
            flow: Down
            spacing: 3
            padding: {left: 10, right: 10, top: 8, bottom: 8}
            card_name = <Label> {
                width: Fill
                draw_text: {
                    color: (TEXT_PRIMARY)
                    text_style: <FONT_SEMIBOLD>{ font_size: 11.0 }
                    wrap: Ellipsis
                }
            }
            card_meta = <HintText> {}
            card_tags = <Label> {
                width: Fill
                draw_text: {
                    color: (BLUE_600)
                    text_style: <FONT_REGULAR>{ font_size: 9.0 }
                    wrap: Ellipsis
                }
            }
        }
    }

    GalleryRow = <View> {
        width: Fill, height: Fit
        flow: Right
        spacing: 14
        padding: {bottom: 14}
        card_0 = <GalleryCard> {}
        card_1 = <GalleryCard> {}
        card_2 = <GalleryCard> {}
    }

    pub GalleryScreen = {{GalleryScreen}} {
        width: Fill, height: Fill
        flow: Down
        spacing: 14
        padding: {left: 40, right: 40, top: 32, bottom: 20}
        show_bg: true
        draw_bg: { color: (PAGE_BG) }

        // Title row
        <View> {
            width: Fill, height: Fit
            flow: Right
            align: {y: 0.5}
            <View> {
                width: Fill, height: Fit
                flow: Down
                spacing: 4
                <PageTitle> { text: "Image Gallery" }
                count_label = <HintText> { text: "" }
            }
            refresh_btn = <SecondaryButton> { text: "Refresh" }
        }

        // Search + filters
        <View> {
            width: Fill, height: Fit
            flow: Right
            spacing: 12
            align: {y: 0.5}
            search_input = <TextInput> {
                width: 320, height: 34
                empty_text: "Search by name or tag..."
                draw_bg: {
                    fn pixel(self) -> vec4 {
                        let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                        sdf.box(1.0, 1.0, self.rect_size.x - 2.0, self.rect_size.y - 2.0, 6.0);
                        sdf.fill_keep((WHITE));
                        sdf.stroke((DIVIDER), 1.0);
                        return sdf.result;
                    }
                }
                draw_text: {
                    color: (GRAY_700)
                    text_style: { font_size: 11.0 }
                }
            }
            <View> {
                width: Fit, height: Fit
                flow: Right
                filter_all = <FilterTab> { text: "All Images", draw_bg: { selected: 1.0 }, draw_text: { selected: 1.0 } }
                filter_recent = <FilterTab> { text: "Recent" }
                filter_large = <FilterTab> { text: "Large Files" }
            }
        }

        status_label = <HintText> { visible: false }

        // Empty state
        empty_state = <View> {
            visible: false
            width: Fill, height: Fill
            flow: Down
            spacing: 10
            align: {x: 0.5, y: 0.35}
            empty_title = <SectionTitle> { text: "No images found" }
            empty_hint = <HintText> { text: "Try a different search or filter." }
            empty_upload_btn = <PrimaryButton> { text: "Upload an image" }
        }

        image_grid = <PortalList> {
            width: Fill, height: Fill
            flow: Down
            GalleryRow = <GalleryRow> {}
        }

        footer = <View> {
            width: Fill, height: Fit
            align: {x: 0.5}
            padding: {top: 4}
            load_more_btn = <SecondaryButton> { visible: false, text: "Load more" }
        }
    }
}
