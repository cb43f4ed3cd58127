use makepad_widgets::*;
use super::RecommendationsScreen;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use pixrec_widgets::theme::*;
    use pixrec_widgets::components::*;

    SimilarityBadge = <RoundedView> {
        width: Fit, height: Fit
        padding: {left: 8, right: 8, top: 3, bottom: 3}
        draw_bg: { color: (GREEN_100), border_radius: 4.0 }
        badge_label = <Label> {
            draw_text: {
                color: (GREEN_600)
                text_style: <FONT_SEMIBOLD>{ font_size: 9.0 }
            }
        }
    }

    ThumbFrame = <View> {
        flow: Overlay
        align: {x: 0.5, y: 0.5}
        show_bg: true
        draw_bg: { color: (HOVER_BG) }
        placeholder = <HintText> { text: "Loading..." }
        thumb = <Image> {
            visible: false
            width: Fill, height: Fill
            fit: Biggest
        }
    }

    // ── Recommendation row ──

    RecommendationItem = <View> {
        width: Fill, height: Fit
        flow: Right
        spacing: 14
        padding: 12
        margin: {bottom: 8}
        cursor: Hand
        event_order: Down
        show_bg: true
        draw_bg: {
            instance hover: 0.0
            instance selected: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(1.0, 1.0, self.rect_size.x - 2.0, self.rect_size.y - 2.0, 8.0);
                sdf.fill_keep(mix(mix((WHITE), (PANEL_BG), self.hover), (BLUE_100), self.selected));
                sdf.stroke(mix((HOVER_BG), (BLUE_500), self.selected), 1.0);
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

        rank_label = <Label> {
            width: 24
            draw_text: {
                color: (TEXT_MUTED)
                text_style: <FONT_BOLD>{ font_size: 12.0 }
            }
        }
        rec_frame = <ThumbFrame> { width: 96, height: 72 }
        <View> {
            width: Fill, height: Fit
            flow: Down
            spacing: 4
            <View> {
                width: Fill, height: Fit
                flow: Right
                spacing: 8
                align: {y: 0.5}
                rec_name = <Label> {
                    width: Fill
                    draw_text: {
                        color: (TEXT_PRIMARY)
                        text_style: <FONT_SEMIBOLD>{ font_size: 11.0 }
                        wrap: Ellipsis
                    }
                }
                rec_badge = <SimilarityBadge> {}
            }
            rec_explanation = <BodyText> {}
        }
    }

    pub RecommendationsScreen = {{RecommendationsScreen}} {
        width: Fill, height: Fill
        flow: Down
        spacing: 16
        padding: {left: 40, right: 40, top: 28, bottom: 20}
        show_bg: true
        draw_bg: { color: (PAGE_BG) }

        <View> {
            width: Fill, height: Fit
            flow: Right
            spacing: 14
            align: {y: 0.5}
            back_btn = <SecondaryButton> { text: "← Back" }
            <PageTitle> { text: "Similar Images" }
        }

        <View> {
            width: Fill, height: Fill
            flow: Right
            spacing: 20

            // ── Reference image ──
            reference_panel = <Card> {
                width: 300, height: Fit
                spacing: 10
                <SectionTitle> { text: "Reference image" }
                ref_frame = <ThumbFrame> { width: Fill, height: 200 }
                ref_name = <Label> {
                    width: Fill
                    draw_text: {
                        color: (TEXT_PRIMARY)
                        text_style: <FONT_SEMIBOLD>{ font_size: 12.0 }
                        wrap: Word
                    }
                }
                ref_meta = <HintText> {}
                ref_description = <BodyText> { visible: false }

                colors_section = <View> {
                    width: Fill, height: Fit
                    flow: Down
                    spacing: 6
                    <HintText> { text: "Dominant colors" }
                    <View> {
                        width: Fill, height: Fit
                        flow: Down
                        spacing: 4
                        color_0 = <ColorSwatch> {}
                        color_1 = <ColorSwatch> {}
                        color_2 = <ColorSwatch> {}
                        color_3 = <ColorSwatch> {}
                        color_4 = <ColorSwatch> {}
                    }
                }

                tags_section = <View> {
                    width: Fill, height: Fit
                    flow: Down
                    spacing: 6
                    <HintText> { text: "Tags" }
                    ref_tags = <BodyText> {}
                }
            }

            // ── Results ──
            <View> {
                width: Fill, height: Fill
                flow: Down
                spacing: 10

                status_label = <HintText> { text: "Finding similar images..." }

                empty_state = <Card> {
                    visible: false
                    align: {x: 0.5}
                    empty_label = <BodyText> { text: "No similar images found." }
                }

                rec_list = <PortalList> {
                    width: Fill, height: Fill
                    flow: Down
                    RecommendationItem = <RecommendationItem> {}
                }
            }

            // ── Selected recommendation ──
            detail_panel = <Card> {
                visible: false
                width: 280, height: Fit
                spacing: 10
                <View> {
                    width: Fill, height: Fit
                    flow: Right
                    align: {y: 0.5}
                    <SectionTitle> { width: Fill, text: "Details" }
                    close_detail_btn = <SecondaryButton> { height: 28, text: "Close" }
                }
                detail_frame = <ThumbFrame> { width: Fill, height: 180 }
                detail_name = <Label> {
                    width: Fill
                    draw_text: {
                        color: (TEXT_PRIMARY)
                        text_style: <FONT_SEMIBOLD>{ font_size: 12.0 }
                        wrap: Word
                    }
                }
                detail_meta = <HintText> {}
                detail_badge = <SimilarityBadge> {}
                detail_explanation = <BodyText> {}
                <Divider> {}
                <View> {
                    width: Fill, height: Fit
                    flow: Right
                    spacing: 8
                    save_btn = <PrimaryButton> { text: "Save image" }
                    copy_link_btn = <SecondaryButton> { text: "Copy link" }
                }
            }
        }
    }
}
