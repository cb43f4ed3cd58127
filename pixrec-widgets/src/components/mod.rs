pub mod image_upload;

use makepad_widgets::*;
use pixrec_data::{ThumbnailData, ThumbnailFormat};

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use crate::theme::*;

    // ========================================================================
    // SHARED TEXT STYLES
    // ========================================================================

    pub PageTitle = <Label> {
        draw_text: {
            color: (TEXT_PRIMARY)
            text_style: <FONT_SEMIBOLD>{ font_size: 22.0 }
        }
    }

    // Section title: semibold, 16px, primary color
    pub SectionTitle = <Label> {
        draw_text: {
            color: (TEXT_PRIMARY)
            text_style: <FONT_SEMIBOLD>{ font_size: 16.0 }
        }
    }

    // Body text: regular, 11px, secondary gray
    pub BodyText = <Label> {
        width: Fill
        draw_text: {
            color: (GRAY_700)
            text_style: <FONT_REGULAR>{ font_size: 11.0 }
            wrap: Word
        }
    }

    // Hint/muted text: regular, 10px, muted gray
    pub HintText = <Label> {
        draw_text: {
            color: (TEXT_MUTED)
            text_style: <FONT_REGULAR>{ font_size: 10.0 }
        }
    }

    pub ErrorText = <Label> {
        width: Fill
        draw_text: {
            color: (RED_600)
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
            wrap: Word
        }
    }

    // ========================================================================
    // BUTTONS
    // ========================================================================

    pub PrimaryButton = <Button> {
        width: Fit, height: 36
        padding: {left: 18, right: 18}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.1}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.1}} apply: { draw_bg: {hover: 1.0} } }
            }
            pressed = {
                default: off,
                off = { from: {all: Forward {duration: 0.07}} apply: { draw_bg: {pressed: 0.0} } }
                on  = { from: {all: Forward {duration: 0.07}} apply: { draw_bg: {pressed: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            instance pressed: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 6.0);
                let color = mix((BLUE_500), (BLUE_600), self.hover);
                sdf.fill(mix(color, color * 0.9, self.pressed));
                return sdf.result;
            }
        }
        draw_text: {
            fn get_color(self) -> vec4 { return (WHITE); }
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
        }
    }

    pub SecondaryButton = <Button> {
        width: Fit, height: 36
        padding: {left: 18, right: 18}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.1}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.1}} apply: { draw_bg: {hover: 1.0} } }
            }
            pressed = {
                default: off,
                off = { from: {all: Forward {duration: 0.07}} apply: { draw_bg: {pressed: 0.0} } }
                on  = { from: {all: Forward {duration: 0.07}} apply: { draw_bg: {pressed: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            instance pressed: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(1.0, 1.0, self.rect_size.x - 2.0, self.rect_size.y - 2.0, 6.0);
                let color = mix((WHITE), (HOVER_BG), self.hover);
                sdf.fill_keep(mix(color, color * 0.95, self.pressed));
                sdf.stroke((DIVIDER), 1.0);
                return sdf.result;
            }
        }
        draw_text: {
            fn get_color(self) -> vec4 { return (GRAY_700); }
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
        }
    }

    // Filter tab with a selected state driven from Rust via apply_over
    pub FilterTab = <Button> {
        width: Fit, height: 28
        padding: {left: 12, right: 12}
        margin: {right: 6}
        animator: {
            hover = {
                default: off,
                off = { from: {all: Forward {duration: 0.1}} apply: { draw_bg: {hover: 0.0} } }
                on  = { from: {all: Forward {duration: 0.1}} apply: { draw_bg: {hover: 1.0} } }
            }
            pressed = {
                default: off,
                off = { from: {all: Forward {duration: 0.07}} apply: { draw_bg: {pressed: 0.0} } }
                on  = { from: {all: Forward {duration: 0.07}} apply: { draw_bg: {pressed: 1.0} } }
            }
        }
        draw_bg: {
            instance hover: 0.0
            instance pressed: 0.0
            instance selected: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 4.0);
                let color = mix(mix((HOVER_BG), (BLUE_100), self.hover), (BLUE_500), self.selected);
                sdf.fill(mix(color, color * 0.9, self.pressed));
                return sdf.result;
            }
        }
        draw_text: {
            instance selected: 0.0
            fn get_color(self) -> vec4 {
                return mix((GRAY_700), (WHITE), self.selected);
            }
            text_style: <FONT_MEDIUM>{ font_size: 11.0 }
        }
    }

    // ========================================================================
    // CONTAINERS
    // ========================================================================

    pub Card = <View> {
        width: Fill, height: Fit
        flow: Down
        padding: {left: 16, right: 16, top: 14, bottom: 14}
        show_bg: true
        draw_bg: {
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(1.0, 1.0, self.rect_size.x - 2.0, self.rect_size.y - 2.0, 8.0);
                sdf.fill_keep((WHITE));
                sdf.stroke((HOVER_BG), 1.0);
                return sdf.result;
            }
        }
    }

    pub Divider = <View> {
        width: Fill, height: 1
        show_bg: true
        draw_bg: { color: (HOVER_BG) }
    }

    // Stat tile: big number over a caption
    pub StatTile = <Card> {
        width: Fill
        spacing: 4
        stat_value = <Label> {
            text: "-"
            draw_text: {
                color: (TEXT_PRIMARY)
                text_style: <FONT_BOLD>{ font_size: 20.0 }
            }
        }
        stat_caption = <HintText> {}
    }

    // ========================================================================
    // PROGRESS BAR
    // `progress` in [0,1]; `indeterminate` swaps the fill for stripes
    // ========================================================================

    pub ProgressBar = <View> {
        width: Fill, height: 8
        show_bg: true
        draw_bg: {
            instance progress: 0.0
            instance indeterminate: 0.0
            fn pixel(self) -> vec4 {
                let sdf = Sdf2d::viewport(self.pos * self.rect_size);
                sdf.box(0.0, 0.0, self.rect_size.x, self.rect_size.y, 4.0);
                sdf.fill((HOVER_BG));
                let px = self.pos.x * self.rect_size.x;
                let py = self.pos.y * self.rect_size.y;
                let stripe = step(0.5, fract((px - py) / 14.0));
                let stripes = mix((BLUE_100), (BLUE_500), stripe * 0.6);
                sdf.box(0.0, 0.0, self.rect_size.x * self.progress, self.rect_size.y, 4.0);
                sdf.fill((BLUE_500));
                return mix(sdf.result, stripes, self.indeterminate);
            }
        }
    }

    // ========================================================================
    // CHIPS AND SWATCHES
    // ========================================================================

    pub TagChip = <RoundedView> {
        width: Fit, height: Fit
        padding: {left: 8, right: 8, top: 3, bottom: 3}
        margin: {right: 6}
        draw_bg: { color: (BLUE_100), border_radius: 4.0 }
        chip_label = <Label> {
            draw_text: {
                color: (BLUE_600)
                text_style: <FONT_MEDIUM>{ font_size: 9.0 }
            }
        }
    }

    // Dominant color: square swatch plus its label
    pub ColorSwatch = <View> {
        width: Fit, height: Fit
        flow: Right
        align: {y: 0.5}
        margin: {right: 14}
        swatch = <RoundedView> {
            width: 20, height: 20
            margin: {right: 6}
            draw_bg: { color: #cccccc, border_radius: 4.0 }
        }
        swatch_label = <HintText> {}
    }
}

/// Upload decoded thumbnail bytes into an `Image` widget.
pub fn show_thumbnail(cx: &mut Cx, image: &ImageRef, data: &ThumbnailData) -> bool {
    let result = match data.format {
        ThumbnailFormat::Png => image.load_png_from_data(cx, &data.bytes),
        ThumbnailFormat::Jpeg => image.load_jpg_from_data(cx, &data.bytes),
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            ::log::warn!("Failed to load thumbnail into image widget: {:?}", e);
            false
        }
    }
}
