//! Fonts and the color palette shared by every page.
//!
//! Hex literals avoid a digit directly followed by `e`, which the live
//! parser reads as an exponent.

use makepad_widgets::*;

live_design! {
    use link::theme::*;

    pub FONT_REGULAR = <THEME_FONT_REGULAR> {}
    pub FONT_MEDIUM = <THEME_FONT_REGULAR> {}
    pub FONT_SEMIBOLD = <THEME_FONT_BOLD> {}
    pub FONT_BOLD = <THEME_FONT_BOLD> {}

    // Surfaces
    pub WHITE = #ffffff
    pub PAGE_BG = #f5f7fa
    pub PANEL_BG = #f8fafc
    pub HOVER_BG = #f1f5f9
    pub DIVIDER = #d1d5db

    // Text
    pub TEXT_PRIMARY = #1f2937
    pub GRAY_700 = #374151
    pub GRAY_500 = #6b7280
    pub TEXT_MUTED = #9ca3af

    // Accents
    pub BLUE_100 = #dbeafe
    pub BLUE_500 = #3b82f6
    pub BLUE_600 = #2563fa
    pub GREEN_100 = #d1fae5
    pub GREEN_600 = #16a34a
    pub AMBER_100 = #fef3c7
    pub AMBER_600 = #d97706
    pub RED_100 = #fcdada
    pub RED_600 = #b91c1c
}
