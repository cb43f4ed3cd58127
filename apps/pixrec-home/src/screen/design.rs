use makepad_widgets::*;
use super::HomeScreen;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use pixrec_widgets::theme::*;
    use pixrec_widgets::components::*;

    FeatureCard = <Card> {
        width: Fill
        spacing: 6
        padding: {left: 20, right: 20, top: 18, bottom: 18}
        feature_title = <Label> {
            draw_text: {
                color: (TEXT_PRIMARY)
                text_style: <FONT_SEMIBOLD>{ font_size: 13.0 }
            }
        }
        feature_body = <BodyText> {}
    }

    pub HomeScreen = {{HomeScreen}} {
        width: Fill, height: Fill
        show_bg: true
        draw_bg: { color: (PAGE_BG) }

        <ScrollYView> {
            width: Fill, height: Fill
            flow: Down
            spacing: 28
            padding: {left: 40, right: 40, top: 36, bottom: 36}

            // ── Hero ──────────────────────────────────────────────────────
            hero = <View> {
                width: Fill, height: Fit
                flow: Down
                spacing: 12

                <Label> {
                    text: "Image Recommendations"
                    draw_text: {
                        color: (TEXT_PRIMARY)
                        text_style: <FONT_BOLD>{ font_size: 30.0 }
                    }
                }
                <BodyText> {
                    text: "Discover visually similar images. Upload a picture and get recommendations based on its colors, style and visual content."
                    draw_text: { text_style: { font_size: 13.0 } }
                }
                <View> {
                    width: Fit, height: Fit
                    flow: Right
                    spacing: 10
                    margin: {top: 8}
                    upload_cta = <PrimaryButton> { text: "Get Started" }
                    gallery_cta = <SecondaryButton> { text: "Explore Gallery" }
                }
            }

            // ── Live statistics ───────────────────────────────────────────
            <SectionTitle> { text: "Your Collection" }
            <View> {
                width: Fill, height: Fit
                flow: Right
                spacing: 12
                total_tile = <StatTile> { stat_caption = { text: "Images" } }
                processed_tile = <StatTile> { stat_caption = { text: "Processed" } }
                storage_tile = <StatTile> { stat_caption = { text: "Storage used" } }
                time_tile = <StatTile> { stat_caption = { text: "Avg. processing time" } }
            }
            top_tags_label = <BodyText> { visible: false }
            stats_status = <HintText> { text: "Loading statistics..." }

            // ── How it works ──────────────────────────────────────────────
            <SectionTitle> { text: "How It Works" }
            <View> {
                width: Fill, height: Fit
                flow: Right
                spacing: 12
                <FeatureCard> {
                    feature_title = { text: "Simple Upload" }
                    feature_body = { text: "Drag and drop or pick an image in seconds." }
                }
                <FeatureCard> {
                    feature_title = { text: "Smart Search" }
                    feature_body = { text: "Find images that match in color, style and visual content." }
                }
                <FeatureCard> {
                    feature_title = { text: "Detailed Analysis" }
                    feature_body = { text: "See dominant colors, tags and similarity scores for every image." }
                }
            }
        }
    }
}
