use makepad_widgets::*;
use super::UploadScreen;

live_design! {
    use link::theme::*;
    use link::shaders::*;
    use link::widgets::*;
    use pixrec_widgets::theme::*;
    use pixrec_widgets::components::*;
    use pixrec_widgets::components::image_upload::*;

    pub UploadScreen = {{UploadScreen}} {
        width: Fill, height: Fill
        show_bg: true
        draw_bg: { color: (PAGE_BG) }

        <ScrollYView> {
            width: Fill, height: Fill
            flow: Down
            spacing: 20
            padding: {left: 40, right: 40, top: 32, bottom: 32}

            <View> {
                width: Fill, height: Fit
                flow: Down
                spacing: 6
                <PageTitle> { text: "Upload Image" }
                <BodyText> {
                    text: "Upload an image to get personalized recommendations based on its visual features."
                }
            }

            uploader = <ImageUpload> {}

            // Shown while the server processes the uploaded image
            phase_status = <View> {
                visible: false
                width: Fill, height: Fit
                padding: {left: 14, right: 14, top: 10, bottom: 10}
                show_bg: true
                draw_bg: { color: (BLUE_100) }
                phase_label = <Label> {
                    width: Fill
                    draw_text: {
                        color: (BLUE_600)
                        text_style: <FONT_MEDIUM>{ font_size: 11.0 }
                        wrap: Word
                    }
                }
            }

            <Card> {
                spacing: 6
                <SectionTitle> {
                    text: "Tips for better results"
                    draw_text: { text_style: { font_size: 13.0 } }
                }
                <BodyText> { text: "• Use high-quality images with good lighting" }
                <BodyText> { text: "• Images with distinctive colors produce more accurate recommendations" }
                <BodyText> { text: "• Supported formats: JPEG, PNG and WebP, up to 10 MB" }
            }
        }
    }
}
