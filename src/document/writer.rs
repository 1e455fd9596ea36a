use std::io::BufWriter;

use printpdf::image_crate::{DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use super::DocumentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

/// Font, size (pt) and the distance the cursor moves after the line (pt).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub font: FontFace,
    pub size: f32,
    pub gap: f32,
}

impl LineStyle {
    pub const fn new(font: FontFace, size: f32, gap: f32) -> Self {
        LineStyle { font, size, gap }
    }

    pub const fn body() -> Self {
        LineStyle::new(FontFace::Regular, 11.0, 16.0)
    }

    pub const fn heading() -> Self {
        LineStyle::new(FontFace::Bold, 14.0, 20.0)
    }

    pub const fn with_gap(self, gap: f32) -> Self {
        LineStyle { gap, ..self }
    }

    pub const fn bold(self) -> Self {
        LineStyle {
            font: FontFace::Bold,
            ..self
        }
    }
}

/// Page geometry in points, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    /// Cursor position at the top of a fresh page
    pub top: f32,
    /// A line requested below this starts a new page
    pub bottom_limit: f32,
    /// An image whose bottom edge would fall below this starts a new page
    pub image_bottom_limit: f32,
    /// Cursor position on a page opened for an image
    pub image_top: f32,
    /// Space left under an image
    pub image_gap: f32,
}

impl PageLayout {
    pub fn a4() -> Self {
        let (width, height) = (595.2756, 841.8898);
        PageLayout {
            width,
            height,
            margin_x: 40.0,
            top: height - 50.0,
            bottom_limit: 80.0,
            image_bottom_limit: 60.0,
            image_top: height - 80.0,
            image_gap: 20.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }
}

/// Something a [`PageWriter`] can draw on. Coordinates are in points.
pub trait Surface {
    fn new_page(&mut self);
    fn draw_text(&mut self, text: &str, font: FontFace, size: f32, x: f32, y: f32);
    /// `(x, y)` is the bottom-left corner of the placed image.
    fn draw_image(&mut self, image: &DynamicImage, x: f32, y: f32, width: f32, height: f32);
}

/// Tracks the vertical cursor and breaks pages before anything would run
/// off the bottom.
pub struct PageWriter<S: Surface> {
    surface: S,
    layout: PageLayout,
    y: f32,
    pages: usize,
}

impl<S: Surface> PageWriter<S> {
    pub fn new(surface: S, layout: PageLayout) -> Self {
        PageWriter {
            surface,
            y: layout.top,
            layout,
            pages: 1,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Draw one line at the cursor, then move the cursor down by `style.gap`.
    pub fn line(&mut self, text: &str, style: LineStyle) {
        if self.y < self.layout.bottom_limit {
            self.break_page(self.layout.top);
        }
        self.surface
            .draw_text(text, style.font, style.size, self.layout.margin_x, self.y);
        self.y -= style.gap;
    }

    /// An empty body line.
    pub fn blank(&mut self) {
        self.line("", LineStyle::body());
    }

    /// Place an image scaled to the content width, keeping its aspect ratio.
    pub fn image(&mut self, image: &DynamicImage) {
        let (px_width, px_height) = image.dimensions();
        if px_width == 0 || px_height == 0 {
            return;
        }
        let width = self.layout.content_width();
        let height = px_height as f32 * width / px_width as f32;

        if self.y - height < self.layout.image_bottom_limit {
            self.break_page(self.layout.image_top);
        }
        self.surface
            .draw_image(image, self.layout.margin_x, self.y - height, width, height);
        self.y -= height + self.layout.image_gap;
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn break_page(&mut self, cursor: f32) {
        self.surface.new_page();
        self.pages += 1;
        self.y = cursor;
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// [`Surface`] backed by a printpdf document with the builtin Helvetica faces.
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page_width: Mm,
    page_height: Mm,
}

impl PdfSurface {
    pub fn new(title: &str, layout: &PageLayout) -> Result<Self, DocumentError> {
        let page_width = pt_to_mm(layout.width);
        let page_height = pt_to_mm(layout.height);
        let (doc, page1, layer1) = PdfDocument::new(title, page_width, page_height, "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| DocumentError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| DocumentError::Font(e.to_string()))?;

        Ok(PdfSurface {
            doc,
            layer,
            regular,
            bold,
            page_width,
            page_height,
        })
    }

    /// Serialize the document to bytes.
    pub fn finish(self) -> Result<Vec<u8>, DocumentError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| DocumentError::Save(e.to_string()))?;
        buf.into_inner()
            .map_err(|e| DocumentError::Save(e.to_string()))
    }
}

impl Surface for PdfSurface {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(self.page_width, self.page_height, "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn draw_text(&mut self, text: &str, font: FontFace, size: f32, x: f32, y: f32) {
        if text.is_empty() {
            return;
        }
        let font = match font {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        };
        self.layer.use_text(text, size, pt_to_mm(x), pt_to_mm(y), font);
    }

    fn draw_image(&mut self, image: &DynamicImage, x: f32, y: f32, width: f32, _height: f32) {
        // Height follows from the dpi since the aspect ratio is preserved.
        let dpi = image.width() as f32 * 72.0 / width;
        let transform = ImageTransform {
            translate_x: Some(pt_to_mm(x)),
            translate_y: Some(pt_to_mm(y)),
            dpi: Some(dpi),
            ..Default::default()
        };
        Image::from_dynamic_image(image).add_to_layer(self.layer.clone(), transform);
    }
}
