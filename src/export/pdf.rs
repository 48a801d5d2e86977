//! PDF export: layout over a small canvas trait, rendered with printpdf.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use crate::config::PdfConfig;
use crate::error::{NicheScoutError, Result};
use crate::export::text::{DOCUMENT_TITLE, header_lines};
use crate::schemas::QueryResult;

const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;
const BOLD_GLYPH_EM: f32 = 0.55;
const DIVIDER_GREY: f32 = 200.0 / 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// Drawing surface with a top-left origin, units in millimetres, font sizes in points.
pub trait DocumentCanvas {
    fn page_width(&self) -> f32;
    fn page_height(&self) -> f32;
    fn set_font(&mut self, size: f32, weight: FontWeight);
    /// Break `text` into lines that fit `width` at the current font.
    fn split_text_to_size(&self, text: &str, width: f32) -> Vec<String>;
    fn text(&mut self, lines: &[String], x: f32, y: f32);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    fn add_page(&mut self);
}

/// Cursor-based layout of a result onto a canvas.
pub struct PdfLayout<'c, C: DocumentCanvas> {
    canvas: &'c mut C,
    margin: f32,
    y: f32,
}

impl<'c, C: DocumentCanvas> PdfLayout<'c, C> {
    pub fn new(canvas: &'c mut C, margin: f32) -> Self {
        Self {
            canvas,
            margin,
            y: margin,
        }
    }

    fn text_width(&self) -> f32 {
        self.canvas.page_width() - self.margin * 2.0
    }

    fn single(&mut self, text: String, advance: f32) {
        self.canvas.text(&[text], self.margin, self.y);
        self.y += advance;
    }

    fn divider(&mut self) {
        let right = self.canvas.page_width() - self.margin;
        self.canvas.line(self.margin, self.y, right, self.y);
        self.y += 10.0;
    }

    /// Wrapped block; breaks the page first if the block would not fit.
    fn wrapped(&mut self, text: &str, size: f32, weight: FontWeight) {
        self.canvas.set_font(size, weight);
        let lines = self.canvas.split_text_to_size(text, self.text_width());
        let height = lines.len() as f32 * size / 2.0;
        if self.y + height > self.canvas.page_height() - self.margin {
            self.canvas.add_page();
            self.y = self.margin + 10.0;
        }
        self.canvas.text(&lines, self.margin, self.y);
        self.y += height;
    }

    pub fn render(mut self, result: &QueryResult) {
        self.canvas.set_font(16.0, FontWeight::Bold);
        self.single(DOCUMENT_TITLE.to_string(), 10.0);

        self.canvas.set_font(12.0, FontWeight::Normal);
        let [niche, audience, location, platform, generated] = header_lines(result);
        for line in [niche, audience, location, platform] {
            self.single(line, 7.0);
        }
        self.single(generated, 10.0);
        self.divider();

        for (index, item) in result.questions.iter().enumerate() {
            self.canvas.set_font(12.0, FontWeight::Bold);
            self.single(format!("{}.", index + 1), 7.0);

            if let Some(title) = &item.title {
                self.wrapped(title, 12.0, FontWeight::Bold);
                self.y += 5.0;
            }

            self.wrapped(&item.question, 12.0, FontWeight::Bold);
            self.y += 5.0;

            if let Some(context) = &item.context {
                self.wrapped(context, 10.0, FontWeight::Normal);
                self.y += 10.0;
            }

            self.divider();
        }
    }
}

/// Greedy word wrap by character count. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        if current_len > 0 || lines.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// printpdf-backed canvas using the built-in Helvetica fonts.
pub struct PrintPdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    width: f32,
    height: f32,
    font_size: f32,
    weight: FontWeight,
}

impl PrintPdfCanvas {
    pub fn new(title: &str, config: &PdfConfig) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(config.page_width_mm),
            Mm(config.page_height_mm),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            width: config.page_width_mm,
            height: config.page_height_mm,
            font_size: 12.0,
            weight: FontWeight::Normal,
        })
    }

    pub fn save_to_bytes(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }

    fn font(&self) -> &IndirectFontRef {
        match self.weight {
            FontWeight::Normal => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn pdf_error(err: printpdf::Error) -> NicheScoutError {
    NicheScoutError::Export {
        message: format!("PDF rendering failed: {}", err),
    }
}

impl DocumentCanvas for PrintPdfCanvas {
    fn page_width(&self) -> f32 {
        self.width
    }

    fn page_height(&self) -> f32 {
        self.height
    }

    fn set_font(&mut self, size: f32, weight: FontWeight) {
        self.font_size = size;
        self.weight = weight;
    }

    fn split_text_to_size(&self, text: &str, width: f32) -> Vec<String> {
        let em = match self.weight {
            FontWeight::Normal => AVG_GLYPH_EM,
            FontWeight::Bold => BOLD_GLYPH_EM,
        };
        let glyph_mm = self.font_size * PT_TO_MM * em;
        wrap_text(text, (width / glyph_mm).floor() as usize)
    }

    fn text(&mut self, lines: &[String], x: f32, y: f32) {
        let step = self.font_size / 2.0;
        for (i, line) in lines.iter().enumerate() {
            // printpdf measures y from the bottom edge
            let baseline = self.height - (y + i as f32 * step);
            self.layer.use_text(
                line.as_str(),
                self.font_size,
                Mm(x),
                Mm(baseline),
                self.font(),
            );
        }
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.set_outline_color(Color::Rgb(Rgb::new(
            DIVIDER_GREY,
            DIVIDER_GREY,
            DIVIDER_GREY,
            None,
        )));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(self.height - y1)), false),
                (Point::new(Mm(x2), Mm(self.height - y2)), false),
            ],
            is_closed: false,
        });
    }

    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(self.width), Mm(self.height), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
    }
}

/// Lay out `result` and return the PDF bytes.
pub fn render_pdf(result: &QueryResult, config: &PdfConfig) -> Result<Vec<u8>> {
    let mut canvas = PrintPdfCanvas::new(DOCUMENT_TITLE, config)?;
    PdfLayout::new(&mut canvas, config.margin_mm).render(result);
    canvas.save_to_bytes()
}
