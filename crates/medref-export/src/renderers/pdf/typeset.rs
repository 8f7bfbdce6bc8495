//! # Typesetter
//!
//! Lays a story out on US-letter pages with printpdf builtin fonts.
//!
//! ```text
//!  ┌───────────────── 612pt ─────────────────┐
//!  │            36pt top margin              │
//!  │ 72pt ┌─────────────────────────┐ 72pt   │
//!  │      │ cursor ↓ (pt from top)  │        │
//!  │      │                         │        │
//!  │      └─────────────────────────┘        │
//!  │           36pt bottom margin            │
//!  └─────────────────────────────────────────┘
//! ```
//!
//! Geometry is tracked in points from the top edge and converted to
//! printpdf's bottom-left millimetre space only when drawing. A block that
//! does not fit in what is left of the page starts a new page; a table that
//! overflows repeats its header row on each continuation page.
//!
//! ## Text Measurement
//! Builtin fonts ship without metrics here, so every glyph is measured as
//! `GLYPH_WIDTH` of the font size. Centring, cell truncation and wrapping
//! are approximate: runs of wide glyphs (`W`, `M`, capitals) can overrun a
//! cell slightly, runs of narrow ones (`i`, `l`) leave it short.

use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Pt, Rect, Rgb,
};

use super::story::{Element, Table};
use crate::error::{RenderError, RenderResult};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN_X: f32 = 72.0;
const MARGIN_Y: f32 = 36.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;

const CHART_WIDTH: f32 = 432.0;
const CHART_HEIGHT: f32 = 288.0;
const IMAGE_DPI: f32 = 300.0;

const POINTS_PER_INCH: f32 = 72.0;
const CELL_PADDING: f32 = 6.0;

/// Average Helvetica advance width as a fraction of the font size.
///
/// One flat value for every character. Real advances run from about 0.22
/// (`i`) to 0.94 (`W`), so measured widths are estimates.
const GLYPH_WIDTH: f32 = 0.5;

const ACCENT: (u8, u8, u8) = (31, 71, 136);
const WHITESMOKE: (u8, u8, u8) = (245, 245, 245);
const BEIGE: (u8, u8, u8) = (245, 245, 220);
const BLACK: (u8, u8, u8) = (0, 0, 0);
const GREY: (u8, u8, u8) = (90, 90, 90);

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

/// Row style inside a table.
#[derive(Clone, Copy)]
enum RowKind {
    Header,
    Body,
}

impl RowKind {
    fn font_size(self) -> f32 {
        match self {
            RowKind::Header => 12.0,
            RowKind::Body => 10.0,
        }
    }

    fn height(self) -> f32 {
        match self {
            RowKind::Header => 24.0,
            RowKind::Body => 18.0,
        }
    }
}

/// Stateful page writer. Consumed by [`Typesetter::finish`].
pub struct Typesetter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    cursor: f32,
    pages: usize,
}

impl Typesetter {
    pub fn new(title: &str) -> RenderResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Page 1");
        let layer = doc.get_page(page).get_layer(layer);

        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
            italic: doc.add_builtin_font(BuiltinFont::HelveticaOblique)?,
        };

        Ok(Typesetter {
            doc,
            layer,
            fonts,
            cursor: MARGIN_Y,
            pages: 1,
        })
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    pub fn place(&mut self, element: &Element) {
        match element {
            Element::Title(text) => self.title(text),
            Element::Info(lines) => self.info(lines),
            Element::Heading(text) => self.heading(text),
            Element::Subheading(text) => self.subheading(text),
            Element::Table(table) => self.table(table),
            Element::Image(image) => self.image(image),
            Element::Note(text) => self.note(text),
            Element::Spacer(points) => self.cursor += points,
            Element::PageBreak => {
                if !self.at_page_top() {
                    self.new_page();
                }
            }
        }
    }

    /// Serializes the document.
    pub fn finish(self) -> RenderResult<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf)?;
        buf.into_inner().map_err(|e| RenderError::Io(e.into_error()))
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    fn title(&mut self, text: &str) {
        let size = 24.0;
        self.ensure(size * 1.2);
        let x = ((PAGE_WIDTH - text_width(text, size)) / 2.0).max(MARGIN_X);
        self.text(text, size, x, self.cursor + size, &self.fonts.bold, ACCENT);
        self.cursor += size * 1.2 + 18.0;
    }

    fn info(&mut self, lines: &[(String, String)]) {
        let size = 11.0;
        let leading = size * 1.4;

        for (label, value) in lines {
            let label_width = text_width(label, size) + 4.0;
            let value_x = MARGIN_X + label_width;
            let wrapped = wrap(value, CONTENT_WIDTH - label_width, size);

            self.ensure(leading * wrapped.len() as f32);
            self.text(label, size, MARGIN_X, self.cursor + size, &self.fonts.bold, BLACK);
            for line in &wrapped {
                self.text(line, size, value_x, self.cursor + size, &self.fonts.regular, BLACK);
                self.cursor += leading;
            }
        }
    }

    fn heading(&mut self, text: &str) {
        let size = 16.0;
        // Keep a heading with at least a little of what follows it
        self.ensure(size * 1.2 + 48.0);
        self.text(text, size, MARGIN_X, self.cursor + size, &self.fonts.bold, ACCENT);
        self.cursor += size * 1.2;
    }

    fn subheading(&mut self, text: &str) {
        let size = 12.0;
        self.ensure(size * 1.2 + 6.0 + RowKind::Header.height() + RowKind::Body.height());
        self.text(text, size, MARGIN_X, self.cursor + size, &self.fonts.bold, BLACK);
        self.cursor += size * 1.2 + 6.0;
    }

    fn note(&mut self, text: &str) {
        let size = 10.0;
        let leading = size * 1.4;
        for line in wrap(text, CONTENT_WIDTH, size) {
            self.ensure(leading);
            self.text(&line, size, MARGIN_X, self.cursor + size, &self.fonts.italic, GREY);
            self.cursor += leading;
        }
    }

    fn table(&mut self, table: &Table) {
        let widths: Vec<f32> = table.widths.iter().map(|w| w * POINTS_PER_INCH).collect();
        let total: f32 = widths.iter().sum();
        let left = MARGIN_X + ((CONTENT_WIDTH - total) / 2.0).max(0.0);

        self.ensure(RowKind::Header.height() + RowKind::Body.height());
        self.row(&table.header, &widths, left, RowKind::Header);

        for cells in &table.rows {
            if RowKind::Body.height() > self.remaining() {
                self.new_page();
                self.row(&table.header, &widths, left, RowKind::Header);
            }
            self.row(cells, &widths, left, RowKind::Body);
        }
    }

    fn row(&mut self, cells: &[String], widths: &[f32], left: f32, kind: RowKind) {
        let height = kind.height();
        let size = kind.font_size();
        let (fill, ink, font) = match kind {
            RowKind::Header => (ACCENT, WHITESMOKE, &self.fonts.bold),
            RowKind::Body => (BEIGE, BLACK, &self.fonts.regular),
        };

        let top = self.cursor;
        let bottom = PAGE_HEIGHT - top - height;
        let baseline = top + (height + size * 0.7) / 2.0;

        let mut x = left;
        for (cell, width) in cells.iter().zip(widths) {
            self.layer.set_fill_color(rgb(fill));
            self.layer.set_outline_color(rgb(BLACK));
            self.layer.set_outline_thickness(1.0);
            self.layer.add_rect(
                Rect::new(mm(x), mm(bottom), mm(x + width), mm(bottom + height))
                    .with_mode(PaintMode::FillStroke),
            );

            let fitted = fit(cell, width - 2.0 * CELL_PADDING, size);
            let text_x = x + (width - text_width(&fitted, size)) / 2.0;
            self.text(&fitted, size, text_x.max(x + CELL_PADDING / 2.0), baseline, font, ink);
            x += width;
        }

        self.cursor += height;
    }

    fn image(&mut self, image: &printpdf::image_crate::DynamicImage) {
        self.ensure(CHART_HEIGHT);

        let image = Image::from_dynamic_image(image);
        let native_width = image.image.width.into_pt(IMAGE_DPI).0;
        let native_height = image.image.height.into_pt(IMAGE_DPI).0;
        if native_width <= 0.0 || native_height <= 0.0 {
            return;
        }

        let transform = ImageTransform {
            translate_x: Some(mm((PAGE_WIDTH - CHART_WIDTH) / 2.0)),
            translate_y: Some(mm(PAGE_HEIGHT - self.cursor - CHART_HEIGHT)),
            scale_x: Some(CHART_WIDTH / native_width),
            scale_y: Some(CHART_HEIGHT / native_height),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        };
        image.add_to_layer(self.layer.clone(), transform);
        self.cursor += CHART_HEIGHT;
    }

    // =========================================================================
    // Page geometry
    // =========================================================================

    fn remaining(&self) -> f32 {
        PAGE_HEIGHT - MARGIN_Y - self.cursor
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= MARGIN_Y
    }

    /// Starts a new page unless `height` fits, or the page is still empty.
    fn ensure(&mut self, height: f32) {
        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            mm(PAGE_WIDTH),
            mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = MARGIN_Y;
    }

    /// Draws `text` with its baseline `baseline` points below the top edge.
    fn text(
        &self,
        text: &str,
        size: f32,
        x: f32,
        baseline: f32,
        font: &IndirectFontRef,
        color: (u8, u8, u8),
    ) {
        self.layer.set_fill_color(rgb(color));
        self.layer
            .use_text(text, size, mm(x), mm(PAGE_HEIGHT - baseline), font);
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH
}

/// Cuts `text` to the characters that fit in `width`.
fn fit(text: &str, width: f32, size: f32) -> String {
    let budget = (width / (size * GLYPH_WIDTH)).floor().max(1.0) as usize;
    text.chars().take(budget).collect()
}

/// Greedy word wrap; a single over-long word gets a line of its own.
fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let budget = (width / (size * GLYPH_WIDTH)).floor().max(1.0) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if needed > budget && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
