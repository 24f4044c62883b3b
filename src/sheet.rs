//! PDF sheet generation.
//!
//! Cards are placed at their real size (63 × 88 mm) in a centred grid without
//! gutters, filling each page left to right, top to bottom. Thin cut guides are
//! drawn along every grid line.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use printpdf::{
    Color, Greyscale, Image, ImageTransform, Line, Mm, PdfDocument, PdfLayerReference, Point,
};

use crate::config::PaperSize;
use crate::error::{Error, Result};

pub const CARD_WIDTH_MM: f32 = 63.0;
pub const CARD_HEIGHT_MM: f32 = 88.0;
/// Minimum distance between the grid and the paper edge
pub const MIN_MARGIN_MM: f32 = 5.0;

const IMAGE_DPI: f32 = 300.0;
const CUT_LINE_GREY: f32 = 0.6;
const CUT_LINE_THICKNESS: f32 = 0.25;
const LAYER_NAME: &str = "Cards";

/// Grid geometry for one paper size. All positions are PDF coordinates in
/// millimetres, origin at the bottom-left corner of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub columns: usize,
    pub rows: usize,
    /// Left edge of the grid
    pub origin_x: f32,
    /// Top edge of the grid
    pub origin_top: f32,
}

impl SheetLayout {
    pub fn new(paper: PaperSize) -> Self {
        let (page_width, page_height) = paper.dimensions_mm();
        let fit = |available: f32, card: f32| ((available - 2.0 * MIN_MARGIN_MM) / card).floor().max(1.0) as usize;
        let columns = fit(page_width, CARD_WIDTH_MM);
        let rows = fit(page_height, CARD_HEIGHT_MM);

        let grid_width = columns as f32 * CARD_WIDTH_MM;
        let grid_height = rows as f32 * CARD_HEIGHT_MM;

        Self {
            page_width,
            page_height,
            columns,
            rows,
            origin_x: (page_width - grid_width) / 2.0,
            origin_top: page_height - (page_height - grid_height) / 2.0,
        }
    }

    pub fn cards_per_page(&self) -> usize {
        self.columns * self.rows
    }

    pub fn page_count(&self, image_count: usize) -> usize {
        image_count.div_ceil(self.cards_per_page())
    }

    /// Bottom-left corner of the card slot at `slot` on its page
    pub fn slot_origin(&self, slot: usize) -> (f32, f32) {
        let slot = slot % self.cards_per_page();
        let column = slot % self.columns;
        let row = slot / self.columns;
        (
            self.origin_x + column as f32 * CARD_WIDTH_MM,
            self.origin_top - (row + 1) as f32 * CARD_HEIGHT_MM,
        )
    }

    /// Cut guides spanning the full page along every grid line, as
    /// ((x1, y1), (x2, y2)) pairs
    pub fn cut_lines(&self) -> Vec<((f32, f32), (f32, f32))> {
        let mut lines = Vec::with_capacity(self.columns + self.rows + 2);
        for column in 0..=self.columns {
            let x = self.origin_x + column as f32 * CARD_WIDTH_MM;
            lines.push(((x, 0.0), (x, self.page_height)));
        }
        for row in 0..=self.rows {
            let y = self.origin_top - row as f32 * CARD_HEIGHT_MM;
            lines.push(((0.0, y), (self.page_width, y)));
        }
        lines
    }
}

pub struct SheetGenerator {
    layout: SheetLayout,
    title: String,
}

impl Default for SheetGenerator {
    fn default() -> Self {
        Self::new(PaperSize::default())
    }
}

impl SheetGenerator {
    pub fn new(paper: PaperSize) -> Self {
        Self {
            layout: SheetLayout::new(paper),
            title: "MTG proxies".to_string(),
        }
    }

    /// Render `images` in order into a PDF at `output_path`, returning the page count
    pub fn generate<P: AsRef<Path>>(&self, images: &[PathBuf], output_path: P) -> Result<usize> {
        if images.is_empty() {
            return Err(Error::EmptySheet);
        }

        let layout = &self.layout;
        let (doc, first_page, first_layer) = PdfDocument::new(
            &self.title,
            Mm(layout.page_width),
            Mm(layout.page_height),
            LAYER_NAME,
        );

        let pages = layout.page_count(images.len());
        for (page_index, chunk) in images.chunks(layout.cards_per_page()).enumerate() {
            let (page, layer) = if page_index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(layout.page_width), Mm(layout.page_height), LAYER_NAME)
            };
            let layer = doc.get_page(page).get_layer(layer);

            for (slot, path) in chunk.iter().enumerate() {
                self.place_image(&layer, slot, path)?;
            }
            self.draw_cut_lines(&layer);
        }

        let file = File::create(output_path.as_ref())?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| Error::Pdf(e.to_string()))?;

        log::info!(
            "Wrote {} images on {} pages to {}",
            images.len(),
            pages,
            output_path.as_ref().display()
        );
        Ok(pages)
    }

    fn place_image(&self, layer: &PdfLayerReference, slot: usize, path: &Path) -> Result<()> {
        // Sniff the format; PNG fallbacks are cached under the same .jpg name
        let decoded = image::io::Reader::open(path)?.with_guessed_format()?.decode()?;
        let (width_px, height_px) = decoded.dimensions();

        // Native size at IMAGE_DPI, then stretch to the card size
        let native_width_mm = width_px as f32 * 25.4 / IMAGE_DPI;
        let native_height_mm = height_px as f32 * 25.4 / IMAGE_DPI;
        let (x, y) = self.layout.slot_origin(slot);

        Image::from_dynamic_image(&decoded).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(y)),
                scale_x: Some(CARD_WIDTH_MM / native_width_mm),
                scale_y: Some(CARD_HEIGHT_MM / native_height_mm),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn draw_cut_lines(&self, layer: &PdfLayerReference) {
        layer.set_outline_color(Color::Greyscale(Greyscale::new(CUT_LINE_GREY, None)));
        layer.set_outline_thickness(CUT_LINE_THICKNESS);

        for ((x1, y1), (x2, y2)) in self.layout.cut_lines() {
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(x1), Mm(y1)), false),
                    (Point::new(Mm(x2), Mm(y2)), false),
                ],
                is_closed: false,
            });
        }
    }
}
