//! A4 PDF rendering of a `RequestDocument` via `printpdf`.
//!
//! Layout runs top to bottom in the fixed fragment order; a new page is
//! started whenever the next line would cross the bottom margin.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::*;

use super::{DocumentError, LogoSlot, RequestDocument};
use crate::models::RowShade;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 280.0;
const BOTTOM_MARGIN: f32 = 20.0;
const LEFT: f32 = 20.0;
const RIGHT: f32 = 190.0;
const LINE: f32 = 4.5;
const ROW_HEIGHT: f32 = 6.0;
const WRAP_CHARS: usize = 95;
/// Top edge of the logo box, right-aligned with the content.
const LOGO_TOP: f32 = 290.0;

/// What goes in the logo box on the first page.
enum LogoPlacement {
    Image {
        image: DynamicImage,
        width_mm: f32,
        height_mm: f32,
    },
    /// Nothing usable was fetched; the box stays empty.
    Reserved,
}

/// Decode the fetched logo and fit it to the slot.
fn place_logo(slot: &LogoSlot, bytes: Option<&[u8]>) -> LogoPlacement {
    let Some(bytes) = bytes else {
        return LogoPlacement::Reserved;
    };
    let image = match image_crate::load_from_memory(bytes) {
        Ok(image) => image,
        Err(e) => {
            tracing::warn!(url = %slot.url, error = %e, "Cannot decode clinic logo");
            return LogoPlacement::Reserved;
        }
    };
    let (px_w, px_h) = image.dimensions();
    match slot.fit(px_w as f32, px_h as f32) {
        Some((width_mm, height_mm)) => LogoPlacement::Image {
            // Alpha is flattened away.
            image: DynamicImage::ImageRgb8(image.to_rgb8()),
            width_mm,
            height_mm,
        },
        None => {
            tracing::warn!(url = %slot.url, px_w, px_h, "Clinic logo has no area");
            LogoPlacement::Reserved
        }
    }
}

fn draw_logo(layer: PdfLayerReference, placement: LogoPlacement) {
    let LogoPlacement::Image {
        image,
        width_mm,
        height_mm,
    } = placement
    else {
        return;
    };
    // printpdf sizes images by dpi: px * 25.4 / dpi millimetres wide.
    let dpi = image.width() as f32 * 25.4 / width_mm;
    Image::from_dynamic_image(&image).add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(RIGHT - width_mm)),
            translate_y: Some(Mm(LOGO_TOP - height_mm)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

/// Tracks the current page/layer and vertical cursor.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: Mm,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageWriter<'_> {
    fn ensure_space(&mut self, needed: f32) {
        if self.y - Mm(needed) < Mm(BOTTOM_MARGIN) {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(TOP);
        }
    }

    fn line(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        self.ensure_space(LINE);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), self.y, font);
        self.y -= Mm(LINE);
    }

    fn wrapped(&mut self, text: &str, size: f32, x: f32) {
        for line in wrap_text(text, WRAP_CHARS) {
            self.line(&line, size, x, false);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= Mm(mm);
    }

    fn section_title(&mut self, title: &str) {
        self.ensure_space(LINE * 3.0);
        self.gap(2.0);
        self.line(title, 11.0, LEFT, true);
        self.gap(1.0);
    }

    /// One table row: a light band behind shaded rows, then the cells.
    fn row(&mut self, shade: RowShade, cells: &[(f32, &str)], bold: bool) {
        self.ensure_space(ROW_HEIGHT);
        if shade == RowShade::Shaded {
            self.layer
                .set_fill_color(Color::Greyscale(Greyscale::new(0.92, None)));
            self.layer.add_rect(Rect::new(
                Mm(LEFT),
                self.y - Mm(1.8),
                Mm(RIGHT),
                self.y + Mm(ROW_HEIGHT - 1.8),
            ));
            self.layer
                .set_fill_color(Color::Greyscale(Greyscale::new(0.0, None)));
        }
        let font = if bold { &self.bold } else { &self.regular };
        for (x, text) in cells {
            self.layer.use_text(*text, 9.0, Mm(*x), self.y, font);
        }
        self.y -= Mm(ROW_HEIGHT);
    }
}

/// Render the request document to PDF bytes.
///
/// `logo` holds the fetched bytes of `header.logo`, if any. When they are
/// missing or undecodable the logo box is left blank.
pub fn render_pdf(document: &RequestDocument, logo: Option<&[u8]>) -> Result<Vec<u8>, DocumentError> {
    let (doc, page1, layer1) =
        PdfDocument::new(&document.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| DocumentError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| DocumentError::Pdf(format!("font error: {e}")))?;

    {
        let mut w = PageWriter {
            doc: &doc,
            layer: doc.get_page(page1).get_layer(layer1),
            y: Mm(TOP),
            regular,
            bold,
        };

        // Header
        let header = &document.header;
        if let Some(slot) = &header.logo {
            draw_logo(w.layer.clone(), place_logo(slot, logo));
        }
        w.line(&header.clinic_name, 14.0, LEFT, true);
        for line in header.contact_lines() {
            w.line(&line, 9.0, LEFT, false);
        }
        if let Some(slot) = &header.logo {
            // Body text starts below the logo box whether or not it was drawn.
            let box_bottom = Mm(LOGO_TOP - slot.max_height_mm);
            if w.y > box_bottom {
                w.y = box_bottom;
            }
        }
        w.gap(6.0);

        // Patient / request summary
        let info = &document.patient_info;
        w.line(&info.dateline, 10.0, LEFT, false);
        w.gap(2.0);
        for (label, value) in info.labeled_lines() {
            w.line(&format!("{label}: {value}"), 10.0, LEFT, false);
        }
        w.gap(4.0);

        // Clinical narrative
        for section in &document.clinical_info.sections {
            w.section_title(&section.label.to_uppercase());
            if section.lines.is_empty() {
                w.line("—", 9.0, LEFT + 5.0, false);
            }
            for line in &section.lines {
                if line.is_empty() {
                    w.gap(LINE);
                } else {
                    w.wrapped(line, 9.0, LEFT + 5.0);
                }
            }
        }

        // Procedures
        if let Some(table) = &document.procedures {
            w.section_title("PROCEDIMENTOS");
            w.row(RowShade::Plain, &[(LEFT + 2.0, "Código TUSS"), (LEFT + 35.0, "Descrição")], true);
            for row in &table.rows {
                let description = truncate(&row.description, 80);
                w.row(
                    row.shade,
                    &[(LEFT + 2.0, row.code.as_str()), (LEFT + 35.0, description.as_str())],
                    false,
                );
            }
        }

        // Materials
        if let Some(table) = &document.materials {
            w.section_title("MATERIAIS");
            w.row(RowShade::Plain, &[(LEFT + 2.0, "Descrição"), (RIGHT - 25.0, "Quantidade")], true);
            for row in &table.rows {
                let description = truncate(&row.description, 90);
                let quantity = row.quantity.to_string();
                w.row(
                    row.shade,
                    &[(LEFT + 2.0, description.as_str()), (RIGHT - 25.0, quantity.as_str())],
                    false,
                );
            }
        }

        // Surgical team
        if let Some(team) = &document.team {
            w.section_title("EQUIPE");
            for member in team {
                w.line(
                    &format!("{}: {}", member.role, member.display_name),
                    9.0,
                    LEFT + 5.0,
                    false,
                );
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| DocumentError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| DocumentError::Pdf(format!("buffer error: {e}")))
}

/// Write PDF bytes to `dir/filename`, creating `dir` when missing.
pub fn export_pdf_to_file(
    pdf_bytes: &[u8],
    filename: &str,
    dir: &Path,
) -> Result<PathBuf, DocumentError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, pdf_bytes)?;
    tracing::info!(path = %path.display(), bytes = pdf_bytes.len(), "Request PDF exported");
    Ok(path)
}

/// Cut `text` to at most `max_chars` characters, marking the cut.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let current_len = current.chars().count();
        if current_len + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
