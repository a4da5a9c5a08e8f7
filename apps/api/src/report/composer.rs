//! Report composition: intake summary, top influencers and the chart on an
//! A4 page.
//!
//! Text content is built first as plain lines (`ReportText`) so it can be
//! checked without parsing PDF output; `compose_report` only places it.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{
    Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use ttf_parser::Face;

use crate::campaign::intake::IntakeRecord;
use crate::influencers::RankedResult;
use crate::report::chart::{chart_groups, SERIES};
use crate::report::ReportError;

pub const TITLE: &str = "KOL Recommendation Report";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 8.0;
const TITLE_SIZE_PT: f32 = 16.0;
const HEADING_SIZE_PT: f32 = 13.0;
const BODY_SIZE_PT: f32 = 11.0;
const FOOTNOTE_SIZE_PT: f32 = 9.0;

/// Embedded Unicode fonts; Noto Sans covers Latin including Vietnamese.
const REGULAR_FONT: &[u8] = notosans::REGULAR_TTF;
const BOLD_FONT: &[u8] = notosans::BOLD_TTF;

/// All text that goes on the report, grouped by block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportText {
    pub title: String,
    pub intake: Vec<String>,
    pub influencers: Vec<String>,
    pub legend: String,
    pub footer: Vec<String>,
}

impl ReportText {
    /// Every line set in the regular face, in page order.
    fn body_lines(&self) -> impl Iterator<Item = &str> {
        self.intake
            .iter()
            .chain(&self.influencers)
            .chain(&self.footer)
            .map(String::as_str)
            .chain(std::iter::once(self.legend.as_str()))
    }

    pub fn build(intake: &IntakeRecord, ranked: &RankedResult, generated_on: NaiveDate) -> Self {
        let intake_lines = intake
            .summary_fields()
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect();

        let influencers = ranked
            .entries
            .iter()
            .map(|e| {
                let i = &e.influencer;
                format!(
                    "{} - {} | {} followers | {} likes | {} comments",
                    i.username,
                    i.tier.label(),
                    i.raw_followers,
                    i.avg_likes,
                    i.avg_comments
                )
            })
            .collect();

        let series: Vec<String> = SERIES
            .iter()
            .map(|(name, colour, _)| format!("{name} ({colour})"))
            .collect();
        let labels: Vec<String> = chart_groups(ranked).into_iter().map(|g| g.label).collect();
        let legend = format!(
            "Chart, left to right: {}. Bars: {}.",
            labels.join(", "),
            series.join(", ")
        );

        let mut footer = vec![format!("Generated {generated_on}")];
        if !intake.timestamp.trim().is_empty() {
            footer.push(format!("Request submitted {}", intake.timestamp.trim()));
        }
        if let Some(email) = &intake.email {
            footer.push(format!("Contact: {}", email.trim()));
        }

        Self {
            title: TITLE.to_string(),
            intake: intake_lines,
            influencers,
            legend,
            footer,
        }
    }
}

/// Write position on the current page; `y` is the next baseline in mm from the page bottom.
struct Cursor {
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor {
    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        self.y -= LINE_HEIGHT_MM;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT_MM / 2.0;
    }
}

fn new_page(doc: &PdfDocumentReference) -> Cursor {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    Cursor {
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM,
    }
}

/// Image DPI that makes `width_px` span exactly `width_mm` on the page.
pub fn dpi_for_width(width_px: u32, width_mm: f32) -> f32 {
    width_px as f32 * 25.4 / width_mm
}

/// First character of `line` the font has no glyph for.
fn missing_glyph(face: &Face<'_>, line: &str) -> Option<char> {
    line.chars()
        .filter(|c| !c.is_control())
        .find(|c| face.glyph_index(*c).is_none())
}

/// printpdf skips characters without a glyph, so uncovered text is rejected
/// up front instead of being written with letters missing.
fn ensure_renderable<'a>(
    font: &[u8],
    lines: impl IntoIterator<Item = &'a str>,
) -> Result<(), ReportError> {
    let face = Face::parse(font, 0).map_err(pdf_err)?;
    for line in lines {
        if let Some(c) = missing_glyph(&face, line) {
            return Err(ReportError::Pdf(format!(
                "no glyph for '{c}' (U+{:04X}) in \"{line}\"",
                c as u32
            )));
        }
    }
    Ok(())
}

/// Writes the report PDF to `path`, replacing any file already there.
///
/// Fails with `ReportError::Pdf` when any text line holds a character the
/// embedded fonts cannot draw.
pub fn compose_report(text: &ReportText, chart: RgbImage, path: &Path) -> Result<(), ReportError> {
    ensure_renderable(BOLD_FONT, std::iter::once(text.title.as_str()))?;
    ensure_renderable(REGULAR_FONT, text.body_lines())?;

    let (doc, page, layer) = PdfDocument::new(
        text.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc.add_external_font(REGULAR_FONT).map_err(pdf_err)?;
    let bold = doc.add_external_font(BOLD_FONT).map_err(pdf_err)?;

    let mut cursor = Cursor {
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM,
    };

    cursor.line(&text.title, TITLE_SIZE_PT, &bold);
    cursor.gap();
    for line in &text.intake {
        cursor.line(line, BODY_SIZE_PT, &regular);
    }
    cursor.gap();
    cursor.line("Top Influencers", HEADING_SIZE_PT, &bold);
    for line in &text.influencers {
        cursor.line(line, BODY_SIZE_PT, &regular);
    }
    cursor.gap();
    for line in &text.footer {
        cursor.line(line, FOOTNOTE_SIZE_PT, &regular);
    }
    cursor.gap();
    cursor.line(&text.legend, FOOTNOTE_SIZE_PT, &regular);

    let (width_px, height_px) = chart.dimensions();
    let chart_width_mm = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let chart_height_mm = chart_width_mm * height_px as f32 / width_px.max(1) as f32;

    // cursor.y is the next text baseline; the image hangs below the previous line.
    let mut top = cursor.y + LINE_HEIGHT_MM / 2.0;
    if top - chart_height_mm < MARGIN_MM {
        cursor = new_page(&doc);
        top = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    Image::from_dynamic_image(&DynamicImage::ImageRgb8(chart)).add_to_layer(
        cursor.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_MM)),
            translate_y: Some(Mm(top - chart_height_mm)),
            dpi: Some(dpi_for_width(width_px, chart_width_mm)),
            ..Default::default()
        },
    );

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(pdf_err)?;
    Ok(())
}

fn pdf_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Pdf(e.to_string())
}
