//! PDF report synthesis.
//!
//! Composes the classification outcome, chart, enrichment record, site
//! ranking and optional dating result into a single paginated A4
//! document. Section order is fixed; sections whose inputs are missing
//! are skipped, never fatal.

use std::io::Cursor;

use artifact_structs::{ArtifactDetail, DatingEstimate, Prediction, RankedSite, format_year};
use chrono::Utc;
use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use tracing::warn;

/// A4 page size in millimeters.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;

/// Page margins in millimeters.
const MARGIN: f32 = 20.0;

/// Content below this y position triggers a page break.
const BOTTOM_LIMIT: f32 = 25.0;

/// DPI the chart image is embedded at.
const CHART_DPI: f32 = 150.0;

/// Everything that goes into one report.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// Ranked predictions, best first. Must not be empty.
    pub top_k: &'a [Prediction],

    /// Enrichment record for the primary prediction.
    pub detail: &'a ArtifactDetail,

    /// PNG bytes of the probability chart, if rendering succeeded.
    pub chart_png: Option<&'a [u8]>,

    /// Radiocarbon estimate, if a decay percentage was supplied.
    pub dating: Option<DatingEstimate>,

    /// Reference sites, ranked when an observer location was supplied.
    pub sites: &'a [RankedSite],

    /// True when the classifier ran on random weights.
    pub degraded_model: bool,
}

/// Error type for document generation failures.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("report requires at least one prediction")]
    NoPredictions,

    #[error("pdf generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Text writer that tracks the vertical cursor and starts new pages as
/// sections overflow.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new() -> Result<Self, DocumentError> {
        let (doc, page, layer) = PdfDocument::new(
            "Artifact Analysis Report",
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "content",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < BOTTOM_LIMIT {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn advance(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn write_line(&mut self, text: &str, size: f32, bold: bool) {
        let height = line_height(size);
        self.ensure_space(height);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y - height), font);
        self.advance(height);
    }

    fn heading(&mut self, text: &str) {
        self.advance(3.0);
        self.write_line(text, 14.0, true);
        self.advance(1.5);
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap_text(text, max_chars(10.5)) {
            self.write_line(&line, 10.5, false);
        }
        self.advance(1.5);
    }

    fn labeled_paragraph(&mut self, label: &str, text: &str) {
        self.write_line(label, 11.0, true);
        self.paragraph(text);
    }

    fn embed_chart(&mut self, png: &[u8]) {
        let decoder = match PngDecoder::new(Cursor::new(png)) {
            Ok(decoder) => decoder,
            Err(e) => {
                warn!(error = %e, "chart image unreadable; omitting chart section");
                return;
            }
        };
        let image = match Image::try_from(decoder) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "chart image unusable; omitting chart section");
                return;
            }
        };

        let width_px = image.image.width.0 as f32;
        let height_px = image.image.height.0 as f32;
        let height_mm = height_px / CHART_DPI * 25.4;
        let width_mm = width_px / CHART_DPI * 25.4;

        self.ensure_space(height_mm + 4.0);
        let x = (PAGE_WIDTH - width_mm).max(0.0) / 2.0;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(self.y - height_mm)),
                dpi: Some(CHART_DPI),
                ..Default::default()
            },
        );
        self.advance(height_mm + 4.0);
    }

    fn finish(self) -> Result<Vec<u8>, DocumentError> {
        Ok(self.doc.save_to_bytes()?)
    }
}

const fn line_height(size: f32) -> f32 {
    // Points to millimeters with ordinary leading.
    size * 0.3528 * 1.45
}

fn max_chars(size: f32) -> usize {
    // Average Helvetica glyph is roughly half an em wide.
    let usable_mm = PAGE_WIDTH - 2.0 * MARGIN;
    (usable_mm / (size * 0.3528 * 0.5)) as usize
}

/// Greedy word wrap; words longer than the limit get their own line.
fn wrap_text(text: &str, limit: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= limit {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Returns true for detail field values that carry no information.
fn is_unknown(value: &str) -> bool {
    value == "Unknown" || value == "No information available"
}

/// Synthesizes the report PDF.
///
/// Sections appear in a fixed order: header, primary identification,
/// chart, artifact details, ranked predictions, regional sites, and the
/// radiocarbon dating result when present. Missing inputs (chart bytes,
/// dating) cause their section to be omitted.
///
/// # Errors
///
/// Returns [`DocumentError::NoPredictions`] for an empty prediction list
/// and [`DocumentError::Pdf`] if the document itself cannot be built.
pub fn render_report(input: &ReportInput<'_>) -> Result<Vec<u8>, DocumentError> {
    let Some(primary) = input.top_k.first() else {
        return Err(DocumentError::NoPredictions);
    };

    let mut writer = PageWriter::new()?;

    // Header
    writer.write_line("Archaeological Artifact Analysis Report", 20.0, true);
    writer.write_line(
        &format!("Generated {}", Utc::now().format("%Y-%m-%d %H:%M UTC")),
        9.0,
        false,
    );
    if input.degraded_model {
        writer.advance(1.0);
        writer.write_line(
            "WARNING: classifier ran without trained weights; results are not meaningful.",
            10.0,
            true,
        );
    }

    // Primary identification
    writer.heading("Primary Identification");
    writer.paragraph(&format!(
        "{} with {:.2}% confidence",
        primary.class,
        primary.probability * 100.0
    ));

    // Chart
    if let Some(png) = input.chart_png {
        writer.heading("Confidence Distribution");
        writer.embed_chart(png);
    }

    // Enrichment record; fields with no information are left out.
    writer.heading("Artifact Details");
    let detail = input.detail;
    if !is_unknown(&detail.description) {
        writer.labeled_paragraph("Description", &detail.description);
    }
    if !is_unknown(&detail.era) {
        writer.labeled_paragraph("Historical Era", &detail.era);
    }
    if !is_unknown(&detail.material) {
        writer.labeled_paragraph("Material Composition", &detail.material);
    }
    if !is_unknown(&detail.significance) {
        writer.labeled_paragraph("Cultural Significance", &detail.significance);
    }
    if let Some(context) = &detail.cultural_context {
        writer.labeled_paragraph("Cultural Context", context);
    }
    if let Some(markers) = &detail.technological_markers {
        writer.labeled_paragraph("Technological Markers", markers);
    }
    if detail.is_placeholder() {
        writer.paragraph("No curated information is available for this class.");
    }

    // Ranked predictions
    writer.heading("Ranked Predictions");
    for (rank, prediction) in input.top_k.iter().enumerate() {
        writer.write_line(
            &format!(
                "{}. {}  -  {:.2}%",
                rank + 1,
                prediction.class,
                prediction.probability * 100.0
            ),
            10.5,
            false,
        );
    }
    writer.advance(1.5);

    // Regional sites
    if !input.sites.is_empty() {
        writer.heading("Regional Excavation Sites");
        for ranked in input.sites {
            writer.write_line(
                &format!("{} ({})", ranked.site.name, ranked.distance_km),
                11.0,
                true,
            );
            writer.paragraph(&ranked.site.significance);
            writer.paragraph(&format!("Key artifacts: {}", ranked.site.key_artifacts));
        }
    }

    // Radiocarbon dating
    if let Some(dating) = input.dating {
        writer.heading("Radiocarbon Dating");
        writer.paragraph(&format!(
            "Estimated age: {} years BP (before 1950 CE)",
            dating.age_bp_rounded()
        ));
        let year = i32::try_from(dating.calendar_year_rounded()).unwrap_or(i32::MIN);
        writer.paragraph(&format!(
            "Approximate calendar year: {}",
            format_year(year)
        ));
    }

    writer.finish()
}
