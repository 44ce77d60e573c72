//! Probability distribution bar chart rendering.

use std::io::Cursor;
use std::sync::Once;

use artifact_structs::{ArtifactClass, Classification};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};
use tracing::warn;

/// Chart width in pixels.
const WIDTH: u32 = 900;

/// Chart height in pixels.
const HEIGHT: u32 = 520;

/// Bars below this probability are drawn without a numeric label; the
/// text would not be legible at that size.
pub const LABEL_THRESHOLD: f32 = 0.01;

/// Bundled font, registered once so rendering does not depend on the
/// host's font configuration.
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT_INIT: Once = Once::new();

fn ensure_font() {
    FONT_INIT.call_once(|| {
        if register_font("sans-serif", FontStyle::Normal, FONT_BYTES).is_err() {
            warn!("bundled chart font failed to register; text rendering may fail");
        }
    });
}

/// Error type for chart rendering failures.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("chart encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Renders the full class probability distribution as a PNG bar chart.
///
/// One bar per class in classifier output order, each in a class-stable
/// palette color, with the percentage printed above bars that clear
/// [`LABEL_THRESHOLD`]. Output is deterministic for identical input.
///
/// # Errors
///
/// Returns [`ChartError`] if drawing or PNG encoding fails.
pub fn render_probability_chart(classification: &Classification) -> Result<Vec<u8>, ChartError> {
    ensure_font();

    let probabilities = classification.probabilities();
    let class_count = probabilities.len();
    let max_probability = probabilities.iter().copied().fold(0.0f32, f32::max);
    let y_max = (max_probability * 1.25).clamp(0.1, 1.05);

    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Render(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Classification Confidence", ("sans-serif", 26))
            .margin(12)
            .x_label_area_size(120)
            .y_label_area_size(55)
            .build_cartesian_2d((0..class_count).into_segmented(), 0f32..y_max)
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Probability")
            .x_labels(class_count)
            .x_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(index) | SegmentValue::Exact(index) => {
                    ArtifactClass::from_index(*index)
                        .map(|class| class.to_string())
                        .unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .x_label_style(
                ("sans-serif", 14)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .label_style(("sans-serif", 14))
            .draw()
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .draw_series(probabilities.iter().enumerate().map(|(index, &p)| {
                let color = Palette99::pick(index).filled();
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(index), 0.0),
                        (SegmentValue::Exact(index + 1), p),
                    ],
                    color,
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .draw_series(
                probabilities
                    .iter()
                    .enumerate()
                    .filter(|&(_, &p)| p >= LABEL_THRESHOLD)
                    .map(|(index, &p)| {
                        let style = TextStyle::from(("sans-serif", 13).into_font())
                            .pos(Pos::new(HPos::Center, VPos::Bottom));
                        Text::new(
                            format!("{:.1}%", p * 100.0),
                            (SegmentValue::CenterOf(index), p),
                            style,
                        )
                    }),
            )
            .map_err(|e| ChartError::Render(e.to_string()))?;

        root.present().map_err(|e| ChartError::Render(e.to_string()))?;
    }

    let rgb = RgbImage::from_raw(WIDTH, HEIGHT, buffer)
        .ok_or_else(|| ChartError::Render("buffer size mismatch".to_string()))?;

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(png)
}
