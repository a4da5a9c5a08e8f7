//! Grouped bar chart: one group per influencer, three bars per group
//! (followers, likes, comments) on a shared linear axis.
//!
//! The raster carries no text. Labels and the legend are written into the
//! PDF next to the image, so no font backend is needed here.

use plotters::prelude::*;
use printpdf::image_crate::RgbImage;

use crate::influencers::RankedResult;
use crate::report::ReportError;

pub const CHART_WIDTH_PX: u32 = 1200;
pub const CHART_HEIGHT_PX: u32 = 600;

const MARGIN_PX: i32 = 30;
/// Fraction of a group's width left empty between groups.
const GROUP_GAP: f64 = 0.25;

/// Series in draw order: (name, colour name, colour).
pub const SERIES: [(&str, &str, RGBColor); 3] = [
    ("followers", "blue", RGBColor(31, 119, 180)),
    ("likes", "green", RGBColor(44, 160, 44)),
    ("comments", "red", RGBColor(214, 39, 40)),
];

/// Values for one bar group, in ranked order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarGroup {
    pub label: String,
    pub values: [u64; 3],
}

/// One triple per ranked username, in ranked order.
pub fn chart_groups(ranked: &RankedResult) -> Vec<BarGroup> {
    ranked
        .entries
        .iter()
        .map(|e| BarGroup {
            label: e.influencer.username.clone(),
            values: [
                e.influencer.raw_followers,
                e.influencer.avg_likes,
                e.influencer.avg_comments,
            ],
        })
        .collect()
}

/// Rasterizes `groups` into an RGB image of `width` × `height` pixels.
pub fn render_bar_chart(
    groups: &[BarGroup],
    width: u32,
    height: u32,
) -> Result<RgbImage, ReportError> {
    let mut buffer = vec![0u8; (width as usize) * (height as usize) * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let baseline = height as i32 - MARGIN_PX;
        let plot_height = (baseline - MARGIN_PX).max(1) as f64;
        let plot_width = (width as i32 - 2 * MARGIN_PX).max(1) as f64;

        let max_value = groups
            .iter()
            .flat_map(|g| g.values)
            .max()
            .unwrap_or(0)
            .max(1) as f64;

        if !groups.is_empty() {
            let group_width = plot_width / groups.len() as f64;
            let bar_width = group_width * (1.0 - GROUP_GAP) / SERIES.len() as f64;

            for (gi, group) in groups.iter().enumerate() {
                let group_left =
                    MARGIN_PX as f64 + gi as f64 * group_width + group_width * GROUP_GAP / 2.0;
                for (si, value) in group.values.iter().enumerate() {
                    let x0 = (group_left + si as f64 * bar_width).round() as i32;
                    let x1 = (group_left + (si + 1) as f64 * bar_width).round() as i32;
                    let bar_height = (*value as f64 / max_value * plot_height).round() as i32;
                    if bar_height == 0 {
                        continue;
                    }
                    root.draw(&Rectangle::new(
                        [(x0, baseline - bar_height), (x1, baseline)],
                        SERIES[si].2.filled(),
                    ))
                    .map_err(draw_err)?;
                }
            }
        }

        root.draw(&PathElement::new(
            vec![(MARGIN_PX, baseline), (width as i32 - MARGIN_PX, baseline)],
            BLACK.stroke_width(2),
        ))
        .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ReportError::Chart("pixel buffer size mismatch".to_string()))
}

fn draw_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Chart(e.to_string())
}
