//! Distribution plots rendered as SVG with plotters

use std::path::Path;

use anyhow::{bail, Result};
use plotters::prelude::*;
use plotters::series::Histogram as BarSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::analysis::{CorrelationMatrix, Histogram};

const PLOT_SIZE: (u32, u32) = (800, 500);
const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);

/// Histogram of one numeric column
pub fn plot_histogram(path: &Path, column: &str, hist: &Histogram) -> Result<()> {
    let (Some(&lo), Some(&hi)) = (hist.edges.first(), hist.edges.last()) else {
        bail!("Histogram for '{}' has no bins", column);
    };
    let y_max = (hist.max_count() as f64 * 1.05).max(1.0);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Histogram of {}", column), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(column)
        .y_desc("Frequency")
        .draw()?;

    let bars = || {
        hist.counts
            .iter()
            .zip(hist.edges.windows(2))
            .map(|(&count, edge)| [(edge[0], 0.0), (edge[1], count as f64)])
    };
    chart.draw_series(bars().map(|corners| Rectangle::new(corners, BLUE.mix(0.6).filled())))?;
    chart.draw_series(bars().map(|corners| Rectangle::new(corners, BLACK.stroke_width(1))))?;

    root.present()?;
    Ok(())
}

/// Box plot of one numeric column per label value
pub fn plot_boxplot(
    path: &Path,
    column: &str,
    label: &str,
    groups: &[(i64, Vec<f64>)],
) -> Result<()> {
    let groups: Vec<(String, Quartiles)> = groups
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(key, values)| (key.to_string(), Quartiles::new(values.as_slice())))
        .collect();

    if groups.is_empty() {
        bail!("No values to plot for '{}'", column);
    }

    let (mut lo, mut hi) = (f32::INFINITY, f32::NEG_INFINITY);
    for (_, q) in &groups {
        let v = q.values();
        lo = lo.min(v[0]);
        hi = hi.max(v[4]);
    }
    let pad = ((hi - lo) * 0.05).max(0.5);

    let labels: Vec<String> = groups.iter().map(|(k, _)| k.clone()).collect();

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} by Diabetes Status", column), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(labels[..].into_segmented(), (lo - pad)..(hi + pad))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(label)
        .y_desc(column)
        .draw()?;

    chart.draw_series(
        labels
            .iter()
            .zip(groups.iter())
            .map(|(key, (_, q))| Boxplot::new_vertical(SegmentValue::CenterOf(key), q)),
    )?;

    root.present()?;
    Ok(())
}

/// Bar chart of prevalence (%) per category, drawn in the given order
pub fn plot_category_prevalence(
    path: &Path,
    title: &str,
    prevalence: &[(String, f64)],
) -> Result<()> {
    if prevalence.is_empty() {
        bail!("No categories to plot for '{}'", title);
    }

    let labels: Vec<String> = prevalence.iter().map(|(c, _)| c.clone()).collect();
    let y_max = prevalence.iter().map(|(_, p)| *p).fold(0.0, f64::max).max(1.0) * 1.1;

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(labels[..].into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Diabetes %")
        .draw()?;

    chart.draw_series(
        BarSeries::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(10)
            .data(labels.iter().zip(prevalence.iter()).map(|(l, (_, p))| (l, *p))),
    )?;

    root.present()?;
    Ok(())
}

/// Blue (-1) → light grey (0) → red (+1); NaN is mid grey.
fn coolwarm(r: f64) -> RGBColor {
    if r.is_nan() {
        return RGBColor(160, 160, 160);
    }
    let t = r.clamp(-1.0, 1.0);
    let (from, to, w) = if t < 0.0 {
        ((221.0, 221.0, 221.0), (59.0, 76.0, 192.0), -t)
    } else {
        ((221.0, 221.0, 221.0), (180.0, 4.0, 38.0), t)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * w).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Annotated correlation heatmap, drawn in pixel coordinates
pub fn plot_correlation_heatmap(path: &Path, matrix: &CorrelationMatrix) -> Result<()> {
    let n = matrix.len() as i32;
    if n == 0 {
        bail!("Correlation matrix is empty");
    }

    let root = SVGBackend::new(path, (800, 650)).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled("Correlation Heatmap", ("sans-serif", 24))?;

    let (width, height) = area.dim_in_pixel();
    let (left, top, bottom) = (170i32, 10i32, 40i32);
    let cell = ((width as i32 - left - 20) / n)
        .min((height as i32 - top - bottom) / n)
        .max(1);

    let centered = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let right_aligned = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));

    for i in 0..n {
        for j in 0..n {
            let r = matrix.get(i as usize, j as usize);
            let (x0, y0) = (left + j * cell, top + i * cell);
            area.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell, y0 + cell)],
                coolwarm(r).filled(),
            ))?;
            let annotation = if r.is_nan() {
                "nan".to_string()
            } else {
                format!("{:.2}", r)
            };
            area.draw(&Text::new(
                annotation,
                (x0 + cell / 2, y0 + cell / 2),
                centered.clone(),
            ))?;
        }

        let name = matrix.names[i as usize].clone();
        area.draw(&Text::new(
            name.clone(),
            (left - 8, top + i * cell + cell / 2),
            right_aligned.clone(),
        ))?;
        area.draw(&Text::new(
            name,
            (left + i * cell + cell / 2, top + n * cell + 15),
            centered.clone(),
        ))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(coolwarm(0.0), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
    }
}
