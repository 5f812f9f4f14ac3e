use plotters::prelude::*;
use thiserror::Error;

use crate::services::forecast::Forecast;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("failed to render histogram: {0}")]
    Render(String),
}

/// Renders the frequency table of a forecast as a bar chart. An empty table
/// writes nothing.
pub fn write_histogram_png(
    output_path: &str,
    forecast: &Forecast,
    x_desc: &str,
) -> Result<(), HistogramError> {
    let counts = forecast.simulation_result();
    let (Some(min_outcome), Some(max_outcome)) = (counts.keys().next(), counts.keys().next_back())
    else {
        return Ok(());
    };
    let max_count = counts.values().copied().max().unwrap_or(1);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let min_x = *min_outcome as i64 - 1;
    let max_x = *max_outcome as i64 + 2;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Simulation Results", ("sans-serif", 30))
        .x_label_area_size(55)
        .y_label_area_size(65)
        .build_cartesian_2d(min_x..max_x, 0..(max_count + 1))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(x_desc)
        .y_desc("Frequency")
        .label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 22))
        .draw()
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    let bar_color = RGBColor(30, 122, 204);
    let bar_style = ShapeStyle::from(&bar_color).filled();
    chart
        .draw_series(counts.iter().map(|(outcome, count)| {
            let x = *outcome as i64;
            Rectangle::new([(x, 0), (x + 1, *count)], bar_style)
        }))
        .map_err(|e| HistogramError::Render(e.to_string()))?;

    root.present()
        .map_err(|e| HistogramError::Render(e.to_string()))?;
    Ok(())
}
