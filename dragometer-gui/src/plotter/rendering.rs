use crate::plotter::palette_color;
use crate::GuiError;
use dragometer_core::Plot;
use egui_plot::{Line, PlotBounds, PlotPoints};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;

/// Draws `plot` as an egui widget of the given size, title above the chart.
pub(crate) fn render_plot(ui: &mut egui::Ui, plot: &Plot, width: f32, height: f32) {
    if !plot.title().is_empty() {
        ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(plot.title()).strong().size(16.0));
        });
    }

    let bounds = plot.view_bounds();
    egui_plot::Plot::new(format!("plot_{}", plot.id()))
        .width(width)
        .height(height)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .x_axis_label(plot.x_axis_title())
        .y_axis_label(plot.y_axis_title())
        .show(ui, |plot_ui| {
            for (i, series) in plot.series().iter().enumerate() {
                if series.is_empty() {
                    continue;
                }
                let points: PlotPoints = series.points().iter().map(|(x, y)| [*x, *y]).collect();
                plot_ui.line(Line::new(points).color(palette_color(i)));
            }
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [bounds.x_min, bounds.y_min],
                [bounds.x_max, bounds.y_max],
            ));
        });
}

/// Renders `plot` off-screen and returns it as PNG bytes.
pub fn capture_image(plot: &Plot, width: u32, height: u32) -> Result<Vec<u8>, GuiError> {
    if width == 0 || height == 0 {
        return Err(GuiError::Render(format!(
            "image size {width}x{height} is empty"
        )));
    }
    let mut rgb = vec![0u8; width as usize * height as usize * 3];
    draw_chart(plot, &mut rgb, width, height).map_err(GuiError::Render)?;
    encode_png(&rgb, width, height)
}

pub fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, GuiError> {
    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected {
        return Err(GuiError::Render(format!(
            "RGB buffer holds {} bytes, {width}x{height} needs {expected}",
            rgb.len()
        )));
    }
    let mut output = Vec::new();
    PngEncoder::new(&mut output)
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| GuiError::Render(e.to_string()))?;
    Ok(output)
}

fn draw_chart(plot: &Plot, buffer: &mut [u8], width: u32, height: u32) -> Result<(), String> {
    let bounds = plot.view_bounds();
    let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
    let text_color = RGBColor(220, 220, 220);
    let axis_color = RGBColor(80, 80, 80);
    root.fill(&RGBColor(24, 24, 24)).map_err(|e| e.to_string())?;

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40);
    if !plot.title().is_empty() {
        builder.caption(plot.title(), ("sans-serif", 22).into_font().color(&text_color));
    }
    let mut chart = builder
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)
        .map_err(|e| e.to_string())?;

    chart
        .configure_mesh()
        .x_desc(plot.x_axis_title())
        .y_desc(plot.y_axis_title())
        .axis_desc_style(("sans-serif", 16).into_font().color(&text_color))
        .label_style(("sans-serif", 13).into_font().color(&text_color))
        .axis_style(&axis_color)
        .light_line_style(&axis_color)
        .bold_line_style(&axis_color)
        .draw()
        .map_err(|e| e.to_string())?;

    for (i, series) in plot.series().iter().enumerate() {
        if series.is_empty() {
            continue;
        }
        let color = palette_color(i);
        let color = RGBColor(color.r(), color.g(), color.b());
        chart
            .draw_series(LineSeries::new(
                series.points().iter().copied(),
                color.stroke_width(1),
            ))
            .map_err(|e| e.to_string())?;
    }

    root.present().map_err(|e| e.to_string())?;
    Ok(())
}
