use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};
use hatvp_dataviz::color::Theme;
use hatvp_dataviz::data::Row;
use hatvp_dataviz::views::diverging::{diverging_bars, max_extent};
use hatvp_dataviz::views::{category_values, ChartKind, ChartSpec};

use crate::state::{LoadStatus, ViewState};

// ---------------------------------------------------------------------------
// Chart for the mounted view (central panel)
// ---------------------------------------------------------------------------

/// Render the active view: header, then a chart or the reason there is none.
pub fn view_chart(ui: &mut Ui, view: &ViewState, theme: &Theme) {
    ui.heading(view.kind.title());
    ui.label(RichText::new(view.kind.description()).weak());
    ui.add_space(8.0);

    match &view.status {
        LoadStatus::Loading(_) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.spinner();
            });
            return;
        }
        LoadStatus::Failed(msg) => {
            ui.label(RichText::new(format!("Could not load data: {msg}")).color(Color32::RED));
            return;
        }
        LoadStatus::Loaded(_) => {}
    }

    if let Some(msg) = &view.query_error {
        ui.label(RichText::new(msg).color(Color32::RED));
        return;
    }
    if view.derived.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No rows match.");
        });
        return;
    }

    let rows: Vec<&Row> = view.derived.iter().collect();
    let chart = view.kind.chart();
    match chart.kind {
        ChartKind::Bar => bar_chart(ui, &rows, &chart, theme),
        ChartKind::Diverging => diverging_chart(ui, &rows, &chart, theme),
        ChartKind::Pie => pie_chart(ui, &rows, &chart, theme),
    }
}

/// Axis formatter printing category labels at integer positions.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, rows: &[&Row], chart: &ChartSpec, theme: &Theme) {
    let Some(value_field) = chart.values.first() else {
        return;
    };
    let points = category_values(rows, chart.category, value_field);
    let labels: Vec<String> = points.iter().map(|(label, _)| label.clone()).collect();

    let bars: Vec<Bar> = points
        .iter()
        .enumerate()
        .map(|(i, (label, value))| Bar::new(i as f64, *value).name(label).width(0.7))
        .collect();

    Plot::new("bar_chart")
        .x_axis_formatter(category_formatter(labels))
        .y_axis_label(*value_field)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(*value_field).color(theme.primary));
        });
}

// ---------------------------------------------------------------------------
// Diverging (pyramid) chart
// ---------------------------------------------------------------------------

fn diverging_chart(ui: &mut Ui, rows: &[&Row], chart: &ChartSpec, theme: &Theme) {
    let [left_field, right_field] = chart.values else {
        return;
    };
    let bars = diverging_bars(rows, chart.category, left_field, right_field);
    let extent = max_extent(&bars).max(1.0);
    let n = bars.len();

    // First row at the top of the plot.
    let position = |i: usize| (n - 1 - i) as f64;
    let labels: Vec<String> = (0..n)
        .map(|y| bars[n - 1 - y].label.clone())
        .collect();

    let left: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| Bar::new(position(i), b.left).name(&b.label).width(0.8))
        .collect();
    let right: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| Bar::new(position(i), b.right).name(&b.label).width(0.8))
        .collect();

    let magnitude = |bar: &Bar, _chart: &BarChart| format!("{}\n{}", bar.name, bar.value.abs());

    Plot::new("diverging_chart")
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| format!("{}", mark.value.abs()))
        .y_axis_formatter(category_formatter(labels))
        .include_x(-extent)
        .include_x(extent)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(left)
                    .name(capitalize(left_field))
                    .color(theme.male)
                    .horizontal()
                    .element_formatter(Box::new(magnitude)),
            );
            plot_ui.bar_chart(
                BarChart::new(right)
                    .name(capitalize(right_field))
                    .color(theme.female)
                    .horizontal()
                    .element_formatter(Box::new(magnitude)),
            );
        });
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Start/end angles (radians) of each slice. Non-finite or negative values
/// get an empty slice.
pub fn pie_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let clean: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() && *v > 0.0 { *v } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();
    let mut start = 0.0;
    clean
        .iter()
        .map(|v| {
            let sweep = if total > 0.0 { v / total * TAU } else { 0.0 };
            let slice = (start, start + sweep);
            start += sweep;
            slice
        })
        .collect()
}

fn pie_chart(ui: &mut Ui, rows: &[&Row], chart: &ChartSpec, theme: &Theme) {
    let Some(value_field) = chart.values.first() else {
        return;
    };
    let points = category_values(rows, chart.category, value_field);
    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let angles = pie_angles(&values);
    let colors = theme.category_colors(points.len());

    Plot::new("pie_chart")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for (((label, value), (start, end)), color) in
                points.iter().zip(&angles).zip(&colors)
            {
                if end <= start {
                    continue;
                }
                let steps = (((end - start) / TAU) * 120.0).ceil().max(2.0) as usize;
                let mut outline = vec![[0.0, 0.0]];
                outline.extend((0..=steps).map(|k| {
                    let a = start + (end - start) * k as f64 / steps as f64;
                    [a.cos(), a.sin()]
                }));

                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(outline))
                        .name(label)
                        .fill_color(*color),
                );

                let mid = (start + end) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(mid.cos() * 1.15, mid.sin() * 1.15),
                    format!("{value}"),
                ));
            }
        });
}
