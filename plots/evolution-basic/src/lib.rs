use std::{ops::Range, path::Path};

use common::{
    config::{ChartStyle, Rgb},
    metrics::MetricSeries,
    plot::Plot,
    util::format_thousands,
};
use eyre::{Result, eyre};
use itertools::{Itertools, MinMaxResult};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use tracing::debug;

/// Six-panel overview of how each metric moves across versions.
#[derive(Debug, Default, Clone)]
pub struct EvolutionBasic;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Marker {
    Circle,
    Square,
    TriangleUp,
    Diamond,
    TriangleDown,
}

impl Marker {
    fn outline(self, size: i32) -> Vec<(i32, i32)> {
        match self {
            Marker::Circle => Vec::new(),
            Marker::Square => vec![(-size, -size), (size, -size), (size, size), (-size, size)],
            Marker::TriangleUp => vec![(0, -size), (size, size), (-size, size)],
            Marker::Diamond => vec![(0, -size), (size, 0), (0, size), (-size, 0)],
            Marker::TriangleDown => vec![(-size, -size), (size, -size), (0, size)],
        }
    }
}

struct LineChart<'a> {
    title: &'static str,
    y_desc: &'static str,
    marker: Marker,
    color: Rgb,
    values: Vec<f64>,
    value_label: fn(f64) -> String,
    y_range: Option<Range<f64>>,
    zero_line: bool,
    labels: &'a [String],
}

struct BarChart<'a> {
    title: &'static str,
    y_desc: &'static str,
    groups: [(&'static str, Rgb, &'a [f64]); 2],
    labels: &'a [String],
}

fn font<'a>(style: &'a ChartStyle, size: f64, weight: FontStyle) -> FontDesc<'a> {
    FontDesc::new(FontFamily::from(style.font_family.as_str()), size, weight)
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

/// Integers print without a fraction, everything else with one decimal.
fn plain_label(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn x_range(count: usize) -> Range<f64> {
    -0.5..(count as f64 - 0.5)
}

/// Value range with headroom for the point labels.
fn y_bounds(values: &[f64], include_zero: bool) -> Range<f64> {
    let (mut lo, mut hi) = match values.iter().copied().minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        let pad = (hi.abs() * 0.1).max(1.0);
        return (lo - pad)..(hi + pad);
    }
    let (bottom, top) = (span * 0.1, span * 0.2);
    lo = if include_zero && lo >= 0.0 { lo } else { lo - bottom };
    hi += top;
    lo..hi
}

fn draw_line_chart<DB>(
    area: &DrawingArea<DB, Shift>,
    chart: &LineChart<'_>,
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let count = chart.values.len();
    let y_range = chart
        .y_range
        .clone()
        .unwrap_or_else(|| y_bounds(&chart.values, chart.zero_line));
    let x_fmt = |x: &f64| category_label(chart.labels, *x);

    let mut ctx = ChartBuilder::on(area)
        .caption(
            chart.title,
            font(style, style.caption_font_size, FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range(count), y_range)?;

    ctx.configure_mesh()
        .x_labels(count)
        .x_label_formatter(&x_fmt)
        .x_desc("Version")
        .y_desc(chart.y_desc)
        .label_style(font(style, style.label_font_size, FontStyle::Normal))
        .axis_desc_style(font(style, style.label_font_size, FontStyle::Bold))
        .bold_line_style(BLACK.mix(style.grid_alpha))
        .light_line_style(WHITE.mix(0.0))
        .draw()?;

    if chart.zero_line {
        let (x0, x1) = (-0.5, count as f64 - 0.5);
        let dash = 0.08;
        let dashes = ((x1 - x0) / (dash * 2.0)).ceil() as usize;
        ctx.draw_series((0..dashes).map(|i| {
            let start = x0 + i as f64 * dash * 2.0;
            PathElement::new(
                vec![(start, 0.0), ((start + dash).min(x1), 0.0)],
                BLACK.mix(0.5).stroke_width(2),
            )
        }))?;
    }

    let line_color = color(chart.color);
    let points: Vec<(f64, f64)> = chart
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();

    ctx.draw_series(LineSeries::new(
        points.iter().copied(),
        line_color.stroke_width(style.line_width),
    ))?;

    let size = style.marker_size as i32;
    let marker_style = line_color.filled();
    for &point in &points {
        match chart.marker {
            Marker::Circle => {
                ctx.draw_series(std::iter::once(Circle::new(point, size, marker_style)))?;
            }
            other => {
                ctx.draw_series(std::iter::once(
                    EmptyElement::at(point) + Polygon::new(other.outline(size), marker_style),
                ))?;
            }
        }
    }

    let value_font = TextStyle::from(font(style, style.value_font_size, FontStyle::Normal))
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    ctx.draw_series(points.iter().map(|&(x, y)| {
        EmptyElement::at((x, y))
            + Text::new(
                (chart.value_label)(y),
                (0, -(size + 6)),
                value_font.clone(),
            )
    }))?;

    Ok(())
}

fn draw_bar_chart<DB>(
    area: &DrawingArea<DB, Shift>,
    chart: &BarChart<'_>,
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let width = 0.35;
    let count = chart.labels.len();
    let all_values: Vec<f64> = chart
        .groups
        .iter()
        .flat_map(|(_, _, values)| values.iter().copied())
        .collect();
    let x_fmt = |x: &f64| category_label(chart.labels, *x);

    let mut ctx = ChartBuilder::on(area)
        .caption(
            chart.title,
            font(style, style.caption_font_size, FontStyle::Bold),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range(count), y_bounds(&all_values, true))?;

    ctx.configure_mesh()
        .x_labels(count)
        .x_label_formatter(&x_fmt)
        .x_desc("Version")
        .y_desc(chart.y_desc)
        .label_style(font(style, style.label_font_size, FontStyle::Normal))
        .axis_desc_style(font(style, style.label_font_size, FontStyle::Bold))
        .bold_line_style(BLACK.mix(style.grid_alpha))
        .light_line_style(WHITE.mix(0.0))
        .draw()?;

    let bar_font = TextStyle::from(font(style, style.value_font_size * 0.8, FontStyle::Normal))
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    for (group, (name, rgb, values)) in chart.groups.iter().enumerate() {
        let offset = if group == 0 { -width / 2.0 } else { width / 2.0 };
        let fill = color(*rgb).mix(0.8).filled();

        ctx.draw_series(values.iter().enumerate().map(|(i, &v)| {
            let x = i as f64 + offset;
            Rectangle::new([(x - width / 2.0, 0.0), (x + width / 2.0, v)], fill)
        }))?
        .label(*name)
        .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 18, y + 6)], fill));

        ctx.draw_series(values.iter().enumerate().map(|(i, &v)| {
            Text::new(
                format_thousands(v, 0),
                (i as f64 + offset, v),
                bar_font.clone(),
            )
        }))?;
    }

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(font(style, style.label_font_size, FontStyle::Normal))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

impl EvolutionBasic {
    fn render<DB>(
        &self,
        root: DrawingArea<DB, Shift>,
        labels: &[String],
        series: &MetricSeries,
        style: &ChartStyle,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let root = root.titled(
            &style.title,
            font(style, style.title_font_size, FontStyle::Bold),
        )?;
        let cells = root.split_evenly((3, 2));

        let line_charts = [
            LineChart {
                title: "Total Líquido Evolution (Final Score)",
                y_desc: "Total Líquido",
                marker: Marker::Circle,
                color: style.color(0),
                values: series.total_liquido.clone(),
                value_label: |v| format_thousands(v, 0),
                y_range: None,
                zero_line: false,
                labels,
            },
            LineChart {
                title: "P99 Response Time Evolution",
                y_desc: "P99 (ms)",
                marker: Marker::Square,
                color: style.color(1),
                values: series.p99_ms.clone(),
                value_label: |v| format!("{v:.1}ms"),
                y_range: None,
                zero_line: false,
                labels,
            },
            LineChart {
                title: "Payment Success Rate Evolution",
                y_desc: "Success Rate (%)",
                marker: Marker::TriangleUp,
                color: style.color(2),
                values: series.success_rate_pct.clone(),
                value_label: |v| format!("{v:.1}%"),
                y_range: Some(0.0..105.0),
                zero_line: false,
                labels,
            },
            LineChart {
                title: "Number of Inconsistencies Evolution",
                y_desc: "Number of Inconsistencies",
                marker: Marker::Diamond,
                color: style.color(3),
                values: series
                    .inconsistency_count
                    .iter()
                    .map(|&c| c as f64)
                    .collect(),
                value_label: plain_label,
                y_range: None,
                zero_line: false,
                labels,
            },
            LineChart {
                title: "Payment Processing Lag Evolution",
                y_desc: "Lag (requests)",
                marker: Marker::TriangleDown,
                color: style.color(4),
                values: series.lag.clone(),
                value_label: plain_label,
                y_range: None,
                zero_line: true,
                labels,
            },
        ];

        for (area, chart) in cells.iter().zip(&line_charts) {
            debug!("Drawing {}", chart.title);
            draw_line_chart(area, chart, style)?;
        }

        let comparison = BarChart {
            title: "Total Bruto vs Total Líquido Comparison",
            y_desc: "Amount",
            groups: [
                ("Total Bruto", style.color(0), series.total_bruto.as_slice()),
                ("Total Líquido", style.color(1), series.total_liquido.as_slice()),
            ],
            labels,
        };
        draw_bar_chart(&cells[5], &comparison, style)?;

        root.present()?;
        Ok(())
    }
}

impl Plot for EvolutionBasic {
    fn name(&self) -> &'static str {
        "evolution-basic"
    }

    fn check_backend(&self, style: &ChartStyle) -> Result<()> {
        font(style, style.label_font_size, FontStyle::Normal)
            .box_size("v0.0")
            .map_err(|err| eyre!("Cannot load font {:?}: {err}", style.font_family))?;
        Ok(())
    }

    fn plot(
        &self,
        labels: &[String],
        series: &MetricSeries,
        output: &Path,
        style: &ChartStyle,
    ) -> Result<()> {
        let root = BitMapBackend::new(output, (style.width, style.height)).into_drawing_area();
        self.render(root, labels, series, style)
    }
}
