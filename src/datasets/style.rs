//! Per-chart-kind visual defaults, palette cycling and color conversion.
//! Resolution is pure: `(chart kind, series index, user styles) -> attributes`,
//! user values always winning over defaults.

use crate::config::{ChartKind, MetricStyle};
use crate::datasets::{Dataset, Paint};

/// Fixed series palette, cycled by index. Deterministic by construction.
pub const PALETTE: [&str; 10] = [
    "#36a2eb", "#ff6384", "#ff9f40", "#ffcd56", "#4bc0c0", "#9966ff", "#c9cbcf", "#2ecc71",
    "#e74c3c", "#34495e",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// `#RRGGBB` + opacity in `[0, 1]` to an `rgba(..)` string. Anything that is
/// not 6-digit hex passes through unchanged and the opacity is ignored; that
/// asymmetry is a known limitation kept on purpose.
pub fn hex_to_rgba(color: &str, opacity: f64) -> String {
    let Some(hex) = color.strip_prefix('#') else {
        return color.to_string();
    };
    if hex.len() != 6 {
        return color.to_string();
    }
    let Ok(r) = u8::from_str_radix(&hex[0..2], 16) else {
        return color.to_string();
    };
    let Ok(g) = u8::from_str_radix(&hex[2..4], 16) else {
        return color.to_string();
    };
    let Ok(b) = u8::from_str_radix(&hex[4..6], 16) else {
        return color.to_string();
    };
    format!("rgba({}, {}, {}, {})", r, g, b, opacity)
}

/// `"5,5"` to `[5, 5]`. Tokens that do not parse are skipped.
pub fn parse_dash(dash: &str) -> Vec<u32> {
    dash.split(',')
        .filter_map(|tok| tok.trim().parse::<u32>().ok())
        .collect()
}

fn base_color(style: &MetricStyle, index: usize) -> String {
    style
        .background_color
        .clone()
        .unwrap_or_else(|| palette_color(index).to_string())
}

fn line_color(style: &MetricStyle, index: usize) -> String {
    style
        .border_color
        .clone()
        .or_else(|| style.background_color.clone())
        .unwrap_or_else(|| palette_color(index).to_string())
}

/// Apply one chart kind's defaults under the user style for series `index`.
/// For pie-like kinds `styles` is keyed by label index instead and colors are
/// resolved per slice.
pub fn apply(chart: ChartKind, index: usize, styles: &[MetricStyle], dataset: &mut Dataset) {
    let own = styles.get(index).cloned().unwrap_or_default();
    match chart {
        ChartKind::Bar => {
            dataset.background_color = Some(Paint::Single(base_color(&own, index)));
            dataset.border_color = Some(Paint::Single(line_color(&own, index)));
            dataset.border_width = Some(own.border_width.unwrap_or(1.0));
            dataset.border_radius = Some(own.border_radius.unwrap_or(4.0));
            dataset.border_skipped = Some(false);
            dataset.bar_thickness = Some(own.bar_thickness.unwrap_or(24.0));
        }
        ChartKind::Line => {
            let color = line_color(&own, index);
            dataset.border_color = Some(Paint::Single(color.clone()));
            dataset.background_color = Some(Paint::Single(own.background_color.unwrap_or(color)));
            dataset.border_width = Some(own.border_width.unwrap_or(2.0));
            dataset.fill = Some(own.fill.unwrap_or(false));
            dataset.tension = Some(own.tension.unwrap_or(0.3));
            dataset.stepped = Some(own.stepped.unwrap_or(false));
            dataset.point_style = Some(own.point_style.unwrap_or_else(|| "circle".to_string()));
            dataset.border_dash = own.border_dash.as_deref().map(parse_dash);
            // show_points collapses the radius to 0 rather than removing the
            // points, so tooltips keep working in the renderer.
            let radius = if own.show_points.unwrap_or(true) {
                own.point_radius.unwrap_or(3.0)
            } else {
                0.0
            };
            dataset.point_radius = Some(radius);
        }
        ChartKind::Pie | ChartKind::Doughnut => {
            let colors: Vec<String> = (0..dataset.data.len())
                .map(|label_idx| {
                    styles
                        .get(label_idx)
                        .and_then(|s| s.background_color.clone())
                        .unwrap_or_else(|| palette_color(label_idx).to_string())
                })
                .collect();
            dataset.background_color = Some(Paint::PerLabel(colors));
            dataset.border_width = Some(own.border_width.unwrap_or(1.0));
            if chart == ChartKind::Doughnut {
                dataset.cutout = Some(own.cutout.unwrap_or_else(|| "50%".to_string()));
            }
        }
        ChartKind::Scatter | ChartKind::Bubble => {
            let color = base_color(&own, index);
            let opacity = own.opacity.unwrap_or(0.7);
            dataset.background_color = Some(Paint::Single(hex_to_rgba(&color, opacity)));
            dataset.border_color = Some(Paint::Single(color));
            dataset.show_line = Some(false);
            if chart == ChartKind::Scatter {
                dataset.point_radius = Some(own.point_radius.unwrap_or(4.0));
            }
        }
        ChartKind::Radar => {
            let color = line_color(&own, index);
            let opacity = own.opacity.unwrap_or(0.2);
            dataset.background_color = Some(Paint::Single(hex_to_rgba(&color, opacity)));
            dataset.border_color = Some(Paint::Single(color));
            dataset.border_width = Some(own.border_width.unwrap_or(2.0));
            dataset.fill = Some(own.fill.unwrap_or(true));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::SeriesData;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0), PALETTE[0]);
        assert_eq!(palette_color(10), PALETTE[0]);
        assert_eq!(palette_color(13), PALETTE[3]);
    }

    #[test]
    fn test_hex_to_rgba() {
        assert_eq!(hex_to_rgba("#ff0080", 0.5), "rgba(255, 0, 128, 0.5)");
        assert_eq!(hex_to_rgba("#000000", 1.0), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn test_non_hex_color_passes_through() {
        assert_eq!(hex_to_rgba("rgba(1, 2, 3, 0.4)", 0.9), "rgba(1, 2, 3, 0.4)");
        assert_eq!(hex_to_rgba("tomato", 0.5), "tomato");
        assert_eq!(hex_to_rgba("#fff", 0.5), "#fff");
        assert_eq!(hex_to_rgba("#zzzzzz", 0.5), "#zzzzzz");
    }

    #[test]
    fn test_parse_dash() {
        assert_eq!(parse_dash("5,5"), vec![5, 5]);
        assert_eq!(parse_dash(" 10, 2 "), vec![10, 2]);
        assert_eq!(parse_dash("5,x,3"), vec![5, 3]);
        assert!(parse_dash("").is_empty());
    }

    #[test]
    fn test_user_style_wins_over_defaults() {
        let mut ds = Dataset::new("s", SeriesData::Values(vec![1.0]));
        let styles = vec![MetricStyle {
            background_color: Some("#123456".to_string()),
            tension: Some(0.0),
            ..Default::default()
        }];
        apply(ChartKind::Line, 0, &styles, &mut ds);
        assert_eq!(ds.tension, Some(0.0));
        assert_eq!(
            ds.background_color,
            Some(Paint::Single("#123456".to_string()))
        );
    }

    #[test]
    fn test_show_points_zeroes_radius() {
        let mut ds = Dataset::new("s", SeriesData::Values(vec![1.0]));
        let styles = vec![MetricStyle {
            show_points: Some(false),
            point_radius: Some(6.0),
            ..Default::default()
        }];
        apply(ChartKind::Line, 0, &styles, &mut ds);
        assert_eq!(ds.point_radius, Some(0.0));
    }

    #[test]
    fn test_pie_colors_keyed_by_label() {
        let mut ds = Dataset::new("s", SeriesData::Values(vec![1.0, 2.0, 3.0]));
        let styles = vec![MetricStyle {
            background_color: Some("#111111".to_string()),
            ..Default::default()
        }];
        apply(ChartKind::Pie, 0, &styles, &mut ds);
        match ds.background_color {
            Some(Paint::PerLabel(colors)) => {
                assert_eq!(colors.len(), 3);
                assert_eq!(colors[0], "#111111");
                assert_eq!(colors[1], palette_color(1));
            }
            other => panic!("expected per-label colors, got {:?}", other),
        }
        assert_eq!(ds.cutout, None);
    }

    #[test]
    fn test_doughnut_cutout_default() {
        let mut ds = Dataset::new("s", SeriesData::Values(vec![1.0]));
        apply(ChartKind::Doughnut, 0, &[], &mut ds);
        assert_eq!(ds.cutout.as_deref(), Some("50%"));
    }

    #[test]
    fn test_radar_fills_with_low_opacity() {
        let mut ds = Dataset::new("s", SeriesData::Values(vec![1.0]));
        apply(ChartKind::Radar, 0, &[], &mut ds);
        assert_eq!(ds.fill, Some(true));
        match ds.background_color {
            Some(Paint::Single(c)) => assert!(c.starts_with("rgba(") && c.ends_with("0.2)")),
            other => panic!("expected rgba background, got {:?}", other),
        }
        assert!(ChartKind::Radar.uses_radial_scale());
    }
}
