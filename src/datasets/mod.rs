//! Renderer-ready series objects. The shapes here serialize straight into a
//! chart.js-style widget, which is why this module alone uses camelCase
//! attribute names on the wire.

pub mod builder;
pub mod style;

pub use builder::build_datasets;

use serde::Serialize;

/// A color attribute: one color for the whole series, or one per label for
/// pie-like charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Paint {
    Single(String),
    PerLabel(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BubblePoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// Series payload: scalar values for axis charts, point objects for the
/// point-cloud kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Values(Vec<f64>),
    Points(Vec<ScatterPoint>),
    Bubbles(Vec<BubblePoint>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Values(v) => v.len(),
            SeriesData::Points(p) => p.len(),
            SeriesData::Bubbles(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One renderer-ready series. Visual attributes stay `None` unless the chart
/// kind's style resolution (or a user override) sets them, so the serialized
/// object only carries what the renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: SeriesData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Paint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_skipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_line: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutout: Option<String>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: SeriesData) -> Self {
        Dataset {
            label: label.into(),
            data,
            background_color: None,
            border_color: None,
            border_width: None,
            border_radius: None,
            border_skipped: None,
            border_dash: None,
            bar_thickness: None,
            fill: None,
            tension: None,
            point_style: None,
            point_radius: None,
            stepped: None,
            show_line: None,
            cutout: None,
        }
    }
}
