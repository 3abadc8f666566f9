//! Radar chart geometry.
//!
//! Computes everything a renderer needs to draw a radar (spider) chart for
//! a set of named intensities: axis directions and labels, reference rings,
//! the data polygon and its vertex markers. Coordinates are relative to the
//! chart center on a y-down canvas, so "up" is negative y and axes advance
//! clockwise. Renderers with a y-up coordinate system flip `y`.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::models::{AromaTag, MAX_INTENSITY};

/// Label anchors sit this far out, as a fraction of the radius.
pub const LABEL_DISTANCE: f64 = 1.1;

/// Fraction of the radius used for zero values so an all-zero chart still
/// draws a visible polygon.
pub const ZERO_EPSILON: f64 = 0.03;

/// Alpha of the polygon fill.
pub const FILL_ALPHA: f32 = 0.2;

/// Polygon outline width, in canvas units.
pub const STROKE_WIDTH: f64 = 2.0;

/// Outer and inner radius of a vertex marker.
pub const MARKER_RADIUS: f64 = 5.0;
pub const MARKER_INNER_RADIUS: f64 = 3.0;

/// A point relative to the chart center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    fn polar(distance: f64, angle: f64) -> Self {
        Self {
            x: distance * angle.cos(),
            y: distance * angle.sin(),
        }
    }
}

/// One category axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub label: String,
    /// Radians; the first axis is at -pi/2.
    pub angle: f64,
    /// Outer end of the radial guide line.
    pub end: Point,
    /// Center of the category label.
    pub label_anchor: Point,
    /// Names of the selected tags in this category, joined with ", ".
    pub annotation: Option<String>,
}

/// A concentric reference ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub level: u8,
    pub radius: f64,
}

/// Complete chart geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarLayout {
    pub axes: Vec<Axis>,
    pub rings: Vec<Ring>,
    /// Data vertices in axis order; the outline closes back to the first.
    pub polygon: Vec<Point>,
    pub markers: Vec<Point>,
}

impl RadarLayout {
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Outline segments, including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let next = self.polygon.iter().cycle().skip(1);
        self.polygon.iter().copied().zip(next.copied())
    }
}

/// Chart dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarChart {
    pub radius: f64,
    pub max_value: u8,
}

impl Default for RadarChart {
    fn default() -> Self {
        Self {
            radius: 1.0,
            max_value: MAX_INTENSITY,
        }
    }
}

impl RadarChart {
    pub fn new(radius: f64, max_value: u8) -> Self {
        Self { radius, max_value }
    }

    /// Lays out `values` in the given order.
    ///
    /// Values above `max_value` are drawn on the outer edge. Tags are matched
    /// to axes by `category == label`. Empty `values` yield an empty layout.
    pub fn layout(&self, values: &[(String, u8)], tags: &[AromaTag]) -> RadarLayout {
        if values.is_empty() {
            return RadarLayout::default();
        }

        let max = self.max_value.max(1);
        let step = TAU / values.len() as f64;

        let axes = values
            .iter()
            .enumerate()
            .map(|(i, (label, _))| {
                let angle = i as f64 * step - FRAC_PI_2;
                Axis {
                    label: label.clone(),
                    angle,
                    end: Point::polar(self.radius, angle),
                    label_anchor: Point::polar(self.radius * LABEL_DISTANCE, angle),
                    annotation: annotation_for(label, tags),
                }
            })
            .collect::<Vec<_>>();

        let rings = (1..=max)
            .step_by(2)
            .map(|level| Ring {
                level,
                radius: self.radius * f64::from(level) / f64::from(max),
            })
            .collect();

        let polygon = axes
            .iter()
            .zip(values)
            .map(|(axis, (_, value))| {
                let distance = if *value == 0 {
                    self.radius * ZERO_EPSILON
                } else {
                    self.radius * f64::from((*value).min(max)) / f64::from(max)
                };
                Point::polar(distance, axis.angle)
            })
            .collect::<Vec<_>>();

        RadarLayout {
            markers: polygon.clone(),
            axes,
            rings,
            polygon,
        }
    }
}

fn annotation_for(category: &str, tags: &[AromaTag]) -> Option<String> {
    let names: Vec<&str> = tags
        .iter()
        .filter(|tag| tag.category == category)
        .map(|tag| tag.name.as_str())
        .collect();

    (!names.is_empty()).then(|| names.join(", "))
}
