//! Plain geometry values produced by the extractor
//!
//! This module provides:
//! - 2-D points and axis-aligned bounding boxes
//! - The machine work envelope
//! - Polyline, circle and text records, each tagged with the entity order
//!   index and layer of the document entity it came from
//!
//! All values are library independent: nothing here holds a handle into
//! the CAD reader, so records outlive the document they were read from.
//! All linear values are millimeters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2-D point in drawing coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.iter().skip(1).fold(init, |bbox, p| Self {
            min_x: bbox.min_x.min(p.x),
            min_y: bbox.min_y.min(p.y),
            max_x: bbox.max_x.max(p.x),
            max_y: bbox.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Rectangular work area of the machine, anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkEnvelope {
    /// Maximum reachable X (mm)
    pub max_x: f64,
    /// Maximum reachable Y (mm)
    pub max_y: f64,
}

/// Work area of the panel-cutting machine: 2500 x 3000 mm
pub const MACHINE_ENVELOPE: WorkEnvelope = WorkEnvelope {
    max_x: 2500.0,
    max_y: 3000.0,
};

impl WorkEnvelope {
    /// Inclusive containment: `0 <= x <= max_x` and `0 <= y <= max_y`
    pub fn contains(&self, point: Point2) -> bool {
        (0.0..=self.max_x).contains(&point.x) && (0.0..=self.max_y).contains(&point.y)
    }
}

impl Default for WorkEnvelope {
    fn default() -> Self {
        MACHINE_ENVELOPE
    }
}

/// Ordered chain of straight segments, optionally closed into a loop
///
/// Deserialization goes through [`Polyline::new`], so the point list is
/// never empty and the stored bounding box always matches the points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolylineFields")]
pub struct Polyline {
    points: Vec<Point2>,
    closed: bool,
    bounding_box: BoundingBox,
}

#[derive(Deserialize)]
struct PolylineFields {
    points: Vec<Point2>,
    closed: bool,
}

impl TryFrom<PolylineFields> for Polyline {
    type Error = String;

    fn try_from(fields: PolylineFields) -> Result<Self, Self::Error> {
        Polyline::new(fields.points, fields.closed)
            .ok_or_else(|| "polyline must have at least one point".to_string())
    }
}

impl Polyline {
    /// Create a polyline; returns `None` when `points` is empty
    pub fn new(points: Vec<Point2>, closed: bool) -> Option<Self> {
        let bounding_box = BoundingBox::from_points(&points)?;
        Some(Self {
            points,
            closed,
            bounding_box,
        })
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Copy of this polyline keeping only the points inside `envelope`,
    /// with the bounding box recomputed from what remains
    pub fn clipped_to(&self, envelope: &WorkEnvelope) -> Option<Self> {
        let kept: Vec<Point2> = self
            .points
            .iter()
            .copied()
            .filter(|p| envelope.contains(*p))
            .collect();
        Self::new(kept, self.closed)
    }
}

/// Circle given by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Text annotation; carried through extraction but never machined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub insertion: Point2,
    pub text: String,
}

/// Geometric payload of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    Polyline(Polyline),
    Circle(Circle),
    TextLabel(TextLabel),
}

/// One drawable entity extracted from a CAD document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricRecord {
    /// Position of the source entity in the document's entity sequence
    pub entity_index: usize,
    /// Layer of the source entity (informational only)
    pub layer: String,
    pub kind: RecordKind,
}

impl GeometricRecord {
    pub fn new(entity_index: usize, layer: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            entity_index,
            layer: layer.into(),
            kind,
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match &self.kind {
            RecordKind::Polyline(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match &self.kind {
            RecordKind::Circle(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLabel> {
        match &self.kind {
            RecordKind::TextLabel(t) => Some(t),
            _ => None,
        }
    }
}
