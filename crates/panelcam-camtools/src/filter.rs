//! Geometry filter
//!
//! Selects the bounded working set of machinable shapes from the
//! extracted records in a single forward pass.
//!
//! A polyline is machinable when, after dropping its points outside the
//! work envelope, it still has at least 3 points and its bounding box is
//! larger than 50 x 50 mm without being sheet-sized (wider than 1000 mm
//! and taller than 2000 mm at once; those are full-panel outlines).
//! A circle is machinable when its center lies in the envelope and its
//! radius is a drill-compatible 5..=50 mm.
//!
//! The first 2 machinable polylines and the first 4 machinable circles in
//! document order are kept. Selection is a prefix, not a ranking.

use panelcam_core::geometry::{
    BoundingBox, Circle, GeometricRecord, Polyline, RecordKind, WorkEnvelope, MACHINE_ENVELOPE,
};
use serde::Serialize;
use tracing::debug;

/// Maximum number of polylines in a machining set
pub const MAX_POLYLINES: usize = 2;
/// Maximum number of circles in a machining set
pub const MAX_CIRCLES: usize = 4;
/// Minimum number of in-envelope points of a machinable polyline
pub const MIN_POLYLINE_POINTS: usize = 3;
/// Parts must be strictly larger than this in both directions (mm)
pub const MIN_PART_SIZE: f64 = 50.0;
/// Width above which (together with height) a box is sheet-sized (mm)
pub const SHEET_MIN_WIDTH: f64 = 1000.0;
/// Height above which (together with width) a box is sheet-sized (mm)
pub const SHEET_MIN_HEIGHT: f64 = 2000.0;
/// Smallest drillable hole radius (mm)
pub const MIN_HOLE_RADIUS: f64 = 5.0;
/// Largest drillable hole radius (mm)
pub const MAX_HOLE_RADIUS: f64 = 50.0;

/// Validated, bounded subset of geometry accepted for machining
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MachiningSet {
    polylines: Vec<Polyline>,
    circles: Vec<Circle>,
}

impl MachiningSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a polyline unless the polyline cap is reached
    pub fn try_add_polyline(&mut self, polyline: Polyline) -> bool {
        if self.polylines.len() >= MAX_POLYLINES {
            return false;
        }
        self.polylines.push(polyline);
        true
    }

    /// Append a circle unless the circle cap is reached
    pub fn try_add_circle(&mut self, circle: Circle) -> bool {
        if self.circles.len() >= MAX_CIRCLES {
            return false;
        }
        self.circles.push(circle);
        true
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty() && self.circles.is_empty()
    }
}

/// Full-panel outline rather than a part
pub fn is_sheet_sized(bbox: &BoundingBox) -> bool {
    bbox.width() > SHEET_MIN_WIDTH && bbox.height() > SHEET_MIN_HEIGHT
}

/// Larger than the minimum part size in both directions
pub fn exceeds_min_part_size(bbox: &BoundingBox) -> bool {
    bbox.width() > MIN_PART_SIZE && bbox.height() > MIN_PART_SIZE
}

/// Hole radius a drill bit can make
pub fn is_drillable_radius(radius: f64) -> bool {
    (MIN_HOLE_RADIUS..=MAX_HOLE_RADIUS).contains(&radius)
}

/// Single-pass filter over extracted records
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryFilter {
    envelope: WorkEnvelope,
}

impl GeometryFilter {
    /// Filter against the machine's work envelope
    pub fn new() -> Self {
        Self {
            envelope: MACHINE_ENVELOPE,
        }
    }

    /// Filter against a custom work envelope
    pub fn with_envelope(envelope: WorkEnvelope) -> Self {
        Self { envelope }
    }

    /// In-envelope part of `polyline`, if that part is machinable
    pub fn machinable_polyline(&self, polyline: &Polyline) -> Option<Polyline> {
        let clipped = polyline.clipped_to(&self.envelope)?;
        if clipped.points().len() < MIN_POLYLINE_POINTS {
            return None;
        }
        let bbox = clipped.bounding_box();
        if is_sheet_sized(&bbox) || !exceeds_min_part_size(&bbox) {
            return None;
        }
        Some(clipped)
    }

    pub fn is_machinable_circle(&self, circle: &Circle) -> bool {
        self.envelope.contains(circle.center) && is_drillable_radius(circle.radius)
    }

    /// Build the machining set from records in document order
    pub fn apply(&self, records: &[GeometricRecord]) -> MachiningSet {
        let mut set = MachiningSet::new();

        for record in records {
            match &record.kind {
                RecordKind::Polyline(polyline) => match self.machinable_polyline(polyline) {
                    Some(part) => {
                        if !set.try_add_polyline(part) {
                            debug!(entity_index = record.entity_index, "Polyline cap reached");
                        }
                    }
                    None => debug!(
                        entity_index = record.entity_index,
                        layer = %record.layer,
                        "Rejected polyline"
                    ),
                },
                RecordKind::Circle(circle) => {
                    if !self.is_machinable_circle(circle) {
                        debug!(
                            entity_index = record.entity_index,
                            radius = circle.radius,
                            "Rejected circle"
                        );
                    } else if !set.try_add_circle(*circle) {
                        debug!(entity_index = record.entity_index, "Circle cap reached");
                    }
                }
                RecordKind::TextLabel(_) => {}
            }
        }

        set
    }
}

/// Filter records against the machine envelope
pub fn filter(records: &[GeometricRecord]) -> MachiningSet {
    GeometryFilter::new().apply(records)
}
