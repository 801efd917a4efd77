//! Geometry extraction
//!
//! Walks the model-space entities of a parsed DXF document and turns the
//! drawable ones into plain [`GeometricRecord`] values:
//!
//! - `LWPOLYLINE` and `POLYLINE` → polyline (closed flag preserved)
//! - `CIRCLE` → circle
//! - `TEXT` and `MTEXT` → text label
//!
//! Every other entity kind is skipped. Records keep the document's entity
//! order and carry the entity's index and layer.

use crate::document::CadDocument;
use dxf::entities::{Entity, EntityType};
use panelcam_core::geometry::{Circle, GeometricRecord, Point2, Polyline, RecordKind, TextLabel};
use panelcam_core::ExtractionError;
use tracing::{debug, trace};

/// Lazily convert the document's entities into records
///
/// The iterator yields an error for the first corrupt entity it meets;
/// callers that collect into `Result<Vec<_>, _>` stop there.
pub fn records(
    document: &CadDocument,
) -> impl Iterator<Item = Result<GeometricRecord, ExtractionError>> + '_ {
    document
        .model_space_entities()
        .enumerate()
        .filter_map(|(index, entity)| convert_entity(index, entity).transpose())
}

/// Extract every drawable record of the document, in document order
pub fn extract(document: &CadDocument) -> Result<Vec<GeometricRecord>, ExtractionError> {
    let records = records(document).collect::<Result<Vec<_>, _>>()?;
    debug!(
        source = %document.source_id(),
        records = records.len(),
        "Extracted geometry"
    );
    Ok(records)
}

fn dxf_point(x: f64, y: f64, entity_index: usize, kind: &str) -> Result<Point2, ExtractionError> {
    let point = Point2::new(x, y);
    if point.is_finite() {
        Ok(point)
    } else {
        Err(ExtractionError::NonFiniteCoordinate {
            entity_index,
            kind: kind.to_string(),
        })
    }
}

fn polyline_record(
    index: usize,
    points: Vec<Point2>,
    closed: bool,
) -> Result<RecordKind, ExtractionError> {
    Polyline::new(points, closed)
        .map(RecordKind::Polyline)
        .ok_or(ExtractionError::EmptyPolyline {
            entity_index: index,
        })
}

/// Convert one entity; `Ok(None)` means the kind is not drawable here
fn convert_entity(
    index: usize,
    entity: &Entity,
) -> Result<Option<GeometricRecord>, ExtractionError> {
    let kind = match &entity.specific {
        EntityType::LwPolyline(lwpoly) => {
            let points = lwpoly
                .vertices
                .iter()
                .map(|v| dxf_point(v.x, v.y, index, "LWPOLYLINE"))
                .collect::<Result<Vec<_>, _>>()?;
            polyline_record(index, points, lwpoly.is_closed())?
        }
        EntityType::Polyline(poly) => {
            let points = poly
                .vertices()
                .map(|v| dxf_point(v.location.x, v.location.y, index, "POLYLINE"))
                .collect::<Result<Vec<_>, _>>()?;
            polyline_record(index, points, poly.is_closed())?
        }
        EntityType::Circle(circle) => {
            let center = dxf_point(circle.center.x, circle.center.y, index, "CIRCLE")?;
            if !circle.radius.is_finite() {
                return Err(ExtractionError::NonFiniteCoordinate {
                    entity_index: index,
                    kind: "CIRCLE".to_string(),
                });
            }
            RecordKind::Circle(Circle::new(center, circle.radius))
        }
        EntityType::Text(text) => RecordKind::TextLabel(TextLabel {
            insertion: dxf_point(text.location.x, text.location.y, index, "TEXT")?,
            text: text.value.clone(),
        }),
        EntityType::MText(mtext) => RecordKind::TextLabel(TextLabel {
            insertion: dxf_point(
                mtext.insertion_point.x,
                mtext.insertion_point.y,
                index,
                "MTEXT",
            )?,
            text: mtext.text.clone(),
        }),
        _ => {
            trace!(
                entity_index = index,
                layer = %entity.common.layer,
                "Skipping unsupported entity"
            );
            return Ok(None);
        }
    };

    Ok(Some(GeometricRecord::new(
        index,
        entity.common.layer.clone(),
        kind,
    )))
}
