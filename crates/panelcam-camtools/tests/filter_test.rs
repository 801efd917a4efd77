use panelcam_camtools::filter::{filter, GeometryFilter, MAX_CIRCLES, MAX_POLYLINES};
use panelcam_core::geometry::{
    Circle, GeometricRecord, Point2, Polyline, RecordKind, TextLabel, WorkEnvelope,
};

fn rect(index: usize, x: f64, y: f64, width: f64, height: f64) -> GeometricRecord {
    let points = vec![
        Point2::new(x, y),
        Point2::new(x + width, y),
        Point2::new(x + width, y + height),
        Point2::new(x, y + height),
    ];
    GeometricRecord::new(
        index,
        "0",
        RecordKind::Polyline(Polyline::new(points, true).unwrap()),
    )
}

fn hole(index: usize, x: f64, y: f64, radius: f64) -> GeometricRecord {
    GeometricRecord::new(
        index,
        "0",
        RecordKind::Circle(Circle::new(Point2::new(x, y), radius)),
    )
}

#[test]
fn test_sheet_outline_is_excluded() {
    let set = filter(&[rect(0, 0.0, 0.0, 1500.0, 2500.0), rect(1, 100.0, 100.0, 400.0, 600.0)]);
    assert_eq!(set.polylines().len(), 1);
    assert_eq!(set.polylines()[0].points()[0], Point2::new(100.0, 100.0));
}

#[test]
fn test_wide_but_short_panel_is_kept() {
    // Sheet-sized needs both dimensions over the limit
    let set = filter(&[rect(0, 0.0, 0.0, 1500.0, 1800.0)]);
    assert_eq!(set.polylines().len(), 1);
}

#[test]
fn test_small_parts_are_rejected() {
    let set = filter(&[
        rect(0, 0.0, 0.0, 30.0, 30.0),
        rect(1, 0.0, 0.0, 50.0, 200.0),
        rect(2, 0.0, 0.0, 200.0, 50.0),
    ]);
    assert!(set.polylines().is_empty());
}

#[test]
fn test_open_two_point_polyline_is_rejected() {
    let line = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(500.0, 500.0)], false)
        .unwrap();
    let set = filter(&[GeometricRecord::new(0, "0", RecordKind::Polyline(line))]);
    assert!(set.is_empty());
}

#[test]
fn test_out_of_envelope_points_are_dropped() {
    // One corner sits outside; three in-envelope points remain
    let points = vec![
        Point2::new(100.0, 100.0),
        Point2::new(400.0, 100.0),
        Point2::new(400.0, 3500.0),
        Point2::new(100.0, 400.0),
    ];
    let record = GeometricRecord::new(
        0,
        "0",
        RecordKind::Polyline(Polyline::new(points, true).unwrap()),
    );

    let set = filter(&[record]);
    assert_eq!(set.polylines().len(), 1);
    let kept = &set.polylines()[0];
    assert_eq!(kept.points().len(), 3);
    assert!(kept.is_closed());
}

#[test]
fn test_polyline_mostly_outside_is_rejected() {
    let set = filter(&[rect(0, 2400.0, 2900.0, 500.0, 500.0)]);
    assert!(set.polylines().is_empty());
}

#[test]
fn test_circle_rules() {
    let set = filter(&[
        hole(0, 100.0, 100.0, 4.9),
        hole(1, 100.0, 100.0, 5.0),
        hole(2, 100.0, 100.0, 50.0),
        hole(3, 100.0, 100.0, 50.1),
        hole(4, -1.0, 100.0, 10.0),
        hole(5, 2500.0, 3000.0, 10.0),
    ]);
    let radii: Vec<f64> = set.circles().iter().map(|c| c.radius).collect();
    assert_eq!(radii, vec![5.0, 50.0, 10.0]);
}

#[test]
fn test_first_four_circles_win() {
    let records: Vec<_> = (0..5)
        .map(|i| hole(i, 100.0 * (i + 1) as f64, 100.0, 10.0))
        .collect();
    let set = filter(&records);

    assert_eq!(set.circles().len(), MAX_CIRCLES);
    let xs: Vec<f64> = set.circles().iter().map(|c| c.center.x).collect();
    assert_eq!(xs, vec![100.0, 200.0, 300.0, 400.0]);
}

#[test]
fn test_polyline_cap_takes_document_order_not_size() {
    let set = filter(&[
        rect(0, 0.0, 0.0, 60.0, 60.0),
        rect(1, 0.0, 0.0, 100.0, 100.0),
        rect(2, 0.0, 0.0, 900.0, 900.0),
    ]);
    assert_eq!(set.polylines().len(), MAX_POLYLINES);
    assert_eq!(set.polylines()[0].bounding_box().width(), 60.0);
    assert_eq!(set.polylines()[1].bounding_box().width(), 100.0);
}

#[test]
fn test_text_is_never_machined() {
    let label = GeometricRecord::new(
        0,
        "TEXT",
        RecordKind::TextLabel(TextLabel {
            insertion: Point2::new(10.0, 10.0),
            text: "A".to_string(),
        }),
    );
    assert!(filter(&[label]).is_empty());
}

#[test]
fn test_custom_envelope() {
    let filter = GeometryFilter::with_envelope(WorkEnvelope {
        max_x: 500.0,
        max_y: 500.0,
    });
    let set = filter.apply(&[hole(0, 400.0, 400.0, 10.0), hole(1, 600.0, 400.0, 10.0)]);
    assert_eq!(set.circles().len(), 1);
}
