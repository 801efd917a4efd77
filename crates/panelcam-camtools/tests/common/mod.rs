#![allow(dead_code)]

use dxf::entities::{Circle, Entity, EntityType, LwPolyline, MText, Text};
use dxf::enums::AcadVersion;
use dxf::{Drawing, LwPolylineVertex, Point};
use std::path::Path;

pub fn circle(x: f64, y: f64, radius: f64) -> Entity {
    let mut circle = Circle::default();
    circle.center = Point::new(x, y, 0.0);
    circle.radius = radius;
    Entity::new(EntityType::Circle(circle))
}

pub fn lwpolyline(points: &[(f64, f64)], closed: bool) -> Entity {
    let mut lwpoly = LwPolyline::default();
    lwpoly.set_is_closed(closed);
    lwpoly.vertices = points
        .iter()
        .map(|&(x, y)| {
            let mut vertex = LwPolylineVertex::default();
            vertex.x = x;
            vertex.y = y;
            vertex
        })
        .collect();
    Entity::new(EntityType::LwPolyline(lwpoly))
}

pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Entity {
    lwpolyline(
        &[(x, y), (x + width, y), (x + width, y + height), (x, y + height)],
        true,
    )
}

pub fn text(x: f64, y: f64, value: &str) -> Entity {
    let mut text = Text::default();
    text.location = Point::new(x, y, 0.0);
    text.value = value.to_string();
    Entity::new(EntityType::Text(text))
}

pub fn mtext(x: f64, y: f64, value: &str) -> Entity {
    let mut mtext = MText::default();
    mtext.insertion_point = Point::new(x, y, 0.0);
    mtext.text = value.to_string();
    Entity::new(EntityType::MText(mtext))
}

pub fn in_paper_space(mut entity: Entity) -> Entity {
    entity.common.is_in_paper_space = true;
    entity
}

pub fn on_layer(mut entity: Entity, layer: &str) -> Entity {
    entity.common.layer = layer.to_string();
    entity
}

pub fn drawing(entities: Vec<Entity>) -> Drawing {
    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2000;
    for entity in entities {
        drawing.add_entity(entity);
    }
    drawing
}

pub fn save_drawing(path: &Path, entities: Vec<Entity>) {
    drawing(entities).save_file(path).unwrap();
}
