//! Build recipes: the fixed sketch-then-feature sequence for each shape.
//!
//! A [`ShapeRecipe`] is pure data. It says which entities go into the
//! profile sketch, which feature (if any) turns the sketch into a solid,
//! how far above the current stack height the sketch plane sits and how
//! much the stack grows afterwards. The session replays a recipe against
//! a [`crate::cad::CadHost`].

pub mod entities;

use serde::Serialize;

pub use entities::{ArcDirection, Point, SketchEntity};

use crate::prompt::{ParsedShape, Shape};
use crate::units::format_mm;
use entities::{closed_polyline, polygon_vertices, star_vertices};

/// Upper bound on star points; larger requests are clamped.
pub const MAX_STAR_POINTS: u32 = 360;

/// The feature that turns a closed sketch into a solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Feature {
    /// Blind extrusion normal to the sketch plane.
    Extrude {
        /// Extrusion depth (m).
        depth: f64,
    },
    /// Full 360° revolve about a construction line of the sketch.
    Revolve {
        /// Index of the axis entity within the recipe's entities.
        axis: usize,
    },
}

/// Everything needed to build one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeRecipe {
    /// Human-readable description, e.g. `Cylinder (r=10.0mm, h=20.0mm)`.
    pub label: String,
    /// Profile sketch contents.
    pub entities: Vec<SketchEntity>,
    /// Solid feature, or `None` for a sketch-only shape.
    pub feature: Option<Feature>,
    /// Sketch plane offset above the current stack height (m).
    pub sketch_offset: f64,
    /// Amount the stack height grows once the shape is built (m).
    pub advance: f64,
    /// Always start a fresh document, even while stacking.
    pub new_document: bool,
}

impl ShapeRecipe {
    fn solid(label: String, entities: Vec<SketchEntity>, depth: f64) -> Self {
        Self {
            label,
            entities,
            feature: Some(Feature::Extrude { depth }),
            sketch_offset: 0.0,
            advance: depth,
            new_document: false,
        }
    }

    fn sketch(label: String, entities: Vec<SketchEntity>) -> Self {
        Self {
            label,
            entities,
            feature: None,
            sketch_offset: 0.0,
            advance: 0.0,
            new_document: true,
        }
    }

    /// Whether this recipe only produces a sketch.
    #[must_use]
    pub const fn is_sketch_only(&self) -> bool {
        self.feature.is_none()
    }
}

/// Builds the recipe for a parsed shape.
#[must_use]
pub fn recipe_for_parsed(parsed: &ParsedShape) -> ShapeRecipe {
    recipe_for(&parsed.shape, parsed.is_2d)
}

/// Builds the recipe for `shape`.
///
/// `is_2d` is honoured by the shapes that have both a flat and a solid
/// form (regular polygons, triangle, ellipse, star). Circle, square and
/// rectangle are always sketches; slot, washer, L-shape and cross are
/// always extruded.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn recipe_for(shape: &Shape, is_2d: bool) -> ShapeRecipe {
    match *shape {
        Shape::Cylinder { radius, height } => ShapeRecipe::solid(
            format!("Cylinder (r={}mm, h={}mm)", format_mm(radius), format_mm(height)),
            vec![circle(radius)],
            height,
        ),
        Shape::Cube { size } => box_recipe("Cube", size, size, size),
        Shape::Box {
            width,
            height,
            depth,
        } => box_recipe("Box", width, height, depth),
        Shape::Hexagon { radius, height } => polygon_recipe("Hexagon", 6, radius, height, is_2d),
        Shape::Pentagon { radius, height } => polygon_recipe("Pentagon", 5, radius, height, is_2d),
        Shape::Octagon { radius, height } => polygon_recipe("Octagon", 8, radius, height, is_2d),
        Shape::Triangle {
            base,
            tri_height,
            depth,
        } => {
            let hb = base / 2.0;
            let entities = vec![
                SketchEntity::line(-hb, 0.0, hb, 0.0),
                SketchEntity::line(hb, 0.0, 0.0, tri_height),
                SketchEntity::line(0.0, tri_height, -hb, 0.0),
            ];
            if is_2d {
                ShapeRecipe::sketch(format!("Triangle 2D (base={}mm)", format_mm(base)), entities)
            } else {
                ShapeRecipe::solid(
                    format!("Triangle Prism (base={}mm)", format_mm(base)),
                    entities,
                    depth,
                )
            }
        }
        Shape::Ellipse {
            major,
            minor,
            height,
        } => {
            let entities = vec![SketchEntity::Ellipse {
                centre: Point::default(),
                semi_major: major / 2.0,
                semi_minor: minor / 2.0,
            }];
            let axes = format!("{}x{}mm", format_mm(major), format_mm(minor));
            if is_2d {
                ShapeRecipe::sketch(format!("Ellipse 2D ({axes})"), entities)
            } else {
                ShapeRecipe::solid(
                    format!("Ellipse ({axes}, h={}mm)", format_mm(height)),
                    entities,
                    height,
                )
            }
        }
        Shape::Circle { radius } => ShapeRecipe::sketch(
            format!("Circle 2D (r={}mm)", format_mm(radius)),
            vec![circle(radius)],
        ),
        Shape::Square { size } => ShapeRecipe::sketch(
            format!("Square 2D ({}mm)", format_mm(size)),
            centred_rectangle(size, size),
        ),
        Shape::Rectangle { width, length } => ShapeRecipe::sketch(
            format!("Rectangle 2D ({}x{}mm)", format_mm(width), format_mm(length)),
            centred_rectangle(width, length),
        ),
        Shape::Slot {
            length,
            width,
            height,
        } => ShapeRecipe::solid(
            format!("Slot ({}x{}mm)", format_mm(length), format_mm(width)),
            slot_outline(length, width),
            height,
        ),
        Shape::Washer {
            outer,
            inner,
            height,
        } => ShapeRecipe::solid(
            format!("Washer (OD={}mm, ID={}mm)", format_mm(outer), format_mm(inner)),
            vec![circle(outer / 2.0), circle(inner / 2.0)],
            height,
        ),
        Shape::LShape {
            width,
            length,
            thickness,
            depth,
        } => {
            let t = thickness;
            let outline = [
                Point::new(0.0, 0.0),
                Point::new(width, 0.0),
                Point::new(width, t),
                Point::new(t, t),
                Point::new(t, length),
                Point::new(0.0, length),
            ];
            ShapeRecipe::solid(
                format!("L-Shape ({}x{}mm)", format_mm(width), format_mm(length)),
                closed_polyline(&outline),
                depth,
            )
        }
        Shape::Cross {
            size,
            thickness,
            depth,
        } => {
            let (hs, ht) = (size / 2.0, thickness / 2.0);
            let outline = [
                Point::new(-ht, hs),
                Point::new(ht, hs),
                Point::new(ht, ht),
                Point::new(hs, ht),
                Point::new(hs, -ht),
                Point::new(ht, -ht),
                Point::new(ht, -hs),
                Point::new(-ht, -hs),
                Point::new(-ht, -ht),
                Point::new(-hs, -ht),
                Point::new(-hs, ht),
                Point::new(-ht, ht),
            ];
            ShapeRecipe::solid(
                format!("Cross ({}mm)", format_mm(size)),
                closed_polyline(&outline),
                depth,
            )
        }
        Shape::Star {
            outer,
            inner,
            points,
            height,
        } => {
            let points = if points > MAX_STAR_POINTS {
                tracing::warn!(points, max = MAX_STAR_POINTS, "Clamping star point count");
                MAX_STAR_POINTS
            } else {
                points
            };
            let entities = closed_polyline(&star_vertices(Point::default(), outer, inner, points));
            if is_2d {
                ShapeRecipe::sketch(
                    format!("{points}-Point Star 2D (r={}mm)", format_mm(outer)),
                    entities,
                )
            } else {
                ShapeRecipe::solid(
                    format!("{points}-Point Star (r={}mm)", format_mm(outer)),
                    entities,
                    height,
                )
            }
        }
    }
}

/// Recipe for a sphere: a semicircle revolved about its diameter.
///
/// The sketch plane sits at the sphere's centre so the sphere rests on the
/// current stack height.
#[must_use]
pub fn sphere_recipe(radius: f64) -> ShapeRecipe {
    ShapeRecipe {
        label: format!("Sphere (r={}mm)", format_mm(radius)),
        entities: vec![
            SketchEntity::ThreePointArc {
                start: Point::new(0.0, radius),
                mid: Point::new(radius, 0.0),
                end: Point::new(0.0, -radius),
            },
            SketchEntity::CentreLine {
                start: Point::new(0.0, -radius),
                end: Point::new(0.0, radius),
            },
        ],
        feature: Some(Feature::Revolve { axis: 1 }),
        sketch_offset: radius,
        advance: 2.0 * radius,
        new_document: false,
    }
}

fn circle(radius: f64) -> SketchEntity {
    SketchEntity::Circle {
        centre: Point::default(),
        radius,
    }
}

/// Axis-aligned rectangle centred on the origin.
fn centred_rectangle(width: f64, length: f64) -> Vec<SketchEntity> {
    let (hw, hl) = (width / 2.0, length / 2.0);
    closed_polyline(&[
        Point::new(-hw, -hl),
        Point::new(hw, -hl),
        Point::new(hw, hl),
        Point::new(-hw, hl),
    ])
}

/// The footprint is `width` × `depth`; `height` is the extrusion.
fn box_recipe(name: &str, width: f64, height: f64, depth: f64) -> ShapeRecipe {
    ShapeRecipe::solid(
        format!(
            "{name} ({}x{}x{}mm)",
            format_mm(width),
            format_mm(height),
            format_mm(depth)
        ),
        centred_rectangle(width, depth),
        height,
    )
}

fn polygon_recipe(name: &str, sides: u32, radius: f64, height: f64, is_2d: bool) -> ShapeRecipe {
    let entities = closed_polyline(&polygon_vertices(Point::default(), radius, sides));
    if is_2d {
        ShapeRecipe::sketch(format!("{name} 2D (r={}mm)", format_mm(radius)), entities)
    } else {
        ShapeRecipe::solid(
            format!("{name} (r={}mm, h={}mm)", format_mm(radius), format_mm(height)),
            entities,
            height,
        )
    }
}

/// Stadium outline: two straight sides joined by semicircular ends.
fn slot_outline(length: f64, width: f64) -> Vec<SketchEntity> {
    let r = width / 2.0;
    let half = (length - width) / 2.0;
    vec![
        SketchEntity::line(-half, r, half, r),
        SketchEntity::Arc {
            centre: Point::new(half, 0.0),
            start: Point::new(half, r),
            end: Point::new(half, -r),
            direction: ArcDirection::Clockwise,
        },
        SketchEntity::line(half, -r, -half, -r),
        SketchEntity::Arc {
            centre: Point::new(-half, 0.0),
            start: Point::new(-half, -r),
            end: Point::new(-half, r),
            direction: ArcDirection::Clockwise,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_label_and_feature() {
        let recipe = recipe_for(
            &Shape::Cylinder {
                radius: 0.01,
                height: 0.02,
            },
            false,
        );
        assert_eq!(recipe.label, "Cylinder (r=10.0mm, h=20.0mm)");
        assert_eq!(recipe.feature, Some(Feature::Extrude { depth: 0.02 }));
        assert!((recipe.advance - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn cube_is_a_box_named_cube() {
        let recipe = recipe_for(&Shape::Cube { size: 0.02 }, false);
        assert_eq!(recipe.label, "Cube (20.0x20.0x20.0mm)");
        assert_eq!(recipe.entities.len(), 4);
    }

    #[test]
    fn polygons_honour_2d_flag() {
        let shape = Shape::Hexagon {
            radius: 0.01,
            height: 0.005,
        };
        let solid = recipe_for(&shape, false);
        let flat = recipe_for(&shape, true);
        assert_eq!(solid.label, "Hexagon (r=10.0mm, h=5.0mm)");
        assert_eq!(flat.label, "Hexagon 2D (r=10.0mm)");
        assert_eq!(flat.entities.len(), 6);
        assert!(flat.is_sketch_only());
        assert!(flat.new_document);
        assert!(!solid.new_document);
        assert!((flat.advance).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_only_shapes_ignore_2d_flag() {
        let recipe = recipe_for(&Shape::Circle { radius: 0.01 }, false);
        assert!(recipe.is_sketch_only());
        assert_eq!(recipe.label, "Circle 2D (r=10.0mm)");

        let recipe = recipe_for(
            &Shape::Rectangle {
                width: 0.02,
                length: 0.01,
            },
            false,
        );
        assert_eq!(recipe.label, "Rectangle 2D (20.0x10.0mm)");
    }

    #[test]
    fn washer_is_always_extruded() {
        let recipe = recipe_for(
            &Shape::Washer {
                outer: 0.02,
                inner: 0.01,
                height: 0.005,
            },
            true,
        );
        assert!(!recipe.is_sketch_only());
        assert_eq!(recipe.label, "Washer (OD=20.0mm, ID=10.0mm)");
        assert_eq!(recipe.entities.len(), 2);
    }

    #[test]
    fn outline_entity_counts() {
        let l_shape = recipe_for(
            &Shape::LShape {
                width: 0.02,
                length: 0.02,
                thickness: 0.003,
                depth: 0.01,
            },
            false,
        );
        assert_eq!(l_shape.entities.len(), 6);

        let cross = recipe_for(
            &Shape::Cross {
                size: 0.02,
                thickness: 0.005,
                depth: 0.005,
            },
            false,
        );
        assert_eq!(cross.entities.len(), 12);

        let slot = recipe_for(
            &Shape::Slot {
                length: 0.03,
                width: 0.01,
                height: 0.005,
            },
            false,
        );
        assert_eq!(slot.entities.len(), 4);
        assert_eq!(slot.label, "Slot (30.0x10.0mm)");
    }

    #[test]
    fn outlines_are_closed() {
        let recipe = recipe_for(
            &Shape::Cross {
                size: 0.02,
                thickness: 0.005,
                depth: 0.005,
            },
            false,
        );
        let ends: Vec<_> = recipe
            .entities
            .iter()
            .map(|e| match *e {
                SketchEntity::Line { start, end } => (start, end),
                _ => panic!("cross is made of lines"),
            })
            .collect();
        for (i, (_, end)) in ends.iter().enumerate() {
            let (next_start, _) = ends[(i + 1) % ends.len()];
            assert_eq!(*end, next_start);
        }
    }

    #[test]
    fn star_label_uses_point_count() {
        let shape = Shape::Star {
            outer: 0.02,
            inner: 0.008,
            points: 6,
            height: 0.005,
        };
        assert_eq!(recipe_for(&shape, false).label, "6-Point Star (r=20.0mm)");
        assert_eq!(recipe_for(&shape, true).label, "6-Point Star 2D (r=20.0mm)");
        assert_eq!(recipe_for(&shape, false).entities.len(), 12);
    }

    #[test]
    fn star_points_are_clamped() {
        let shape = Shape::Star {
            outer: 0.02,
            inner: 0.008,
            points: 3_000_000_000,
            height: 0.005,
        };
        let recipe = recipe_for(&shape, false);
        assert_eq!(recipe.entities.len(), (MAX_STAR_POINTS * 2) as usize);
    }

    #[test]
    fn sphere_sits_on_stack() {
        let recipe = sphere_recipe(0.01);
        assert_eq!(recipe.label, "Sphere (r=10.0mm)");
        assert!((recipe.sketch_offset - 0.01).abs() < f64::EPSILON);
        assert!((recipe.advance - 0.02).abs() < f64::EPSILON);
        assert_eq!(recipe.feature, Some(Feature::Revolve { axis: 1 }));
        assert!(recipe.entities[1].is_construction());
    }

    #[test]
    fn recipe_for_parsed_uses_flag() {
        let parsed = crate::prompt::parse("2d hexagon radius 10").unwrap();
        assert!(recipe_for_parsed(&parsed).is_sketch_only());
    }
}
