//! Parsed shape types.
//!
//! [`Shape`] is a closed sum type: every kind carries exactly the fields it
//! needs, in meters. The string-keyed view used by JSON clients is derived
//! from it via [`Shape::parameters`].

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::units::UnitSystem;

/// The closed set of shape kinds the interpreter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Extruded circle.
    Cylinder,
    /// Equal-sided box.
    Cube,
    /// Rectangular prism.
    Box,
    /// Six-sided regular polygon.
    Hexagon,
    /// Isosceles triangle.
    Triangle,
    /// Five-sided regular polygon.
    Pentagon,
    /// Eight-sided regular polygon.
    Octagon,
    /// Ellipse given by its axis lengths.
    Ellipse,
    /// Flat circle.
    Circle,
    /// Flat square.
    Square,
    /// Flat rectangle.
    Rectangle,
    /// Stadium-shaped slot.
    Slot,
    /// Annulus.
    Washer,
    /// L-shaped bracket profile.
    LShape,
    /// Plus-shaped profile.
    Cross,
    /// Star polygon.
    Star,
}

impl ShapeKind {
    /// All kinds, in classification priority order.
    pub const ALL: [Self; 16] = [
        Self::Cylinder,
        Self::Cube,
        Self::Box,
        Self::Hexagon,
        Self::Triangle,
        Self::Pentagon,
        Self::Octagon,
        Self::Ellipse,
        Self::Circle,
        Self::Square,
        Self::Rectangle,
        Self::Slot,
        Self::Washer,
        Self::LShape,
        Self::Cross,
        Self::Star,
    ];

    /// The `snake_case` name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cylinder => "cylinder",
            Self::Cube => "cube",
            Self::Box => "box",
            Self::Hexagon => "hexagon",
            Self::Triangle => "triangle",
            Self::Pentagon => "pentagon",
            Self::Octagon => "octagon",
            Self::Ellipse => "ellipse",
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Rectangle => "rectangle",
            Self::Slot => "slot",
            Self::Washer => "washer",
            Self::LShape => "l_shape",
            Self::Cross => "cross",
            Self::Star => "star",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully specified shape. All lengths are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape_kind", content = "parameters", rename_all = "snake_case")]
pub enum Shape {
    Cylinder { radius: f64, height: f64 },
    Cube { size: f64 },
    Box { width: f64, height: f64, depth: f64 },
    Hexagon { radius: f64, height: f64 },
    Triangle { base: f64, tri_height: f64, depth: f64 },
    Pentagon { radius: f64, height: f64 },
    Octagon { radius: f64, height: f64 },
    /// `major` and `minor` are full axis lengths, not semi-axes.
    Ellipse { major: f64, minor: f64, height: f64 },
    Circle { radius: f64 },
    Square { size: f64 },
    Rectangle { width: f64, length: f64 },
    Slot { length: f64, width: f64, height: f64 },
    /// `outer` and `inner` are diameters.
    Washer { outer: f64, inner: f64, height: f64 },
    LShape { width: f64, length: f64, thickness: f64, depth: f64 },
    Cross { size: f64, thickness: f64, depth: f64 },
    /// `outer` and `inner` are vertex radii.
    Star { outer: f64, inner: f64, points: u32, height: f64 },
}

impl Shape {
    /// Returns the kind tag of this shape.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Cube { .. } => ShapeKind::Cube,
            Self::Box { .. } => ShapeKind::Box,
            Self::Hexagon { .. } => ShapeKind::Hexagon,
            Self::Triangle { .. } => ShapeKind::Triangle,
            Self::Pentagon { .. } => ShapeKind::Pentagon,
            Self::Octagon { .. } => ShapeKind::Octagon,
            Self::Ellipse { .. } => ShapeKind::Ellipse,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Square { .. } => ShapeKind::Square,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Slot { .. } => ShapeKind::Slot,
            Self::Washer { .. } => ShapeKind::Washer,
            Self::LShape { .. } => ShapeKind::LShape,
            Self::Cross { .. } => ShapeKind::Cross,
            Self::Star { .. } => ShapeKind::Star,
        }
    }

    /// Returns the parameters as an ordered name → value map.
    ///
    /// `points` is reported as a float so the map has a single value type.
    #[must_use]
    pub fn parameters(&self) -> IndexMap<&'static str, f64> {
        let pairs: Vec<(&'static str, f64)> = match *self {
            Self::Cylinder { radius, height }
            | Self::Hexagon { radius, height }
            | Self::Pentagon { radius, height }
            | Self::Octagon { radius, height } => vec![("radius", radius), ("height", height)],
            Self::Cube { size } | Self::Square { size } => vec![("size", size)],
            Self::Box {
                width,
                height,
                depth,
            } => vec![("width", width), ("height", height), ("depth", depth)],
            Self::Triangle {
                base,
                tri_height,
                depth,
            } => vec![("base", base), ("tri_height", tri_height), ("depth", depth)],
            Self::Ellipse {
                major,
                minor,
                height,
            } => vec![("major", major), ("minor", minor), ("height", height)],
            Self::Circle { radius } => vec![("radius", radius)],
            Self::Rectangle { width, length } => vec![("width", width), ("length", length)],
            Self::Slot {
                length,
                width,
                height,
            } => vec![("length", length), ("width", width), ("height", height)],
            Self::Washer {
                outer,
                inner,
                height,
            } => vec![("outer", outer), ("inner", inner), ("height", height)],
            Self::LShape {
                width,
                length,
                thickness,
                depth,
            } => vec![
                ("width", width),
                ("length", length),
                ("thickness", thickness),
                ("depth", depth),
            ],
            Self::Cross {
                size,
                thickness,
                depth,
            } => vec![("size", size), ("thickness", thickness), ("depth", depth)],
            Self::Star {
                outer,
                inner,
                points,
                height,
            } => vec![
                ("outer", outer),
                ("inner", inner),
                ("points", f64::from(points)),
                ("height", height),
            ],
        };
        pairs.into_iter().collect()
    }

    /// Returns the named parameter, if this kind has it.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters().get(name).copied()
    }

    /// Whether this kind can only ever be a flat sketch.
    #[must_use]
    pub const fn is_flat_only(&self) -> bool {
        matches!(
            self,
            Self::Circle { .. } | Self::Square { .. } | Self::Rectangle { .. }
        )
    }
}

/// The interpreter's output for one prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedShape {
    /// The classified shape with its dimensions in meters.
    #[serde(flatten)]
    pub shape: Shape,

    /// Unit inferred for the whole prompt (used for unit-less numbers).
    pub units: UnitSystem,

    /// Whether the request is a flat sketch rather than a solid.
    pub is_2d: bool,
}

impl ParsedShape {
    /// Creates a parsed shape.
    #[must_use]
    pub const fn new(shape: Shape, units: UnitSystem, is_2d: bool) -> Self {
        Self {
            shape,
            units,
            is_2d,
        }
    }

    /// Returns the kind tag of the parsed shape.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Returns the parameters as an ordered name → value map.
    #[must_use]
    pub fn parameters(&self) -> IndexMap<&'static str, f64> {
        self.shape.parameters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_snake_case() {
        assert_eq!(ShapeKind::LShape.as_str(), "l_shape");
        let json = serde_json::to_string(&ShapeKind::LShape).unwrap();
        assert_eq!(json, "\"l_shape\"");
    }

    #[test]
    fn every_kind_listed_once() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert!(!ShapeKind::ALL[i + 1..].contains(kind), "{kind} repeated");
        }
    }

    #[test]
    fn parameters_keep_declaration_order() {
        let shape = Shape::LShape {
            width: 0.02,
            length: 0.03,
            thickness: 0.003,
            depth: 0.01,
        };
        let keys: Vec<_> = shape.parameters().keys().copied().collect();
        assert_eq!(keys, ["width", "length", "thickness", "depth"]);
    }

    #[test]
    fn star_points_reported_as_float() {
        let shape = Shape::Star {
            outer: 0.02,
            inner: 0.008,
            points: 6,
            height: 0.005,
        };
        assert_eq!(shape.parameter("points"), Some(6.0));
        assert_eq!(shape.parameter("radius"), None);
    }

    #[test]
    fn parsed_shape_json_layout() {
        let parsed = ParsedShape::new(
            Shape::Cylinder {
                radius: 0.01,
                height: 0.02,
            },
            UnitSystem::Millimeter,
            false,
        );
        let value = serde_json::to_value(parsed).unwrap();
        assert_eq!(value["shape_kind"], "cylinder");
        assert_eq!(value["parameters"]["radius"], 0.01);
        assert_eq!(value["units"], "mm");
        assert_eq!(value["is_2d"], false);
    }

    #[test]
    fn shape_deserialises_from_kind_and_parameters() {
        let json = r#"{"shape_kind": "washer", "parameters": {"outer": 0.02, "inner": 0.01, "height": 0.005}}"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert_eq!(shape.kind(), ShapeKind::Washer);
        assert_eq!(shape.parameter("inner"), Some(0.01));
    }
}
