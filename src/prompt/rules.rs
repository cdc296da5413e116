//! Ordered classification rules.
//!
//! Each rule pairs a set of trigger substrings with the extractor for one
//! shape family. Rules are tried in table order and the first rule whose
//! triggers appear anywhere in the prompt decides the shape; there is no
//! "most specific match" tie-breaking.

use crate::prompt::extract::PromptText;
use crate::prompt::shape::{ParsedShape, Shape};

/// One entry of the classification table.
pub(crate) struct Rule {
    /// Substrings that select this rule.
    pub triggers: &'static [&'static str],
    /// Builds the shape once the rule has been selected.
    pub build: fn(&PromptText) -> ParsedShape,
}

pub(crate) const RULES: [Rule; 16] = [
    Rule {
        triggers: &["cylinder", "cylindrical", "tube", "pipe"],
        build: cylinder,
    },
    Rule {
        triggers: &["cube"],
        build: cube,
    },
    Rule {
        triggers: &["box", "rectangular", "prism", "block"],
        build: rectangular_box,
    },
    Rule {
        triggers: &["hexagon", "hex"],
        build: hexagon,
    },
    Rule {
        triggers: &["triangle"],
        build: triangle,
    },
    Rule {
        triggers: &["pentagon"],
        build: pentagon,
    },
    Rule {
        triggers: &["octagon"],
        build: octagon,
    },
    Rule {
        triggers: &["ellipse", "oval"],
        build: ellipse,
    },
    Rule {
        triggers: &["circle"],
        build: circle,
    },
    Rule {
        triggers: &["square"],
        build: square,
    },
    Rule {
        triggers: &["rectangle", "rect"],
        build: rectangle,
    },
    Rule {
        triggers: &["slot"],
        build: slot,
    },
    Rule {
        triggers: &["washer", "ring", "donut", "annulus"],
        build: washer,
    },
    Rule {
        triggers: &["l-shape", "lshape", "l shape"],
        build: l_shape,
    },
    Rule {
        triggers: &["cross", "plus"],
        build: cross,
    },
    Rule {
        triggers: &["star"],
        build: star,
    },
];

const RADIUS: &[&str] = &["radius", "r"];
const DIAMETER: &[&str] = &["diameter", "dia", "d"];
const POLYGON_RADIUS: &[&str] = &["radius", "r", "size"];
const POLYGON_HEIGHT: &[&str] = &["height", "tall", "h", "thick"];
const EXTRUSION_HEIGHT: &[&str] = &["height", "tall", "h", "thick", "extrude"];

/// Fills each missing value from the number at the same position.
fn fill_positional<const N: usize>(text: &PromptText, values: &mut [Option<f64>; N]) {
    for (index, value) in values.iter_mut().enumerate() {
        if value.is_none() {
            *value = text.number(index);
        }
    }
}

/// A keyword radius, or half of a keyword diameter.
fn radius_or_half_diameter(text: &PromptText) -> Option<f64> {
    text.dimension(RADIUS)
        .or_else(|| text.dimension(DIAMETER).map(|d| d / 2.0))
}

fn cylinder(text: &PromptText) -> ParsedShape {
    let mut values = [
        radius_or_half_diameter(text),
        text.dimension(&["height", "tall", "long", "h"]),
    ];
    if values.iter().any(Option::is_none) && text.number_count() >= 2 {
        fill_positional(text, &mut values);
    }
    let [radius, height] = values;

    ParsedShape::new(
        Shape::Cylinder {
            radius: radius.unwrap_or(0.01),
            height: height.unwrap_or(0.02),
        },
        text.units(),
        false,
    )
}

fn cube(text: &PromptText) -> ParsedShape {
    let size = text
        .dimension(&["side", "size", "length"])
        .or_else(|| text.number(0));

    ParsedShape::new(
        Shape::Cube {
            size: size.unwrap_or(0.02),
        },
        text.units(),
        false,
    )
}

fn rectangular_box(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["width", "wide", "w"]),
        text.dimension(&["height", "tall", "h"]),
        text.dimension(&["depth", "deep", "long", "length", "d", "l"]),
    ];

    if let Some(triple) = text.triple_dimension() {
        values = triple;
    } else if text.number_count() >= 3 {
        fill_positional(text, &mut values);
    } else if text.number_count() == 1 {
        values = [text.number(0); 3];
    }
    let [width, height, depth] = values;

    ParsedShape::new(
        Shape::Box {
            width: width.unwrap_or(0.02),
            height: height.unwrap_or(0.02),
            depth: depth.unwrap_or(0.02),
        },
        text.units(),
        false,
    )
}

/// Radius and height shared by the regular polygon rules.
fn polygon_dimensions(text: &PromptText) -> (f64, f64) {
    let mut values = [
        text.dimension(POLYGON_RADIUS),
        text.dimension(POLYGON_HEIGHT),
    ];
    fill_positional(text, &mut values);
    let [radius, height] = values;
    (radius.unwrap_or(0.01), height.unwrap_or(0.01))
}

fn hexagon(text: &PromptText) -> ParsedShape {
    let (radius, height) = polygon_dimensions(text);
    ParsedShape::new(
        Shape::Hexagon { radius, height },
        text.units(),
        text.wants_2d(),
    )
}

fn pentagon(text: &PromptText) -> ParsedShape {
    let (radius, height) = polygon_dimensions(text);
    ParsedShape::new(
        Shape::Pentagon { radius, height },
        text.units(),
        text.wants_2d(),
    )
}

fn octagon(text: &PromptText) -> ParsedShape {
    let (radius, height) = polygon_dimensions(text);
    ParsedShape::new(
        Shape::Octagon { radius, height },
        text.units(),
        text.wants_2d(),
    )
}

fn triangle(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["base", "width", "b", "w"]),
        text.dimension(&["height", "tall", "h"]),
        text.dimension(&["depth", "thick", "extrude", "d"]),
    ];
    fill_positional(text, &mut values);
    let [base, tri_height, depth] = values;

    ParsedShape::new(
        Shape::Triangle {
            base: base.unwrap_or(0.02),
            tri_height: tri_height.unwrap_or(0.02),
            depth: depth.unwrap_or(0.01),
        },
        text.units(),
        text.wants_2d(),
    )
}

fn ellipse(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["major", "length", "long", "a"]),
        text.dimension(&["minor", "width", "short", "b"]),
        text.dimension(POLYGON_HEIGHT),
    ];
    fill_positional(text, &mut values);
    let [major, minor, height] = values;

    ParsedShape::new(
        Shape::Ellipse {
            major: major.unwrap_or(0.02),
            minor: minor.unwrap_or(0.01),
            height: height.unwrap_or(0.01),
        },
        text.units(),
        text.wants_2d(),
    )
}

/// A circle becomes a cylinder when an extrusion height is given.
fn circle(text: &PromptText) -> ParsedShape {
    let radius = radius_or_half_diameter(text)
        .or_else(|| text.number(0))
        .unwrap_or(0.01);

    match text.dimension(EXTRUSION_HEIGHT) {
        Some(height) => ParsedShape::new(Shape::Cylinder { radius, height }, text.units(), false),
        None => ParsedShape::new(Shape::Circle { radius }, text.units(), true),
    }
}

/// A square becomes a cube when an extrusion height is given. The cube
/// keeps the square's side; the height only signals the extrusion.
fn square(text: &PromptText) -> ParsedShape {
    let size = text
        .dimension(&["side", "size", "length", "s"])
        .or_else(|| text.number(0))
        .unwrap_or(0.02);

    if text.dimension(EXTRUSION_HEIGHT).is_some() {
        ParsedShape::new(Shape::Cube { size }, text.units(), false)
    } else {
        ParsedShape::new(Shape::Square { size }, text.units(), true)
    }
}

/// A rectangle becomes a box when a depth is given.
fn rectangle(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["width", "wide", "w"]),
        text.dimension(&["length", "long", "l", "height", "h"]),
    ];
    let depth = text.dimension(&["depth", "thick", "extrude", "d"]);

    if let Some(pair) = text.pair_dimension() {
        values = pair;
    } else if text.number_count() >= 2 {
        fill_positional(text, &mut values);
    }
    let width = values[0].unwrap_or(0.02);
    let length = values[1].unwrap_or(0.01);

    match depth {
        Some(depth) => ParsedShape::new(
            Shape::Box {
                width,
                height: depth,
                depth: length,
            },
            text.units(),
            false,
        ),
        None => ParsedShape::new(Shape::Rectangle { width, length }, text.units(), true),
    }
}

fn slot(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["length", "long", "l"]),
        text.dimension(&["width", "wide", "w"]),
        text.dimension(POLYGON_HEIGHT),
    ];
    fill_positional(text, &mut values);
    let [length, width, height] = values;

    ParsedShape::new(
        Shape::Slot {
            length: length.unwrap_or(0.03),
            width: width.unwrap_or(0.01),
            height: height.unwrap_or(0.005),
        },
        text.units(),
        text.wants_2d(),
    )
}

fn washer(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["outer", "outside", "od", "diameter"]),
        text.dimension(&["inner", "inside", "id", "hole"]),
        text.dimension(POLYGON_HEIGHT),
    ];
    fill_positional(text, &mut values);
    let [outer, inner, height] = values;

    ParsedShape::new(
        Shape::Washer {
            outer: outer.unwrap_or(0.02),
            inner: inner.unwrap_or(0.01),
            height: height.unwrap_or(0.005),
        },
        text.units(),
        text.wants_2d(),
    )
}

fn l_shape(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["width", "w"]),
        text.dimension(&["length", "l", "height", "h"]),
        text.dimension(&["thick", "t"]),
        text.dimension(&["depth", "d", "extrude"]),
    ];
    fill_positional(text, &mut values);
    let [width, length, thickness, depth] = values;

    ParsedShape::new(
        Shape::LShape {
            width: width.unwrap_or(0.02),
            length: length.unwrap_or(0.02),
            thickness: thickness.unwrap_or(0.003),
            depth: depth.unwrap_or(0.01),
        },
        text.units(),
        text.wants_2d(),
    )
}

fn cross(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["size", "s", "width", "w"]),
        text.dimension(&["thick", "t", "arm"]),
        text.dimension(&["depth", "d", "height", "h"]),
    ];
    fill_positional(text, &mut values);
    let [size, thickness, depth] = values;

    ParsedShape::new(
        Shape::Cross {
            size: size.unwrap_or(0.02),
            thickness: thickness.unwrap_or(0.005),
            depth: depth.unwrap_or(0.005),
        },
        text.units(),
        text.wants_2d(),
    )
}

/// Inner radius defaults to 40% of the outer radius.
fn star(text: &PromptText) -> ParsedShape {
    let mut values = [
        text.dimension(&["outer", "radius", "r", "size"]),
        text.dimension(&["height", "h", "thick", "depth"]),
    ];
    if values[0].is_none() {
        values[0] = text.number(0);
    }
    if values[1].is_none() {
        values[1] = text.number(1);
    }
    let outer = values[0].unwrap_or(0.02);
    let inner = text.dimension(&["inner"]).unwrap_or(outer * 0.4);

    ParsedShape::new(
        Shape::Star {
            outer,
            inner,
            points: text.point_count().unwrap_or(5),
            height: values[1].unwrap_or(0.005),
        },
        text.units(),
        text.wants_2d(),
    )
}
