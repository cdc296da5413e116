//! Free-text prompt interpreter.
//!
//! Converts a description such as `"cylinder 30mm diameter, 80mm tall"`
//! into a [`ParsedShape`]: the shape kind, its dimensions in meters, the
//! prompt-wide unit and whether a flat sketch was requested.
//!
//! # How a prompt is read
//!
//! 1. The prompt-wide unit is inferred ([`detect_units`]).
//! 2. The first classification rule whose trigger words occur in the
//!    prompt selects the shape family (see the table in `rules`).
//! 3. Each parameter is looked up by its keyword synonyms
//!    ([`extract_dimension`]); missing ones are filled from the bare
//!    numbers in textual order ([`extract_all_numbers`]), and anything
//!    still missing gets a fixed default.
//!
//! Parsing is pure and never fails: an unrecognised prompt yields `None`.
//!
//! # Example
//!
//! ```
//! use cad_prompt_mcp::prompt::{parse, Shape};
//!
//! let parsed = parse("circle radius 5mm height 2mm").unwrap();
//! assert_eq!(
//!     parsed.shape,
//!     Shape::Cylinder { radius: 0.005, height: 0.002 }
//! );
//! assert!(!parsed.is_2d);
//! ```

mod extract;
mod rules;
mod shape;

pub use extract::{detect_units, extract_all_numbers, extract_dimension};
pub use shape::{ParsedShape, Shape, ShapeKind};

use extract::PromptText;
use rules::RULES;

/// Help text shown to users when a prompt names no known shape.
pub const UNKNOWN_SHAPE_HELP: &str = "Unknown shape. Try: cube, box, cylinder, hexagon, triangle, pentagon, octagon, ellipse, star, cross, slot, washer, L-shape, circle, square, rectangle";

/// Parses a free-text prompt into a shape request.
///
/// Returns `None` when no shape keyword occurs anywhere in the prompt.
#[must_use]
pub fn parse(prompt: &str) -> Option<ParsedShape> {
    let text = PromptText::new(prompt);

    let Some(rule) = RULES.iter().find(|rule| text.contains_any(rule.triggers)) else {
        tracing::debug!(prompt, "No shape keyword in prompt");
        return None;
    };

    let parsed = (rule.build)(&text);
    tracing::debug!(
        prompt,
        kind = %parsed.kind(),
        units = %parsed.units,
        is_2d = parsed.is_2d,
        "Parsed prompt"
    );
    Some(parsed)
}
