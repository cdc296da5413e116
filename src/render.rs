//! ASCII previews of shape recipes.
//!
//! Lets an MCP client look at a sketch profile without a CAD program. The
//! profile is drawn in sketch coordinates, Y up, at `scale` characters
//! per millimeter.

use std::fmt::Write;

use crate::recipe::{Feature, Point, ShapeRecipe, SketchEntity};

/// Segments per full turn when drawing circles and arcs.
const CURVE_SEGMENTS: usize = 48;

/// Blank border around the profile (mm).
const MARGIN_MM: f64 = 1.0;

/// Renders the profile sketch of `recipe` as ASCII art.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::similar_names
)]
pub fn render_recipe_ascii(
    recipe: &ShapeRecipe,
    scale: f64,
    max_width: usize,
    max_height: usize,
) -> String {
    let paths: Vec<(char, Vec<Point>)> = recipe
        .entities
        .iter()
        .map(|entity| {
            let points = entity
                .sample(CURVE_SEGMENTS)
                .into_iter()
                .map(|p| Point::new(p.x * 1000.0, p.y * 1000.0))
                .collect();
            (glyph(entity), points)
        })
        .collect();

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for point in paths.iter().flat_map(|(_, points)| points) {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    if paths.is_empty() || min_x > max_x {
        return format!("{}\nEmpty sketch (no entities)\n", recipe.label);
    }

    let (profile_width, profile_height) = (max_x - min_x, max_y - min_y);
    min_x -= MARGIN_MM;
    max_x += MARGIN_MM;
    min_y -= MARGIN_MM;
    max_y += MARGIN_MM;

    let width_mm = max_x - min_x;
    let height_mm = max_y - min_y;
    let canvas_width = ((width_mm * scale).ceil() as usize).min(max_width).max(10);
    let canvas_height = ((height_mm * scale).ceil() as usize).min(max_height).max(5);

    let scale_x = (canvas_width - 1) as f64 / width_mm;
    let scale_y = (canvas_height - 1) as f64 / height_mm;

    // Row 0 is the top of the picture.
    let mut canvas = vec![vec![' '; canvas_width]; canvas_height];
    let to_canvas = |p: Point| -> (usize, usize) {
        let cx = ((p.x - min_x) * scale_x).round() as usize;
        let cy = canvas_height.saturating_sub(1) - ((p.y - min_y) * scale_y).round() as usize;
        (cx.min(canvas_width - 1), cy.min(canvas_height - 1))
    };

    for (ch, points) in &paths {
        for pair in points.windows(2) {
            draw_line(&mut canvas, to_canvas(pair[0]), to_canvas(pair[1]), *ch);
        }
    }

    let origin = Point::default();
    if (min_x..=max_x).contains(&origin.x) && (min_y..=max_y).contains(&origin.y) {
        let (ox, oy) = to_canvas(origin);
        canvas[oy][ox] = '+';
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} ({:.2} x {:.2} mm)",
        recipe.label, profile_width, profile_height
    );
    let lines = recipe
        .entities
        .iter()
        .filter(|e| matches!(e, SketchEntity::Line { .. }))
        .count();
    let construction = recipe.entities.iter().filter(|e| e.is_construction()).count();
    let _ = writeln!(
        output,
        "Lines: {}, Curves: {}, Construction: {}",
        lines,
        recipe.entities.len() - lines - construction,
        construction
    );
    match recipe.feature {
        Some(Feature::Extrude { depth }) => {
            let _ = writeln!(output, "Feature: extrude {:.2} mm", depth * 1000.0);
        }
        Some(Feature::Revolve { .. }) => output.push_str("Feature: revolve 360°\n"),
        None => output.push_str("Feature: none (sketch only)\n"),
    }

    output.push_str(&"-".repeat(canvas_width + 2));
    output.push('\n');
    for row in &canvas {
        output.push('|');
        output.extend(row.iter());
        output.push('|');
        output.push('\n');
    }
    output.push_str(&"-".repeat(canvas_width + 2));
    output.push('\n');
    output.push_str("Legend: # = line, o = curve, . = construction, + = origin\n");

    output
}

const fn glyph(entity: &SketchEntity) -> char {
    match entity {
        SketchEntity::Line { .. } => '#',
        SketchEntity::CentreLine { .. } => '.',
        SketchEntity::Circle { .. }
        | SketchEntity::Arc { .. }
        | SketchEntity::ThreePointArc { .. }
        | SketchEntity::Ellipse { .. } => 'o',
    }
}

/// Draws a line on the canvas using Bresenham's algorithm.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn draw_line(canvas: &mut [Vec<char>], (x0, y0): (usize, usize), (x1, y1): (usize, usize), ch: char) {
    let dx = (x1 as isize - x0 as isize).abs();
    let dy = (y1 as isize - y0 as isize).abs();
    let sx: isize = if x0 < x1 { 1 } else { -1 };
    let sy: isize = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut x = x0 as isize;
    let mut y = y0 as isize;

    let height = canvas.len();
    let width = canvas.first().map_or(0, Vec::len);

    loop {
        if (x as usize) < width && (y as usize) < height {
            // Outline glyphs win over construction dots.
            let cell = &mut canvas[y as usize][x as usize];
            if *cell == ' ' || *cell == '.' {
                *cell = ch;
            }
        }

        if x == x1 as isize && y == y1 as isize {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}
