//! Shape session: replays recipes against a CAD host and stacks solids.
//!
//! Outside stacking mode every shape gets its own document. In stacking
//! mode solids are built into the active document, each one sketched at
//! the current stack height and raising it by the shape's height, so
//! shapes sit on top of one another. Flat sketches always get a fresh
//! document and leave the stack alone.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cad::{CadHost, FRONT_PLANE};
use crate::error::SessionError;
use crate::prompt::{self, ParsedShape, Shape};
use crate::recipe::{recipe_for, sphere_recipe, Feature, ShapeRecipe};
use crate::units::format_mm;

/// Default sphere radius (m).
pub const DEFAULT_SPHERE_RADIUS: f64 = 0.01;

/// Stacking state of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StackState {
    /// Whether new solids reuse the active document.
    pub stacking: bool,
    /// Height the next solid is sketched at (m).
    pub stack_height: f64,
    /// Height of the most recent solid (m).
    pub last_shape_height: f64,
    /// Height of the last plane created, if any (m).
    pub plane_height: Option<f64>,
}

/// One thing the session has built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// Label returned to the caller, e.g. `Cube (20.0x20.0x20.0mm)`.
    pub label: String,
    /// Shape kind, `sphere` or `plane`.
    pub kind: String,
    /// Stack height once the entry was built (m).
    pub stack_height: f64,
    /// When the entry was built.
    pub created_at: DateTime<Utc>,
}

/// Most history entries a session keeps; older ones are dropped first.
pub const MAX_HISTORY: usize = 1000;

/// Drives a [`CadHost`] from parsed shapes.
#[derive(Debug)]
pub struct ShapeSession<H> {
    host: H,
    state: StackState,
    history: Vec<HistoryEntry>,
}

impl<H: CadHost> ShapeSession<H> {
    /// Creates a session that starts outside stacking mode.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            host,
            state: StackState::default(),
            history: Vec::new(),
        }
    }

    /// Creates a session, optionally starting in stacking mode.
    #[must_use]
    pub fn with_stacking(host: H, stacking: bool) -> Self {
        let mut session = Self::new(host);
        session.state.stacking = stacking;
        session
    }

    /// The underlying host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Current stacking state.
    #[must_use]
    pub const fn state(&self) -> StackState {
        self.state
    }

    /// The last [`MAX_HISTORY`] builds, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Enters stacking mode: the next solids reuse the current document.
    pub fn begin_stack(&mut self) {
        tracing::debug!("Stacking enabled");
        self.state.stacking = true;
    }

    /// Leaves stacking mode and forgets heights and the active plane.
    pub fn reset(&mut self) {
        tracing::debug!("Stack reset");
        self.state = StackState::default();
    }

    /// Creates a reference plane at `height` (default: the stack height)
    /// and enters stacking mode.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoDocument`] if no shape exists yet, or a
    /// host error if the plane cannot be created.
    pub fn create_plane(&mut self, height: Option<f64>) -> Result<String, SessionError> {
        if !self.host.has_document() {
            return Err(SessionError::NoDocument);
        }
        let height = height.unwrap_or(self.state.stack_height);
        self.host.offset_plane(height)?;
        self.state.plane_height = Some(height);
        self.state.stacking = true;
        self.host.zoom_to_fit()?;

        let label = format!("Plane at {}mm", format_mm(height));
        self.record(&label, "plane");
        Ok(label)
    }

    /// Moves the stack height to the active plane and enters stacking
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActivePlane`] if no plane was created.
    pub fn set_height_to_plane(&mut self) -> Result<(), SessionError> {
        let height = self.state.plane_height.ok_or(SessionError::NoActivePlane)?;
        self.state.stack_height = height;
        self.state.stacking = true;
        Ok(())
    }

    /// Parses `prompt` and builds the shape it describes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownShape`] if the prompt names no known
    /// shape, or any error from building it.
    pub fn process_prompt(&mut self, prompt: &str) -> Result<String, SessionError> {
        let parsed = prompt::parse(prompt).ok_or(SessionError::UnknownShape)?;
        self.create(&parsed)
    }

    /// Builds a parsed shape.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is unusable or the host fails.
    pub fn create(&mut self, parsed: &ParsedShape) -> Result<String, SessionError> {
        self.create_shape(&parsed.shape, parsed.is_2d)
    }

    /// Builds `shape`, as a flat sketch when `is_2d` and the shape allows it.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is unusable or the host fails.
    pub fn create_shape(&mut self, shape: &Shape, is_2d: bool) -> Result<String, SessionError> {
        for (name, value) in shape.parameters() {
            check_dimension(name, value)?;
        }
        let kind = shape.kind();
        self.build(&recipe_for(shape, is_2d), kind.as_str())
    }

    /// Builds a sphere resting on the stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is unusable or the host fails.
    pub fn create_sphere(&mut self, radius: f64) -> Result<String, SessionError> {
        check_dimension("radius", radius)?;
        self.build(&sphere_recipe(radius), "sphere")
    }

    fn build(&mut self, recipe: &ShapeRecipe, kind: &str) -> Result<String, SessionError> {
        let reuse = self.state.stacking && self.host.has_document() && !recipe.new_document;
        if !reuse {
            self.host.new_document()?;
            if !recipe.new_document {
                self.state.stack_height = 0.0;
                self.state.last_shape_height = 0.0;
            }
        }

        let offset = if recipe.new_document {
            0.0
        } else {
            self.state.stack_height + recipe.sketch_offset
        };
        let plane = if offset.abs() < f64::EPSILON {
            FRONT_PLANE.to_string()
        } else {
            self.host.offset_plane(offset)?
        };

        self.host.open_sketch(&plane)?;
        for entity in &recipe.entities {
            self.host.add_entity(entity)?;
        }
        self.host.close_sketch()?;

        match recipe.feature {
            Some(Feature::Extrude { depth }) => {
                self.host.extrude(depth)?;
            }
            Some(Feature::Revolve { axis }) => {
                self.host.revolve(axis)?;
            }
            None => {}
        }
        if !recipe.is_sketch_only() {
            self.state.stack_height += recipe.advance;
            self.state.last_shape_height = recipe.advance;
        }
        self.host.zoom_to_fit()?;

        tracing::info!(
            label = %recipe.label,
            plane = %plane,
            stack_height = self.state.stack_height,
            "Shape created"
        );
        self.record(&recipe.label, kind);
        Ok(recipe.label.clone())
    }

    fn record(&mut self, label: &str, kind: &str) {
        if self.history.len() >= MAX_HISTORY {
            let excess = self.history.len() + 1 - MAX_HISTORY;
            self.history.drain(..excess);
        }
        self.history.push(HistoryEntry {
            label: label.to_string(),
            kind: kind.to_string(),
            stack_height: self.state.stack_height,
            created_at: Utc::now(),
        });
    }
}

fn check_dimension(name: &str, value: f64) -> Result<(), SessionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SessionError::InvalidDimension {
            name: name.to_string(),
            message: format!("must be a positive length, got {value}"),
        })
    }
}
