//! The seam between shape recipes and a CAD application.
//!
//! A [`CadHost`] exposes the handful of operations every recipe is built
//! from: documents, reference planes, sketches and the two solid
//! features. The session drives a host; it never talks to a CAD program
//! directly.
//!
//! [`RecordingHost`] is the in-process implementation. It validates call
//! order the way a real CAD application would and keeps a log of every
//! command, which is what the MCP server reports back to clients.

pub mod error;
mod recording;

pub use error::{HostError, HostResult};
pub use recording::{Document, RecordingHost};

use serde::Serialize;
use uuid::Uuid;

use crate::recipe::SketchEntity;

/// Name of the base sketch plane of every new document.
pub const FRONT_PLANE: &str = "Front Plane";

/// Operations a CAD application must provide to build shapes.
pub trait CadHost {
    /// Starts a new part document and makes it active.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot create the document.
    fn new_document(&mut self) -> HostResult<Uuid>;

    /// Whether a document is currently active.
    fn has_document(&self) -> bool;

    /// Creates a reference plane parallel to [`FRONT_PLANE`] at `offset`
    /// meters and returns its name.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no document or the offset is not finite.
    fn offset_plane(&mut self, offset: f64) -> HostResult<String>;

    /// Opens a sketch on `plane` and returns the sketch name.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no document, the plane is unknown, or
    /// a sketch is already open.
    fn open_sketch(&mut self, plane: &str) -> HostResult<String>;

    /// Adds an entity to the open sketch.
    ///
    /// # Errors
    ///
    /// Returns an error if no sketch is open.
    fn add_entity(&mut self, entity: &SketchEntity) -> HostResult<()>;

    /// Closes the open sketch, making it the profile for the next feature.
    ///
    /// # Errors
    ///
    /// Returns an error if no sketch is open.
    fn close_sketch(&mut self) -> HostResult<()>;

    /// Extrudes the last closed sketch by `depth` meters and returns the
    /// feature name.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no profile or the depth is invalid.
    fn extrude(&mut self, depth: f64) -> HostResult<String>;

    /// Revolves the last closed sketch a full turn about the entity at
    /// index `axis` and returns the feature name.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no profile or `axis` is not a
    /// construction line of it.
    fn revolve(&mut self, axis: usize) -> HostResult<String>;

    /// Fits the view to the model.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no document.
    fn zoom_to_fit(&mut self) -> HostResult<()>;
}

/// One call made against a host, as recorded by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    NewDocument {
        id: Uuid,
        template: Option<String>,
    },
    OffsetPlane {
        name: String,
        offset: f64,
    },
    OpenSketch {
        name: String,
        plane: String,
    },
    AddEntity {
        entity: SketchEntity,
    },
    CloseSketch {
        name: String,
    },
    Extrude {
        name: String,
        sketch: String,
        depth: f64,
    },
    Revolve {
        name: String,
        sketch: String,
        angle_degrees: f64,
    },
    ZoomToFit,
}
