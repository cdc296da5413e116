//! cad-prompt-mcp: turns free-text shape prompts into parametric CAD geometry.
//!
//! A prompt such as `"hexagon 15mm radius, 5mm tall"` is interpreted into a
//! typed [`prompt::Shape`] with dimensions in meters, expanded into a sketch
//! and feature [`recipe::ShapeRecipe`], and built through a [`cad::CadHost`].
//! A [`session::ShapeSession`] tracks stacking so consecutive solids sit on
//! top of each other.
//!
//! # Modules
//!
//! - [`units`]: Length units and conversion to meters
//! - [`prompt`]: Prompt classification and dimension extraction
//! - [`recipe`]: Sketch geometry and features per shape
//! - [`cad`]: The CAD host interface and a recording host
//! - [`session`]: Stacking state and shape creation
//! - [`render`]: ASCII previews of sketch profiles
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`mcp`]: MCP protocol implementation

pub mod cad;
pub mod config;
pub mod error;
pub mod mcp;
pub mod prompt;
pub mod recipe;
pub mod render;
pub mod session;
pub mod units;

pub use prompt::{parse, ParsedShape, Shape, ShapeKind};
pub use session::ShapeSession;
pub use units::UnitSystem;
