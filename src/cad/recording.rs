//! In-process CAD host that validates and records every command.

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use super::{CadHost, HostCommand, HostError, HostResult, FRONT_PLANE};
use crate::recipe::SketchEntity;

/// A part document held by [`RecordingHost`].
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Unique document id.
    pub id: Uuid,
    /// Part template the document was created from.
    pub template: Option<PathBuf>,
    /// Reference planes, base plane first, with their offsets (m).
    pub planes: Vec<(String, f64)>,
    /// Names of features in creation order.
    pub features: Vec<String>,
    #[serde(skip)]
    sketch_count: usize,
    #[serde(skip)]
    open_sketch: Option<SketchBuffer>,
    #[serde(skip)]
    profile: Option<SketchBuffer>,
}

#[derive(Debug, Clone)]
struct SketchBuffer {
    name: String,
    entities: Vec<SketchEntity>,
}

impl Document {
    fn new(template: Option<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            template,
            planes: vec![(FRONT_PLANE.to_string(), 0.0)],
            features: Vec::new(),
            sketch_count: 0,
            open_sketch: None,
            profile: None,
        }
    }

    fn take_profile(&mut self, feature: &'static str) -> HostResult<SketchBuffer> {
        match self.profile.take() {
            Some(profile) if !profile.entities.is_empty() => Ok(profile),
            _ => Err(HostError::NoProfile { feature }),
        }
    }

    fn next_feature_name(&self, prefix: &str) -> String {
        let n = self
            .features
            .iter()
            .filter(|name| name.starts_with(prefix))
            .count();
        format!("{prefix}{}", n + 1)
    }
}

/// A [`CadHost`] that keeps documents in memory and logs each command.
#[derive(Debug, Default)]
pub struct RecordingHost {
    template: Option<PathBuf>,
    document: Option<Document>,
    documents_created: usize,
    commands: Vec<HostCommand>,
}

impl RecordingHost {
    /// Creates a host with no template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host whose new documents use `template`.
    #[must_use]
    pub fn with_template(template: Option<PathBuf>) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    /// The active document, if any.
    #[must_use]
    pub const fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Number of documents created so far.
    #[must_use]
    pub const fn documents_created(&self) -> usize {
        self.documents_created
    }

    /// Every command issued so far, oldest first.
    #[must_use]
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    fn document_mut(&mut self) -> HostResult<&mut Document> {
        self.document.as_mut().ok_or(HostError::NoDocument)
    }

    fn sketch_mut(&mut self) -> HostResult<&mut SketchBuffer> {
        self.document_mut()?
            .open_sketch
            .as_mut()
            .ok_or(HostError::SketchNotOpen)
    }
}

impl CadHost for RecordingHost {
    fn new_document(&mut self) -> HostResult<Uuid> {
        let document = Document::new(self.template.clone());
        let id = document.id;
        tracing::debug!(%id, template = ?self.template, "New part document");
        self.commands.push(HostCommand::NewDocument {
            id,
            template: self.template.as_ref().map(|p| p.display().to_string()),
        });
        self.document = Some(document);
        self.documents_created += 1;
        Ok(id)
    }

    fn has_document(&self) -> bool {
        self.document.is_some()
    }

    fn offset_plane(&mut self, offset: f64) -> HostResult<String> {
        if !offset.is_finite() {
            return Err(HostError::invalid_parameter(
                "offset",
                format!("must be finite, got {offset}"),
            ));
        }
        let document = self.document_mut()?;
        let name = format!("Plane{}", document.planes.len());
        document.planes.push((name.clone(), offset));
        self.commands.push(HostCommand::OffsetPlane {
            name: name.clone(),
            offset,
        });
        Ok(name)
    }

    fn open_sketch(&mut self, plane: &str) -> HostResult<String> {
        let document = self.document_mut()?;
        if let Some(open) = &document.open_sketch {
            return Err(HostError::SketchAlreadyOpen {
                sketch: open.name.clone(),
            });
        }
        if !document.planes.iter().any(|(name, _)| name == plane) {
            return Err(HostError::PlaneNotFound {
                name: plane.to_string(),
            });
        }
        document.sketch_count += 1;
        let name = format!("Sketch{}", document.sketch_count);
        document.open_sketch = Some(SketchBuffer {
            name: name.clone(),
            entities: Vec::new(),
        });
        self.commands.push(HostCommand::OpenSketch {
            name: name.clone(),
            plane: plane.to_string(),
        });
        Ok(name)
    }

    fn add_entity(&mut self, entity: &SketchEntity) -> HostResult<()> {
        self.sketch_mut()?.entities.push(*entity);
        self.commands.push(HostCommand::AddEntity { entity: *entity });
        Ok(())
    }

    fn close_sketch(&mut self) -> HostResult<()> {
        let document = self.document_mut()?;
        let sketch = document.open_sketch.take().ok_or(HostError::SketchNotOpen)?;
        let name = sketch.name.clone();
        document.profile = Some(sketch);
        self.commands.push(HostCommand::CloseSketch { name });
        Ok(())
    }

    fn extrude(&mut self, depth: f64) -> HostResult<String> {
        if !depth.is_finite() || depth <= 0.0 {
            return Err(HostError::invalid_parameter(
                "depth",
                format!("must be a positive length, got {depth}"),
            ));
        }
        let document = self.document_mut()?;
        let profile = document.take_profile("extrude")?;
        let name = document.next_feature_name("Extrude");
        document.features.push(name.clone());
        self.commands.push(HostCommand::Extrude {
            name: name.clone(),
            sketch: profile.name,
            depth,
        });
        Ok(name)
    }

    fn revolve(&mut self, axis: usize) -> HostResult<String> {
        let document = self.document_mut()?;
        let profile = document.take_profile("revolve")?;
        if !profile
            .entities
            .get(axis)
            .is_some_and(SketchEntity::is_construction)
        {
            document.profile = Some(profile);
            return Err(HostError::invalid_parameter(
                "axis",
                format!("entity {axis} is not a centre line"),
            ));
        }
        let name = document.next_feature_name("Revolve");
        document.features.push(name.clone());
        self.commands.push(HostCommand::Revolve {
            name: name.clone(),
            sketch: profile.name,
            angle_degrees: 360.0,
        });
        Ok(name)
    }

    fn zoom_to_fit(&mut self) -> HostResult<()> {
        self.document_mut()?;
        self.commands.push(HostCommand::ZoomToFit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Point;

    fn host_with_sketch() -> RecordingHost {
        let mut host = RecordingHost::new();
        host.new_document().unwrap();
        host.open_sketch(FRONT_PLANE).unwrap();
        host
    }

    #[test]
    fn operations_need_a_document() {
        let mut host = RecordingHost::new();
        assert_eq!(host.open_sketch(FRONT_PLANE), Err(HostError::NoDocument));
        assert_eq!(host.offset_plane(0.01), Err(HostError::NoDocument));
        assert_eq!(host.zoom_to_fit(), Err(HostError::NoDocument));
        assert!(host.commands().is_empty());
    }

    #[test]
    fn sketches_and_planes_are_numbered() {
        let mut host = RecordingHost::new();
        host.new_document().unwrap();
        assert_eq!(host.offset_plane(0.02).unwrap(), "Plane1");
        assert_eq!(host.offset_plane(0.04).unwrap(), "Plane2");
        assert_eq!(host.open_sketch("Plane2").unwrap(), "Sketch1");
        host.close_sketch().unwrap();
        assert_eq!(host.open_sketch(FRONT_PLANE).unwrap(), "Sketch2");
    }

    #[test]
    fn new_document_restarts_numbering() {
        let mut host = host_with_sketch();
        let first = host.document().unwrap().id;
        let second = host.new_document().unwrap();
        assert_ne!(first, second);
        assert_eq!(host.open_sketch(FRONT_PLANE).unwrap(), "Sketch1");
        assert_eq!(host.documents_created(), 2);
    }

    #[test]
    fn nested_sketch_is_rejected() {
        let mut host = host_with_sketch();
        assert_eq!(
            host.open_sketch(FRONT_PLANE),
            Err(HostError::SketchAlreadyOpen {
                sketch: "Sketch1".to_string()
            })
        );
    }

    #[test]
    fn unknown_plane_is_rejected() {
        let mut host = RecordingHost::new();
        host.new_document().unwrap();
        assert!(matches!(
            host.open_sketch("Top Plane"),
            Err(HostError::PlaneNotFound { .. })
        ));
    }

    #[test]
    fn entities_need_an_open_sketch() {
        let mut host = RecordingHost::new();
        host.new_document().unwrap();
        let line = SketchEntity::line(0.0, 0.0, 1.0, 0.0);
        assert_eq!(host.add_entity(&line), Err(HostError::SketchNotOpen));
        assert_eq!(host.close_sketch(), Err(HostError::SketchNotOpen));
    }

    #[test]
    fn extrude_consumes_profile() {
        let mut host = host_with_sketch();
        host.add_entity(&SketchEntity::Circle {
            centre: Point::default(),
            radius: 0.01,
        })
        .unwrap();
        host.close_sketch().unwrap();
        assert_eq!(host.extrude(0.02).unwrap(), "Extrude1");
        assert_eq!(
            host.extrude(0.02),
            Err(HostError::NoProfile { feature: "extrude" })
        );
        assert_eq!(host.document().unwrap().features, vec!["Extrude1"]);
    }

    #[test]
    fn empty_sketch_is_not_a_profile() {
        let mut host = host_with_sketch();
        host.close_sketch().unwrap();
        assert_eq!(
            host.extrude(0.01),
            Err(HostError::NoProfile { feature: "extrude" })
        );
    }

    #[test]
    fn extrude_rejects_bad_depth() {
        let mut host = host_with_sketch();
        host.close_sketch().unwrap();
        for depth in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                host.extrude(depth),
                Err(HostError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn revolve_needs_centre_line_axis() {
        let mut host = host_with_sketch();
        host.add_entity(&SketchEntity::line(0.0, 0.0, 1.0, 0.0))
            .unwrap();
        host.add_entity(&SketchEntity::CentreLine {
            start: Point::new(0.0, -1.0),
            end: Point::new(0.0, 1.0),
        })
        .unwrap();
        host.close_sketch().unwrap();
        assert!(matches!(
            host.revolve(0),
            Err(HostError::InvalidParameter { .. })
        ));
        assert_eq!(host.revolve(1).unwrap(), "Revolve1");
    }

    #[test]
    fn documents_carry_template() {
        let mut host = RecordingHost::with_template(Some(PathBuf::from("part.prtdot")));
        host.new_document().unwrap();
        assert_eq!(
            host.document().unwrap().template,
            Some(PathBuf::from("part.prtdot"))
        );
        assert!(matches!(
            &host.commands()[0],
            HostCommand::NewDocument { template: Some(t), .. } if t == "part.prtdot"
        ));
    }
}
