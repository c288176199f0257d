//! Scene object kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of an object living in the host scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    /// Polygon mesh (also used for vertex-only point clouds).
    Mesh,
    /// Polyline or spline curve.
    Curve,
    /// NURBS surface.
    Surface,
    /// Text object.
    Font,
    /// Transform-only node.
    Empty,
    /// Grease pencil strokes.
    #[serde(rename = "GPENCIL")]
    GreasePencil,
    /// Volumetric grid.
    Volume,
    /// Camera.
    Camera,
    /// Light source.
    Light,
    /// Skeleton.
    Armature,
    /// Deformation lattice.
    Lattice,
    /// Audio emitter.
    Speaker,
}

impl ObjectKind {
    /// Kinds that count as usable content after an import.
    pub const ACCEPTED: [ObjectKind; 5] = [
        ObjectKind::Mesh,
        ObjectKind::Curve,
        ObjectKind::Empty,
        ObjectKind::GreasePencil,
        ObjectKind::Volume,
    ];

    /// Returns `true` if this kind is in the accepted content set.
    pub fn is_accepted(&self) -> bool {
        Self::ACCEPTED.contains(self)
    }

    /// Uppercase tag used in diagnostics (`MESH`, `GPENCIL`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Mesh => "MESH",
            Self::Curve => "CURVE",
            Self::Surface => "SURFACE",
            Self::Font => "FONT",
            Self::Empty => "EMPTY",
            Self::GreasePencil => "GPENCIL",
            Self::Volume => "VOLUME",
            Self::Camera => "CAMERA",
            Self::Light => "LIGHT",
            Self::Armature => "ARMATURE",
            Self::Lattice => "LATTICE",
            Self::Speaker => "SPEAKER",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_set() {
        assert!(ObjectKind::Mesh.is_accepted());
        assert!(ObjectKind::Curve.is_accepted());
        assert!(ObjectKind::Empty.is_accepted());
        assert!(ObjectKind::GreasePencil.is_accepted());
        assert!(ObjectKind::Volume.is_accepted());
        assert!(!ObjectKind::Camera.is_accepted());
        assert!(!ObjectKind::Light.is_accepted());
        assert!(!ObjectKind::Surface.is_accepted());
    }

    #[test]
    fn test_serde_uses_host_tags() {
        let json = serde_json::to_string(&ObjectKind::GreasePencil).expect("serialize");
        assert_eq!(json, "\"GPENCIL\"");
        let kind: ObjectKind = serde_json::from_str("\"MESH\"").expect("deserialize");
        assert_eq!(kind, ObjectKind::Mesh);
    }
}
