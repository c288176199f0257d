//! Host capabilities (add-on modules) that importers may depend on.

use std::fmt;

/// Identifier of an optional host add-on providing format-specific logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability(&'static str);

impl Capability {
    /// Legacy Wavefront OBJ importer add-on.
    pub const OBJ_IMPORTER: Capability = Capability("io_scene_obj");
    /// Legacy Stanford PLY importer add-on.
    pub const PLY_IMPORTER: Capability = Capability("io_mesh_ply");

    /// Create a capability from its module identifier.
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    /// Module identifier understood by the host.
    pub const fn id(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
