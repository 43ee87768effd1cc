use serde::Deserialize;

use crate::scene::geometry::GeometriesPayload;
use crate::scene::node::{NodeCore, NodeFields};
use crate::scene::physics::PhysicsImpostor;
use crate::scene::{ActionManagerKey, GeometryKey, MaterialKey, MeshKey};

/// A renderable, spatial node.
///
/// Instanced copies share their source's geometry and material; `source` is
/// set on instances only.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub core: NodeCore,

    // === Resource references ===
    pub geometry: Option<GeometryKey>,
    pub material: Option<MaterialKey>,
    pub(crate) source: Option<MeshKey>,

    // === Instance settings ===
    pub visible: bool,
    pub pickable: bool,
    pub check_collisions: bool,
    pub receive_shadows: bool,

    // === Behaviour ===
    pub action_manager: Option<ActionManagerKey>,
    pub physics_impostor: Option<PhysicsImpostor>,
}

/// Scene resources a mesh payload refers to, resolved before construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshLinks {
    pub geometry: Option<GeometryKey>,
    pub material: Option<MaterialKey>,
}

impl Mesh {
    #[must_use]
    pub fn new(core: NodeCore) -> Self {
        Self {
            core,
            geometry: None,
            material: None,
            source: None,
            visible: true,
            pickable: true,
            check_collisions: false,
            receive_shadows: false,
            action_manager: None,
            physics_impostor: None,
        }
    }

    /// Creates an empty mesh with no geometry, used as a placeholder node.
    #[must_use]
    pub fn new_empty(id: &str, name: &str) -> Self {
        Self::new(NodeCore::new(id, name))
    }

    /// Constructs a new mesh from its serialized form.
    #[must_use]
    pub fn parse(payload: &MeshPayload, links: MeshLinks) -> Self {
        let mut mesh = Self::new(NodeCore::parse(&payload.node, "Mesh"));
        mesh.geometry = links.geometry;
        mesh.material = links.material;
        mesh.apply_properties(payload);
        mesh
    }

    /// Creates an instanced copy of `source`.
    #[must_use]
    pub fn parse_instance(source_key: MeshKey, source: &Mesh, payload: &InstancePayload) -> Self {
        let mut instance = Self::new(NodeCore::parse(&payload.node, &source.core.name));
        instance.geometry = source.geometry;
        instance.material = source.material;
        instance.source = Some(source_key);
        instance
    }

    /// Applies a serialized mesh onto this one in place.
    ///
    /// Links that could not be resolved leave the current reference untouched.
    /// Instances listed in the payload are only created on construction.
    pub fn apply(&mut self, payload: &MeshPayload, links: MeshLinks) {
        self.core.apply(&payload.node);
        if links.geometry.is_some() {
            self.geometry = links.geometry;
        }
        if links.material.is_some() {
            self.material = links.material;
        }
        self.apply_properties(payload);
    }

    fn apply_properties(&mut self, payload: &MeshPayload) {
        if let Some(visible) = payload.is_visible {
            self.visible = visible;
        }
        if let Some(pickable) = payload.pickable {
            self.pickable = pickable;
        }
        if let Some(check_collisions) = payload.check_collisions {
            self.check_collisions = check_collisions;
        }
        if let Some(receive_shadows) = payload.receive_shadows {
            self.receive_shadows = receive_shadows;
        }
    }

    /// Returns `true` for instanced copies of another mesh.
    #[inline]
    #[must_use]
    pub fn is_instance(&self) -> bool {
        self.source.is_some()
    }

    /// The mesh this instance was copied from.
    #[inline]
    #[must_use]
    pub fn source(&self) -> Option<MeshKey> {
        self.source
    }
}

/// Serialized form of a single mesh.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshPayload {
    #[serde(flatten)]
    pub node: NodeFields,

    pub geometry_id: Option<String>,
    pub material_id: Option<String>,

    pub is_visible: Option<bool>,
    pub pickable: Option<bool>,
    pub check_collisions: Option<bool>,
    pub receive_shadows: Option<bool>,

    #[serde(default)]
    pub instances: Vec<InstancePayload>,
}

/// Serialized instanced copy, nested in its source mesh.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePayload {
    #[serde(flatten)]
    pub node: NodeFields,
}

/// Payload of a `Mesh` node descriptor: shared geometries plus one or more meshes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshBundlePayload {
    #[serde(default)]
    pub geometries: Option<GeometriesPayload>,
    #[serde(default)]
    pub meshes: Vec<MeshPayload>,
}
