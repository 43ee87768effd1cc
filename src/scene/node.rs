use glam::{Quat, Vec3};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::scene::transform::Transform;
use crate::scene::{AnimationKey, NodeHandle};

/// Data shared by every placeable entity (light, camera, mesh).
///
/// # Identity
///
/// - `id`: stable identifier from the editor; authoritative for reconciliation
/// - `name`: human-readable; used by reference-only descriptors and material
///   assignment
/// - `uuid`: runtime identity, never serialized by the editor
///
/// # Hierarchy
///
/// `parent` is only ever written through [`Scene::attach`](crate::scene::Scene::attach)
/// and the deferred-link resolver, so a node parsed before its parent stays
/// parentless until the whole document has been materialized.
#[derive(Debug, Clone)]
pub struct NodeCore {
    pub id: String,
    pub name: String,
    pub uuid: Uuid,

    pub(crate) parent: Option<NodeHandle>,

    pub transform: Transform,
    pub enabled: bool,

    /// Animations attached to this node, in the order they were imported.
    pub animations: Vec<AnimationKey>,

    /// Owner-managed metadata. Imports never overwrite it on existing nodes.
    pub metadata: Option<Value>,
}

impl NodeCore {
    /// Creates a node core. An empty `id` is replaced by a fresh UUID string.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let uuid = Uuid::new_v4();
        let id = id.into();
        Self {
            id: if id.is_empty() { uuid.to_string() } else { id },
            name: name.into(),
            uuid,
            parent: None,
            transform: Transform::new(),
            enabled: true,
            animations: Vec::new(),
            metadata: None,
        }
    }

    /// Builds a node core from the common payload fields.
    #[must_use]
    pub fn parse(fields: &NodeFields, default_name: &str) -> Self {
        let mut core = Self::new(
            fields.id.clone().unwrap_or_default(),
            fields.name.as_deref().unwrap_or(default_name),
        );
        core.apply(fields);
        core
    }

    /// Applies the common payload fields in place. Absent fields are left untouched.
    pub fn apply(&mut self, fields: &NodeFields) {
        if let Some(name) = &fields.name {
            self.name.clone_from(name);
        }
        if let Some(enabled) = fields.is_enabled {
            self.enabled = enabled;
        }
        if let Some(metadata) = &fields.metadata {
            self.metadata = Some(metadata.clone());
        }
        if let Some(position) = fields.position {
            self.transform.position = position;
        }
        if let Some(quaternion) = fields.rotation_quaternion {
            self.transform.rotation = quaternion;
        } else if let Some(euler) = fields.rotation {
            self.transform.set_rotation_euler(euler);
        }
        if let Some(scaling) = fields.scaling {
            self.transform.scale = scaling;
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }
}

/// Fields every serialized node payload may carry.
///
/// Flattened into the light, camera and mesh payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFields {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Id of the parent node; resolved only after the whole document is imported.
    pub parent_id: Option<String>,
    pub is_enabled: Option<bool>,
    pub metadata: Option<Value>,

    pub position: Option<Vec3>,
    /// Euler angles, ignored when `rotation_quaternion` is present.
    pub rotation: Option<Vec3>,
    pub rotation_quaternion: Option<Quat>,
    pub scaling: Option<Vec3>,
}
