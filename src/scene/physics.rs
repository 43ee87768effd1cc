use serde::{Deserialize, Serialize};

/// Collision shape used by a physics impostor.
///
/// Serialized by the editor as a numeric code; unknown codes are kept as
/// [`ImpostorKind::Other`] so newer documents still import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ImpostorKind {
    None,
    Sphere,
    Box,
    Plane,
    Mesh,
    Capsule,
    Cylinder,
    Particle,
    Heightmap,
    ConvexHull,
    Other(u32),
}

impl From<u32> for ImpostorKind {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Sphere,
            2 => Self::Box,
            3 => Self::Plane,
            4 => Self::Mesh,
            6 => Self::Capsule,
            7 => Self::Cylinder,
            8 => Self::Particle,
            9 => Self::Heightmap,
            10 => Self::ConvexHull,
            other => Self::Other(other),
        }
    }
}

impl From<ImpostorKind> for u32 {
    fn from(kind: ImpostorKind) -> Self {
        match kind {
            ImpostorKind::None => 0,
            ImpostorKind::Sphere => 1,
            ImpostorKind::Box => 2,
            ImpostorKind::Plane => 3,
            ImpostorKind::Mesh => 4,
            ImpostorKind::Capsule => 6,
            ImpostorKind::Cylinder => 7,
            ImpostorKind::Particle => 8,
            ImpostorKind::Heightmap => 9,
            ImpostorKind::ConvexHull => 10,
            ImpostorKind::Other(code) => code,
        }
    }
}

/// Physics body attached to a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsImpostor {
    pub kind: ImpostorKind,
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
}

/// Physics block of a node descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysicsDescriptor {
    pub physics_impostor: ImpostorKind,
    pub physics_mass: f32,
    pub physics_friction: f32,
    pub physics_restitution: f32,
}

impl Default for PhysicsDescriptor {
    fn default() -> Self {
        Self {
            physics_impostor: ImpostorKind::None,
            physics_mass: 0.0,
            physics_friction: 0.2,
            physics_restitution: 0.2,
        }
    }
}

impl From<&PhysicsDescriptor> for PhysicsImpostor {
    fn from(descriptor: &PhysicsDescriptor) -> Self {
        Self {
            kind: descriptor.physics_impostor,
            mass: descriptor.physics_mass,
            friction: descriptor.physics_friction,
            restitution: descriptor.physics_restitution,
        }
    }
}
