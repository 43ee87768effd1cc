//! Live scene graph
//!
//! Plain-data model of the scene an import reconciles against:
//! - [`Scene`]: container owning every entity in `slotmap` pools
//! - [`NodeCore`]: identity, transform and hierarchy shared by spatial nodes
//! - [`Light`], [`Camera`], [`Mesh`]: the spatial node kinds
//! - Resources: geometries, materials, textures
//! - Everything else a project can describe: particle systems, sounds, shadow
//!   generators, effect layers, probes, lens flares, post-processes and
//!   action graphs
//!
//! Each entity exposes `parse` (construct from a serialized payload) and,
//! where the importer can modify it in place, `apply`.

pub mod actions;
pub mod camera;
pub mod effects;
pub mod environment;
pub mod geometry;
pub mod light;
pub mod material;
pub mod mesh;
pub mod node;
pub mod particles;
pub mod physics;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod shadow;
pub mod sound;
pub mod texture;
pub mod transform;

pub use actions::{Action, ActionGraphPayload, ActionManager, Trigger};
pub use camera::{Camera, CameraPayload, ProjectionType};
pub use effects::{
    EffectLayer, EffectLayerKind, EffectLayerPayload, LensFlare, LensFlareSystem, LensFlareSystemPayload,
    PipelineKind, PostProcessPipeline, ReflectionProbe, ReflectionProbePayload,
};
pub use environment::{Environment, Fog, FogMode};
pub use geometry::Geometry;
pub use light::{Light, LightKind, LightPayload};
pub use material::{Material, MaterialPayload};
pub use mesh::{Mesh, MeshBundlePayload, MeshLinks, MeshPayload};
pub use node::{NodeCore, NodeFields};
pub use particles::{Emitter, ParticleSystem, ParticleSystemPayload};
pub use physics::{ImpostorKind, PhysicsDescriptor, PhysicsImpostor};
pub use scene::Scene;
pub use shadow::{ShadowFilter, ShadowGenerator, ShadowGeneratorPayload};
pub use sound::{Sound, SoundPayload};
pub use texture::{Texture, TexturePayload, TextureSource, WrapMode};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct LightKey;
    pub struct CameraKey;
    pub struct MeshKey;
    pub struct GeometryKey;
    pub struct MaterialKey;
    pub struct TextureKey;
    pub struct ParticleSystemKey;
    pub struct SoundKey;
    pub struct ShadowGeneratorKey;
    pub struct EffectLayerKey;
    pub struct ReflectionProbeKey;
    pub struct LensFlareKey;
    pub struct PostProcessKey;
    pub struct AnimationKey;
    pub struct ActionManagerKey;
}

/// Handle to any spatial node of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeHandle {
    Light(LightKey),
    Camera(CameraKey),
    Mesh(MeshKey),
}

impl NodeHandle {
    /// The mesh key, for mesh nodes.
    #[inline]
    #[must_use]
    pub fn as_mesh(self) -> Option<MeshKey> {
        match self {
            Self::Mesh(key) => Some(key),
            _ => None,
        }
    }
}

impl From<LightKey> for NodeHandle {
    fn from(key: LightKey) -> Self {
        Self::Light(key)
    }
}

impl From<CameraKey> for NodeHandle {
    fn from(key: CameraKey) -> Self {
        Self::Camera(key)
    }
}

impl From<MeshKey> for NodeHandle {
    fn from(key: MeshKey) -> Self {
        Self::Mesh(key)
    }
}
