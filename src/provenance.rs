//! Import provenance
//!
//! Every object an import creates or modifies is recorded here, keyed by
//! [`ObjectId`]. Tags are cumulative: an object added by one import and
//! modified by the next carries both flags.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::scene::{
    ActionManagerKey, AnimationKey, CameraKey, EffectLayerKey, GeometryKey, LensFlareKey, LightKey, MaterialKey,
    MeshKey, NodeHandle, ParticleSystemKey, PostProcessKey, ReflectionProbeKey, ShadowGeneratorKey, SoundKey,
    TextureKey,
};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Provenance: u8 {
        /// Instantiated by an import.
        const ADDED                  = 1 << 0;
        /// Existed before and was updated in place.
        const MODIFIED               = 1 << 1;
        /// Placeholder emitter created for a particle system.
        const ADDED_PARTICLE_SYSTEM  = 1 << 2;
    }
}

/// Identity of any object the importer can tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectId {
    Light(LightKey),
    Camera(CameraKey),
    Mesh(MeshKey),
    Geometry(GeometryKey),
    Material(MaterialKey),
    Texture(TextureKey),
    ParticleSystem(ParticleSystemKey),
    Sound(SoundKey),
    ShadowGenerator(ShadowGeneratorKey),
    EffectLayer(EffectLayerKey),
    ReflectionProbe(ReflectionProbeKey),
    LensFlare(LensFlareKey),
    PostProcess(PostProcessKey),
    Animation(AnimationKey),
    ActionManager(ActionManagerKey),
}

macro_rules! impl_object_id {
    ($($key:ident => $variant:ident),* $(,)?) => {
        $(impl From<$key> for ObjectId {
            fn from(key: $key) -> Self {
                Self::$variant(key)
            }
        })*
    };
}

impl_object_id!(
    LightKey => Light,
    CameraKey => Camera,
    MeshKey => Mesh,
    GeometryKey => Geometry,
    MaterialKey => Material,
    TextureKey => Texture,
    ParticleSystemKey => ParticleSystem,
    SoundKey => Sound,
    ShadowGeneratorKey => ShadowGenerator,
    EffectLayerKey => EffectLayer,
    ReflectionProbeKey => ReflectionProbe,
    LensFlareKey => LensFlare,
    PostProcessKey => PostProcess,
    AnimationKey => Animation,
    ActionManagerKey => ActionManager,
);

impl From<NodeHandle> for ObjectId {
    fn from(handle: NodeHandle) -> Self {
        match handle {
            NodeHandle::Light(key) => Self::Light(key),
            NodeHandle::Camera(key) => Self::Camera(key),
            NodeHandle::Mesh(key) => Self::Mesh(key),
        }
    }
}

/// Side-table of provenance tags.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceTable {
    tags: FxHashMap<ObjectId, Provenance>,
}

impl ProvenanceTable {
    /// Adds `tag` to the object's existing tags.
    pub fn add(&mut self, object: impl Into<ObjectId>, tag: Provenance) {
        *self.tags.entry(object.into()).or_default() |= tag;
    }

    #[must_use]
    pub fn get(&self, object: impl Into<ObjectId>) -> Provenance {
        self.tags.get(&object.into()).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn has(&self, object: impl Into<ObjectId>, tag: Provenance) -> bool {
        self.get(object).contains(tag)
    }

    pub fn forget(&mut self, object: impl Into<ObjectId>) -> Option<Provenance> {
        self.tags.remove(&object.into())
    }

    /// Objects carrying every bit of `tag`, in no particular order.
    pub fn iter_tagged(&self, tag: Provenance) -> impl Iterator<Item = ObjectId> + '_ {
        self.tags
            .iter()
            .filter(move |(_, t)| t.contains(tag))
            .map(|(id, _)| *id)
    }

    #[must_use]
    pub fn count(&self, tag: Provenance) -> usize {
        self.iter_tagged(tag).count()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
