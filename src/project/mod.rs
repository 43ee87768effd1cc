//! Serialized editor projects.

pub mod document;
pub mod normalize;

pub use document::{
    AnimationDescriptor, EffectLayerDescriptor, GlobalConfiguration, MaterialDescriptor, NodeDescriptor,
    ParticleSystemDescriptor, PayloadDescriptor, PostProcessDescriptor, ProjectDocument, RenderTargetDescriptor,
    TextureDescriptor,
};
pub use normalize::{EFFECT_LAYER_LEGACY_FIELDS, normalize};
