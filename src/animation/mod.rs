//! Keyframed animations imported from node descriptors.

pub mod clip;

pub use clip::{Animation, AnimationDataType, AnimationKeyFrame, AnimationRange, AnimationValue, LoopMode};
