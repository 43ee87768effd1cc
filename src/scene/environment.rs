//! Environment - scene-wide settings
//!
//! Clear/ambient colours, fog, gravity and physics enablement, plus the
//! opaque image-processing and environment-helper records the renderer
//! consumes directly.

use glam::{Vec3, Vec4};
use serde_json::Value;

use crate::scene::TextureKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FogMode {
    #[default]
    None,
    Exp,
    Exp2,
    Linear,
}

impl FogMode {
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Exp,
            2 => Self::Exp2,
            3 => Self::Linear,
            _ => Self::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fog {
    pub mode: FogMode,
    pub density: f32,
    pub start: f32,
    pub end: f32,
    pub color: Vec3,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            mode: FogMode::None,
            density: 0.1,
            start: 0.0,
            end: 1000.0,
            color: Vec3::splat(0.2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub clear_color: Vec4,
    pub ambient_color: Vec3,
    pub fog: Fog,
    pub gravity: Vec3,
    pub physics_enabled: bool,
    /// Image-based lighting texture.
    pub environment_texture: Option<TextureKey>,
    pub image_processing: Option<Value>,
    pub helper: Option<Value>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clear_color: Vec4::new(0.2, 0.2, 0.3, 1.0),
            ambient_color: Vec3::ZERO,
            fog: Fog::default(),
            gravity: Vec3::new(0.0, -9.807, 0.0),
            physics_enabled: false,
            environment_texture: None,
            image_processing: None,
            helper: None,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
